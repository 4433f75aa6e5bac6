use gitscape_diagram::error::BuildIssue;
use gitscape_diagram::{DiagramNode, EntryKind, NodeKind, PathEntry, build, build_with_report};

fn child_ids(node: &DiagramNode) -> Vec<&str> {
    node.children.iter().map(|c| c.id.as_str()).collect()
}

fn sample_entries() -> Vec<PathEntry> {
    vec![
        PathEntry::blob("a/b.txt", 10),
        PathEntry::blob("a/c/d.txt", 20),
    ]
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn test_nested_paths() {
    let root = build(&sample_entries(), "org/repo");

    assert_eq!(root.id, "");
    assert_eq!(root.name, "repo");
    assert_eq!(root.kind, NodeKind::Directory);
    assert_eq!(child_ids(&root), ["a"]);

    let a = &root.children[0];
    assert_eq!(a.kind, NodeKind::Directory);
    assert_eq!(child_ids(a), ["a/b.txt", "a/c"]);

    let b = &a.children[0];
    assert_eq!(b.kind, NodeKind::File);
    assert_eq!(b.name, "b.txt");
    assert_eq!(b.weight, 10);
    assert!(b.child_nodes().is_none());

    let c = &a.children[1];
    assert_eq!(c.kind, NodeKind::Directory);
    assert_eq!(child_ids(c), ["a/c/d.txt"]);
    assert_eq!(c.children[0].weight, 20);
}

#[test]
fn test_zero_entries() {
    let root = build(&[], "org/repo");
    assert_eq!(root.name, "repo");
    assert!(root.children.is_empty());
    assert_eq!(root.count(), 1);
}

#[test]
fn test_root_label_without_owner() {
    let root = build(&[], "repo");
    assert_eq!(root.name, "repo");
}

#[test]
fn test_default_weights() {
    let entries = vec![
        PathEntry::new("src/main.rs", EntryKind::Blob),
        PathEntry::tree("docs"),
    ];
    let root = build(&entries, "org/repo");

    assert_eq!(root.find("src/main.rs").map(|n| n.weight), Some(100));
    assert_eq!(root.find("docs").map(|n| n.weight), Some(1000));
    // Implied directory
    assert_eq!(root.find("src").map(|n| n.weight), Some(1000));
}

#[test]
fn test_zero_size_is_a_weight() {
    let root = build(&[PathEntry::blob("empty.txt", 0)], "org/repo");
    assert_eq!(root.children[0].weight, 0);
}

#[test]
fn test_unknown_kind_is_directory() {
    let entries = vec![PathEntry::new("vendor/lib", EntryKind::Other("commit".into()))];
    let root = build(&entries, "org/repo");
    assert_eq!(root.find("vendor/lib").map(|n| n.kind), Some(NodeKind::Directory));
}

#[test]
fn test_source_kept_for_explicit_entries() {
    let root = build(&sample_entries(), "org/repo");
    assert!(root.find("a").is_some_and(|n| n.source.is_none()));
    let b = root.find("a/b.txt").unwrap();
    assert_eq!(b.source.as_ref().map(|e| e.path.as_str()), Some("a/b.txt"));
}

// ============================================================================
// Edge Cases
// ============================================================================

#[test]
fn test_empty_path_ignored() {
    let entries = vec![PathEntry::blob("", 1), PathEntry::blob("x", 1)];
    let (root, issues) = build_with_report(&entries, "org/repo");
    assert_eq!(child_ids(&root), ["x"]);
    assert!(issues.is_empty());
}

#[test]
fn test_empty_segment_reported() {
    let entries = vec![PathEntry::blob("a//b", 1), PathEntry::blob("/lead", 1)];
    let (root, issues) = build_with_report(&entries, "org/repo");
    assert!(root.children.is_empty());
    assert_eq!(issues.len(), 2);
    assert!(
        issues
            .iter()
            .all(|i| matches!(i, BuildIssue::EmptySegment { .. }))
    );
}

#[test]
fn test_duplicate_entries_idempotent() {
    let mut entries = sample_entries();
    entries.extend(sample_entries());
    let (root, issues) = build_with_report(&entries, "org/repo");

    assert_eq!(root, build(&sample_entries(), "org/repo"));
    assert!(issues.is_empty());
}

#[test]
fn test_explicit_entry_wins_over_implied() {
    let entries = vec![PathEntry::blob("src/lib.rs", 5), PathEntry::tree("src")];
    let (root, issues) = build_with_report(&entries, "org/repo");

    let src = root.find("src").unwrap();
    assert_eq!(src.kind, NodeKind::Directory);
    assert_eq!(child_ids(src), ["src/lib.rs"]);
    assert!(src.source.is_some());
    assert!(issues.is_empty());
}

#[test]
fn test_file_in_intermediate_path_skips_rest() {
    let entries = vec![PathEntry::blob("a", 1), PathEntry::blob("a/b", 1)];
    let (root, issues) = build_with_report(&entries, "org/repo");

    let a = root.find("a").unwrap();
    assert_eq!(a.kind, NodeKind::File);
    assert!(a.children.is_empty());
    assert_eq!(
        issues,
        [BuildIssue::FileInIntermediatePath {
            file: "a".into(),
            entry: "a/b".into(),
        }]
    );
}

#[test]
fn test_kind_conflict_trusts_latest_entry() {
    let entries = vec![
        PathEntry::tree("d"),
        PathEntry::blob("d/e", 1),
        PathEntry::new("d", EntryKind::Blob),
    ];
    let (root, issues) = build_with_report(&entries, "org/repo");

    let d = root.find("d").unwrap();
    assert_eq!(d.kind, NodeKind::File);
    assert!(d.children.is_empty());
    assert_eq!(
        issues,
        [
            BuildIssue::KindConflict {
                path: "d".into(),
                previous: NodeKind::Directory,
                current: NodeKind::File,
            },
            BuildIssue::FileInIntermediatePath {
                file: "d".into(),
                entry: "d/e".into(),
            },
        ]
    );
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_determinism_regardless_of_order() {
    let entries = vec![
        PathEntry::blob("z/1", 1),
        PathEntry::blob("a/2", 2),
        PathEntry::tree("m"),
        PathEntry::blob("a/b/3", 3),
    ];
    let mut reversed = entries.clone();
    reversed.reverse();

    assert_eq!(build(&entries, "o/r"), build(&reversed, "o/r"));
}

#[test]
fn test_tree_completeness() {
    let entries = vec![
        PathEntry::blob("src/a/b/c.rs", 1),
        PathEntry::blob("src/lib.rs", 1),
        PathEntry::blob("README.md", 1),
        PathEntry::tree("docs/img"),
    ];
    let root = build(&entries, "o/r");

    for entry in &entries {
        let node = root.find(&entry.path);
        assert!(node.is_some(), "missing {}", entry.path);

        let segments: Vec<&str> = entry.path.split('/').collect();
        for end in 1..segments.len() {
            let prefix = segments[..end].join("/");
            let dir = root.find(&prefix).unwrap();
            assert_eq!(dir.kind, NodeKind::Directory, "{prefix}");
        }
    }
    assert_eq!(root.walk().filter(|n| n.id == "src").count(), 1);
}

#[test]
fn test_siblings_sorted_by_path() {
    let entries = vec![
        PathEntry::blob("b", 1),
        PathEntry::blob("a", 1),
        PathEntry::blob("c", 1),
    ];
    let root = build(&entries, "o/r");
    assert_eq!(child_ids(&root), ["a", "b", "c"]);
}
