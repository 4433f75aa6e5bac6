//! Flat path list to rooted hierarchy.
//!
//! Nodes are first materialized into a flat draft arena keyed by accumulated
//! path, then folded into an owned [`DiagramNode`] tree. Intermediate
//! directories without an explicit entry are created on the way down, so every
//! leaf is connected to the root.

use std::collections::HashMap;

use crate::error::BuildIssue;
use crate::model::{DiagramNode, NodeKind, PathEntry};

const ROOT: usize = 0;

#[derive(Debug)]
struct Draft {
    id: String,
    name: String,
    kind: NodeKind,
    weight: u64,
    source: Option<PathEntry>,
    children: Vec<usize>,
}

/// Fold the draft at `idx` and its descendants into owned nodes.
fn materialize(drafts: &mut [Draft], idx: usize) -> DiagramNode {
    let children = std::mem::take(&mut drafts[idx].children)
        .into_iter()
        .map(|child| materialize(drafts, child))
        .collect();
    let draft = &mut drafts[idx];
    let id = std::mem::take(&mut draft.id);
    DiagramNode {
        path: id.clone(),
        id,
        name: std::mem::take(&mut draft.name),
        kind: draft.kind,
        children,
        weight: draft.weight,
        source: draft.source.take(),
    }
}

struct TreeBuilder {
    drafts: Vec<Draft>,
    by_path: HashMap<String, usize>,
    issues: Vec<BuildIssue>,
}

impl TreeBuilder {
    fn new(root_label: &str) -> Self {
        let name = root_label.rsplit('/').next().unwrap_or(root_label);
        let root = Draft {
            id: String::new(),
            name: name.to_string(),
            kind: NodeKind::Directory,
            weight: NodeKind::Directory.weight(None),
            source: None,
            children: Vec::new(),
        };
        let mut by_path = HashMap::new();
        by_path.insert(String::new(), ROOT);
        Self {
            drafts: vec![root],
            by_path,
            issues: Vec::new(),
        }
    }

    fn add(&mut self, entry: &PathEntry) {
        if entry.path.is_empty() {
            log::debug!("ignoring entry with empty path");
            return;
        }

        let segments: Vec<&str> = entry.path.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            self.report(BuildIssue::EmptySegment {
                path: entry.path.clone(),
            });
            return;
        }

        let last = segments.len() - 1;
        let mut parent = ROOT;
        let mut accumulated = String::with_capacity(entry.path.len());

        for (i, segment) in segments.iter().enumerate() {
            if !accumulated.is_empty() {
                accumulated.push('/');
            }
            accumulated.push_str(segment);
            let is_final = i == last;

            let existing = self.by_path.get(&accumulated).copied();
            let current = match existing {
                Some(idx) => {
                    if is_final {
                        self.update(idx, entry);
                    }
                    idx
                }
                None => self.create(parent, &accumulated, segment, is_final.then_some(entry)),
            };

            if self.drafts[current].kind == NodeKind::File && !is_final {
                self.report(BuildIssue::FileInIntermediatePath {
                    file: accumulated.clone(),
                    entry: entry.path.clone(),
                });
                return;
            }
            parent = current;
        }
    }

    /// Create a node under `parent`. `entry` is set when this is its final segment.
    fn create(
        &mut self,
        parent: usize,
        path: &str,
        name: &str,
        entry: Option<&PathEntry>,
    ) -> usize {
        let kind = entry.map_or(NodeKind::Directory, NodeKind::of_entry);
        let weight = kind.weight(entry.and_then(|e| e.size));
        let idx = self.drafts.len();
        self.drafts.push(Draft {
            id: path.to_string(),
            name: name.to_string(),
            kind,
            weight,
            source: entry.cloned(),
            children: Vec::new(),
        });
        self.drafts[parent].children.push(idx);
        self.by_path.insert(path.to_string(), idx);
        idx
    }

    /// An explicit entry for an existing node wins over what was implied.
    fn update(&mut self, idx: usize, entry: &PathEntry) {
        let kind = NodeKind::of_entry(entry);
        let previous = self.drafts[idx].kind;
        if previous != kind {
            self.report(BuildIssue::KindConflict {
                path: entry.path.clone(),
                previous,
                current: kind,
            });
        }
        let draft = &mut self.drafts[idx];
        draft.kind = kind;
        draft.weight = kind.weight(entry.size);
        draft.source = Some(entry.clone());
    }

    fn report(&mut self, issue: BuildIssue) {
        log::warn!("{issue}");
        self.issues.push(issue);
    }

    fn finish(mut self) -> (DiagramNode, Vec<BuildIssue>) {
        let root = materialize(&mut self.drafts, ROOT);
        (root, self.issues)
    }
}

/// Build the hierarchy for `entries`, labelling the root with the part of
/// `root_label` after its last `/`.
pub fn build(entries: &[PathEntry], root_label: &str) -> DiagramNode {
    build_with_report(entries, root_label).0
}

/// Like [`build`], also returning the inconsistencies that were tolerated.
pub fn build_with_report(
    entries: &[PathEntry],
    root_label: &str,
) -> (DiagramNode, Vec<BuildIssue>) {
    let mut sorted: Vec<&PathEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    let mut builder = TreeBuilder::new(root_label);
    for entry in sorted {
        builder.add(entry);
    }
    let (root, issues) = builder.finish();
    log::debug!(
        "built diagram tree: {} nodes from {} entries, {} issues",
        root.count(),
        entries.len(),
        issues.len()
    );
    (root, issues)
}
