use gitscape_diagram::arena::{LayoutArena, NodeShape};
use gitscape_diagram::layout::{LevelMetrics, layout};
use gitscape_diagram::{DiagramConfig, PathEntry, Point, Viewport, build};

fn sample_arena() -> LayoutArena {
    let entries = vec![
        PathEntry::blob("a/b.txt", 10),
        PathEntry::blob("a/c/d.txt", 20),
    ];
    LayoutArena::from_tree(&build(&entries, "org/repo"))
}

fn position(arena: &LayoutArena, id: &str) -> Point {
    arena.node(id).unwrap().position
}

// ============================================================================
// Arena State
// ============================================================================

#[test]
fn test_default_state() {
    let arena = sample_arena();

    assert_eq!(arena.len(), 5);
    assert!(arena.get(LayoutArena::ROOT).is_expanded());
    assert!(!arena.node("a").unwrap().is_expanded());
    assert!(!arena.node("a/c").unwrap().is_expanded());
    assert!(matches!(arena.node("a/b.txt").unwrap().shape, NodeShape::File));
    assert_eq!(arena.visible_ids(), ["", "a"]);
}

#[test]
fn test_collapsed_children_held_back() {
    let arena = sample_arena();
    let a = arena.node("a").unwrap();

    assert!(a.visible_children().is_empty());
    assert_eq!(a.hidden_children().len(), 2);
    assert!(a.has_children());
}

#[test]
fn test_toggle_single_node() {
    let mut arena = sample_arena();
    let a = arena.lookup("a").unwrap();

    assert!(arena.toggle(a));
    assert_eq!(arena.visible_ids(), ["", "a", "a/b.txt", "a/c"]);
    // Descendants keep their own state
    assert!(!arena.node("a/c").unwrap().is_expanded());

    assert!(arena.toggle(a));
    assert_eq!(arena.visible_ids(), ["", "a"]);
}

#[test]
fn test_toggle_file_and_empty_directory_is_noop() {
    let entries = vec![PathEntry::blob("f", 1), PathEntry::tree("empty")];
    let mut arena = LayoutArena::from_tree(&build(&entries, "o/r"));

    let file = arena.lookup("f").unwrap();
    let empty = arena.lookup("empty").unwrap();
    assert!(!arena.toggle(file));
    assert!(!arena.toggle(empty));
}

#[test]
fn test_expand_all_then_collapse_all() {
    let mut arena = sample_arena();
    let initial: Vec<String> = arena.visible_ids().iter().map(|s| s.to_string()).collect();

    arena.expand_all();
    assert_eq!(
        arena.visible_ids(),
        ["", "a", "a/b.txt", "a/c", "a/c/d.txt"]
    );
    assert_eq!(arena.visible_links().len(), 4);

    arena.collapse_all();
    assert_eq!(arena.visible_ids(), initial);
}

#[test]
fn test_collapse_all_keeps_root_expanded() {
    let mut arena = sample_arena();
    arena.toggle(LayoutArena::ROOT);
    assert_eq!(arena.visible_ids(), [""]);

    arena.collapse_all();
    assert!(arena.get(LayoutArena::ROOT).is_expanded());
    assert_eq!(arena.visible_ids(), ["", "a"]);
}

#[test]
fn test_visibility_follows_ancestors() {
    let mut arena = sample_arena();
    arena.expand_all();
    let d = arena.lookup("a/c/d.txt").unwrap();
    assert!(arena.is_visible(d));

    let a = arena.lookup("a").unwrap();
    arena.toggle(a);
    assert!(!arena.is_visible(d));
    // a/c is still expanded under a collapsed parent
    assert!(arena.node("a/c").unwrap().is_expanded());
}

// ============================================================================
// Level Spacing
// ============================================================================

#[test]
fn test_level_spacing_minimum() {
    let config = DiagramConfig::default();
    let spacing = LevelMetrics::level_spacing(1, Viewport::new(800.0, 600.0), &config);
    assert_eq!(spacing, 150.0);
}

#[test]
fn test_level_spacing_fills_wide_viewport() {
    let config = DiagramConfig::default();
    // (1600 - 100 - 150) / (1 + 3)
    let spacing = LevelMetrics::level_spacing(1, Viewport::new(1600.0, 600.0), &config);
    assert_eq!(spacing, 337.5);
}

#[test]
fn test_level_spacing_compresses_deep_trees() {
    let config = DiagramConfig::default();
    let viewport = Viewport::new(2000.0, 600.0);
    let shallow = LevelMetrics::level_spacing(1, viewport, &config);
    let deep = LevelMetrics::level_spacing(6, viewport, &config);
    assert!(deep < shallow);
    assert!(deep >= config.min_level_spacing);
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_root_at_origin() {
    let mut arena = sample_arena();
    layout(&mut arena, Viewport::new(800.0, 600.0), &DiagramConfig::default());

    assert_eq!(position(&arena, ""), Point::ORIGIN);
    assert_eq!(position(&arena, "a"), Point::new(150.0, 0.0));
}

#[test]
fn test_parent_centred_on_children() {
    let mut arena = sample_arena();
    arena.expand_all();
    let metrics = layout(&mut arena, Viewport::new(800.0, 600.0), &DiagramConfig::default());

    assert_eq!(metrics.max_depth, 3);
    assert_eq!(metrics.rows, 2);
    let spacing = metrics.level_spacing;

    assert_eq!(position(&arena, ""), Point::ORIGIN);
    assert_eq!(position(&arena, "a"), Point::new(spacing, 0.0));
    assert_eq!(position(&arena, "a/b.txt"), Point::new(2.0 * spacing, -14.0));
    assert_eq!(position(&arena, "a/c"), Point::new(2.0 * spacing, 14.0));
    assert_eq!(position(&arena, "a/c/d.txt"), Point::new(3.0 * spacing, 14.0));
}

#[test]
fn test_siblings_keep_order_and_spacing() {
    let entries: Vec<PathEntry> = ["a", "b", "c", "d"]
        .iter()
        .map(|p| PathEntry::blob(*p, 1))
        .collect();
    let mut arena = LayoutArena::from_tree(&build(&entries, "o/r"));
    layout(&mut arena, Viewport::new(800.0, 600.0), &DiagramConfig::default());

    let ys: Vec<f32> = ["a", "b", "c", "d"]
        .iter()
        .map(|id| position(&arena, id).y)
        .collect();
    assert_eq!(ys, [-42.0, -14.0, 14.0, 42.0]);
}

#[test]
fn test_previous_positions_recorded() {
    let mut arena = sample_arena();
    let viewport = Viewport::new(800.0, 600.0);
    let config = DiagramConfig::default();

    layout(&mut arena, viewport, &config);
    assert!(arena.node("a").unwrap().previous_position.is_none());

    let a = arena.lookup("a").unwrap();
    arena.toggle(a);
    layout(&mut arena, viewport, &config);

    let a = arena.node("a").unwrap();
    assert_eq!(a.previous_position, Some(Point::new(150.0, 0.0)));
    assert!(arena.node("a/b.txt").unwrap().previous_position.is_none());
}

#[test]
fn test_layout_is_deterministic() {
    let viewport = Viewport::new(1024.0, 768.0);
    let config = DiagramConfig::default();

    let mut first = sample_arena();
    first.expand_all();
    layout(&mut first, viewport, &config);

    let mut second = sample_arena();
    second.expand_all();
    layout(&mut second, viewport, &config);

    for (idx, node) in first.iter() {
        assert_eq!(node.position, second.get(idx).position, "{}", node.id);
    }
}
