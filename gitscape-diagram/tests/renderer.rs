use std::sync::Arc;
use std::time::{Duration, Instant};

use gitscape_diagram::scene::Phase;
use gitscape_diagram::{
    DiagramConfig, DiagramEvent, DiagramNode, DiagramRenderer, LabelSide, Marker, PathEntry,
    Point, RepoRef, ViewControl, ViewTransform, Viewport, build,
};

const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);
const SETTLED: Duration = Duration::from_secs(1);

fn sample_root() -> DiagramNode {
    let entries = vec![
        PathEntry::blob("a/b.txt", 10),
        PathEntry::blob("a/c/d.txt", 20),
    ];
    build(&entries, "org/repo")
}

fn repo() -> RepoRef {
    RepoRef::new("org/repo", "main")
}

fn ready(now: Instant) -> DiagramRenderer {
    let mut renderer = DiagramRenderer::default();
    renderer.initialize(sample_root(), repo(), VIEWPORT, now);
    renderer
}

fn instant_renderer(now: Instant) -> DiagramRenderer {
    let config = DiagramConfig {
        reduced_motion: true,
        ..DiagramConfig::default()
    };
    let mut renderer = DiagramRenderer::new(config);
    renderer.initialize(sample_root(), repo(), VIEWPORT, now);
    renderer
}

fn frame_ids(renderer: &DiagramRenderer, now: Instant) -> Vec<String> {
    renderer
        .frame(now)
        .nodes
        .iter()
        .map(|n| n.id.to_string())
        .collect()
}

// ============================================================================
// Initialization
// ============================================================================

#[test]
fn test_uninitialized_without_viewport() {
    let now = Instant::now();
    let mut renderer = DiagramRenderer::default();
    renderer.load(sample_root(), repo(), now);

    assert!(!renderer.is_initialized());
    assert!(renderer.frame(now).is_empty());
    assert!(renderer.visible_ids().is_empty());
    for control in ViewControl::ALL {
        assert!(!renderer.control_enabled(control), "{control:?}");
    }
    assert!(!renderer.expand_all(now));
    assert!(!renderer.pan(10.0, 10.0));
    assert!(renderer.request_fullscreen().is_none());
}

#[test]
fn test_uninitialized_without_branch() {
    let now = Instant::now();
    let mut renderer = DiagramRenderer::default();
    renderer.initialize(sample_root(), RepoRef::new("org/repo", ""), VIEWPORT, now);
    assert!(!renderer.is_initialized());

    renderer.initialize(sample_root(), RepoRef::new("", "main"), VIEWPORT, now);
    assert!(!renderer.is_initialized());
}

#[test]
fn test_uninitialized_without_data() {
    let now = Instant::now();
    let mut renderer = DiagramRenderer::default();
    renderer.resize(VIEWPORT, now);
    assert!(!renderer.is_initialized());
    assert!(renderer.frame(now).is_empty());
}

#[test]
fn test_initial_state() {
    let now = Instant::now();
    let renderer = ready(now);

    assert!(renderer.is_initialized());
    assert_eq!(renderer.visible_ids(), ["", "a"]);
    for control in ViewControl::ALL {
        assert!(renderer.control_enabled(control), "{control:?}");
    }

    let frame = renderer.frame(now + SETTLED);
    assert_eq!(frame.nodes.len(), 2);
    assert_eq!(frame.links.len(), 1);
    assert_eq!(frame.links[0].key, "->a");
    assert!(!frame.animating);
}

#[test]
fn test_initial_transform() {
    let now = Instant::now();
    let renderer = ready(now);
    let frame = renderer.frame(now + SETTLED);

    let root = frame.nodes.iter().find(|n| n.id.is_empty()).unwrap();
    assert_eq!(root.screen, Point::new(160.0, 300.0));
    assert_eq!(frame.transform.scale, 0.85);
}

#[test]
fn test_node_styles() {
    let now = Instant::now();
    let mut renderer = ready(now);
    renderer.expand_all(now);
    let frame = renderer.frame(now + SETTLED);
    let style = |id: &str| frame.nodes.iter().find(|n| n.id == id).unwrap().style;

    let root = style("");
    assert_eq!(root.marker, Marker::ExpandedDirectory);
    assert_eq!(root.label, "repo");
    assert_eq!(root.tooltip, "repo");
    assert_eq!(root.label_side, LabelSide::Before);

    let file = style("a/b.txt");
    assert_eq!(file.marker, Marker::File);
    assert_eq!(file.label, "b.txt");
    assert_eq!(file.tooltip, "file: a/b.txt");
    assert_eq!(file.label_side, LabelSide::After);
    assert!(file.interactive);

    let dir = style("a/c");
    assert_eq!(dir.tooltip, "directory: a/c");
    assert!(dir.interactive);
}

#[test]
fn test_collapsed_marker_distinct_from_expanded() {
    let now = Instant::now();
    let mut renderer = ready(now);

    let marker = |r: &DiagramRenderer| {
        r.frame(now + SETTLED)
            .nodes
            .iter()
            .find(|n| n.id == "a")
            .unwrap()
            .style
            .marker
    };
    assert_eq!(marker(&renderer), Marker::CollapsedDirectory);
    assert!(!marker(&renderer).has_visible_children());
    renderer.toggle_node("a", now);
    assert_eq!(marker(&renderer), Marker::ExpandedDirectory);
    assert!(marker(&renderer).has_visible_children());
}

#[test]
fn test_zero_entries_shows_only_root() {
    let now = Instant::now();
    let mut renderer = DiagramRenderer::default();
    renderer.initialize(build(&[], "org/repo"), repo(), VIEWPORT, now);

    assert!(renderer.is_initialized());
    let frame = renderer.frame(now + SETTLED);
    assert_eq!(frame.nodes.len(), 1);
    assert!(frame.links.is_empty());

    let root = frame.nodes[0].style;
    assert_eq!(root.marker, Marker::EmptyDirectory);
    assert!(root.marker.is_directory());
    assert!(!root.marker.has_visible_children());
    assert!(!root.interactive);
    assert!(!renderer.toggle_node("", now));
}

#[test]
fn test_long_labels_truncated() {
    let now = Instant::now();
    let name = "a_really_long_file_name_here.rs";
    let mut renderer = DiagramRenderer::default();
    let root = build(&[PathEntry::blob(name, 1)], "o/r");
    renderer.initialize(root, RepoRef::new("o/r", "main"), VIEWPORT, now);

    let frame = renderer.frame(now);
    let node = frame.nodes.iter().find(|n| n.id == name).unwrap();
    assert_eq!(node.style.label, "a_really_long_file_n...");
    assert_eq!(node.style.tooltip, format!("file: {name}"));
}

// ============================================================================
// Expand / Collapse
// ============================================================================

#[test]
fn test_toggle_grows_from_source() {
    let now = Instant::now();
    let mut renderer = ready(now);
    let before = renderer.frame(now + SETTLED);
    let a = before.nodes.iter().find(|n| n.id == "a").unwrap().position;

    let later = now + SETTLED;
    assert!(renderer.toggle_node("a", later));
    assert_eq!(renderer.visible_ids(), ["", "a", "a/b.txt", "a/c"]);

    let frame = renderer.frame(later);
    let entering = frame.nodes.iter().find(|n| n.id == "a/b.txt").unwrap();
    assert_eq!(entering.phase, Phase::Entering);
    assert_eq!(entering.position, a);
    assert_eq!(entering.opacity, 0.0);
    assert_eq!(frame.links.len(), 3);

    let settled = renderer.frame(later + SETTLED);
    let done = settled.nodes.iter().find(|n| n.id == "a/b.txt").unwrap();
    assert_eq!(done.opacity, 1.0);
    assert!(done.position.x > a.x);
}

#[test]
fn test_collapse_folds_into_source() {
    let now = Instant::now();
    let mut renderer = ready(now);
    renderer.toggle_node("a", now);

    let later = now + SETTLED;
    renderer.tick(later);
    renderer.toggle_node("a", later);
    assert_eq!(renderer.visible_ids(), ["", "a"]);

    let frame = renderer.frame(later + Duration::from_millis(100));
    let exiting = frame.nodes.iter().find(|n| n.id == "a/c").unwrap();
    assert_eq!(exiting.phase, Phase::Exiting);

    let end = later + SETTLED;
    let frame = renderer.frame(end);
    let a = frame.nodes.iter().find(|n| n.id == "a").unwrap().position;
    let exiting = frame.nodes.iter().find(|n| n.id == "a/c").unwrap();
    assert_eq!(exiting.position, a);
    assert_eq!(exiting.opacity, 0.0);

    assert!(!renderer.tick(end));
    assert_eq!(frame_ids(&renderer, end), ["", "a"]);
}

#[test]
fn test_exiting_nodes_not_hit() {
    let now = Instant::now();
    let mut renderer = ready(now);
    renderer.toggle_node("a", now);
    renderer.tick(now + SETTLED);
    renderer.toggle_node("a", now + SETTLED);

    let frame = renderer.frame(now + SETTLED);
    let exiting = frame.nodes.iter().find(|n| n.id == "a/c").unwrap();
    assert_eq!(renderer.hit_test(exiting.screen, 1.0, now + SETTLED), None);
}

#[test]
fn test_toggle_twice_restores_visible_set() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.expand_all(now);
    let before: Vec<String> = renderer.visible_ids().iter().map(|s| s.to_string()).collect();

    renderer.toggle_node("a/c", now);
    assert_eq!(renderer.visible_ids(), ["", "a", "a/b.txt", "a/c"]);
    renderer.toggle_node("a/c", now);
    assert_eq!(renderer.visible_ids(), before);
}

#[test]
fn test_toggle_hidden_or_unknown_node_ignored() {
    let now = Instant::now();
    let mut renderer = ready(now);
    assert!(!renderer.toggle_node("a/c", now));
    assert!(!renderer.toggle_node("missing", now));
    assert_eq!(renderer.visible_ids(), ["", "a"]);
}

#[test]
fn test_collapse_all_then_expand_all() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    let initial: Vec<String> = renderer.visible_ids().iter().map(|s| s.to_string()).collect();

    renderer.toggle_node("a", now);
    renderer.collapse_all(now);
    assert_eq!(renderer.visible_ids(), initial);

    renderer.expand_all(now);
    let expanded = renderer.visible_ids();
    for id in &initial {
        assert!(expanded.contains(&id.as_str()), "{id}");
    }
    assert_eq!(expanded.len(), 5);
}

#[test]
fn test_controls_dispatch() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);

    assert!(renderer.activate_control(ViewControl::ExpandAll, now).is_none());
    assert_eq!(renderer.visible_ids().len(), 5);
    assert!(renderer.activate_control(ViewControl::CollapseAll, now).is_none());
    assert_eq!(renderer.visible_ids(), ["", "a"]);
    assert!(matches!(
        renderer.activate_control(ViewControl::Maximize, now),
        Some(DiagramEvent::RequestFullscreen { .. })
    ));
}

// ============================================================================
// Clicks
// ============================================================================

#[test]
fn test_click_file_opens_external() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.expand_all(now);

    let event = renderer.click_node("a/c/d.txt", now);
    assert_eq!(
        event,
        Some(DiagramEvent::OpenExternal {
            url: "https://github.com/org/repo/blob/main/a/c/d.txt".into()
        })
    );
    // Layout untouched
    assert_eq!(renderer.visible_ids().len(), 5);
}

#[test]
fn test_click_file_keeps_separators() {
    let now = Instant::now();
    let path = "docs/with space/ü.md";
    let mut renderer = instant_renderer(now);
    renderer.load(build(&[PathEntry::blob(path, 1)], "org/repo"), repo(), now);
    renderer.expand_all(now);

    let Some(DiagramEvent::OpenExternal { url }) = renderer.click_node(path, now) else {
        panic!("expected OpenExternal");
    };
    assert!(url.ends_with(path));
    assert!(!url.contains("%2F"));
}

#[test]
fn test_click_hidden_file_ignored() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    assert_eq!(renderer.click_node("a/c/d.txt", now), None);

    renderer.toggle_node("a", now);
    assert!(renderer.click_node("a/b.txt", now).is_some());
    renderer.toggle_node("a", now);
    assert_eq!(renderer.click_node("a/b.txt", now), None);
}

#[test]
fn test_click_directory_toggles() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);

    assert_eq!(renderer.click_node("a", now), None);
    assert_eq!(renderer.visible_ids().len(), 4);
    assert_eq!(renderer.click_node("a", now), None);
    assert_eq!(renderer.visible_ids().len(), 2);
}

#[test]
fn test_click_empty_directory_is_noop() {
    let now = Instant::now();
    let mut renderer = DiagramRenderer::default();
    renderer.initialize(build(&[PathEntry::tree("empty")], "o/r"), repo(), VIEWPORT, now);

    assert_eq!(renderer.click_node("empty", now), None);
    assert_eq!(renderer.visible_ids(), ["", "empty"]);
}

#[test]
fn test_hit_test_finds_root() {
    let now = Instant::now();
    let renderer = ready(now);
    assert_eq!(
        renderer.hit_test(Point::new(162.0, 301.0), 5.0, now + SETTLED),
        Some("")
    );
    assert_eq!(renderer.hit_test(Point::new(0.0, 0.0), 5.0, now + SETTLED), None);
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_to_zero_and_back_keeps_state() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.toggle_node("a", now);
    renderer.pan(50.0, 50.0);

    renderer.resize(Viewport::new(0.0, 600.0), now);
    assert!(!renderer.is_initialized());
    assert!(renderer.frame(now).is_empty());
    for control in ViewControl::ALL {
        assert!(!renderer.control_enabled(control));
    }

    renderer.resize(VIEWPORT, now);
    assert!(renderer.is_initialized());
    assert_eq!(renderer.visible_ids(), ["", "a", "a/b.txt", "a/c"]);
    assert_eq!(frame_ids(&renderer, now), ["", "a", "a/b.txt", "a/c"]);
    // Full rebuild resets the transform
    let config = DiagramConfig::default();
    assert_eq!(
        renderer.transform(),
        ViewTransform::initial(VIEWPORT, Point::ORIGIN, &config)
    );
}

#[test]
fn test_resize_while_initialized_keeps_transform() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.toggle_node("a", now);
    renderer.pan(25.0, -10.0);
    let transform = renderer.transform();

    renderer.resize(Viewport::new(1600.0, 900.0), now);
    assert!(renderer.is_initialized());
    assert_eq!(renderer.transform(), transform);
    assert_eq!(renderer.visible_ids().len(), 4);

    let wide = renderer.metrics().unwrap();
    assert_eq!(wide.level_spacing, 1350.0 / 5.0);
}

// ============================================================================
// Pan / Zoom
// ============================================================================

#[test]
fn test_pan_and_zoom_leave_layout_alone() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    let before = renderer.frame(now);
    let positions: Vec<Point> = before.nodes.iter().map(|n| n.position).collect();

    renderer.pan(30.0, 0.0);
    renderer.zoom_at(1.15, Point::new(400.0, 300.0));

    let after = renderer.frame(now);
    let moved: Vec<Point> = after.nodes.iter().map(|n| n.position).collect();
    assert_eq!(positions, moved);
    assert!((after.transform.scale - 0.85 * 1.15).abs() < 1e-5);
}

#[test]
fn test_zoom_clamped_to_extent() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    for _ in 0..100 {
        renderer.zoom_at(1.5, Point::ORIGIN);
    }
    assert_eq!(renderer.transform().scale, 5.0);
    for _ in 0..200 {
        renderer.zoom_at(0.5, Point::ORIGIN);
    }
    assert_eq!(renderer.transform().scale, 0.05);
}

#[test]
fn test_set_transform_clamps() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.set_transform(ViewTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale: 20.0,
    });
    assert_eq!(renderer.transform().scale, 5.0);
}

#[test]
fn test_set_transform_clamp_keeps_translation() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    assert!(renderer.set_transform(ViewTransform {
        translate_x: 12.0,
        translate_y: -4.0,
        scale: 0.001,
    }));
    assert_eq!(
        renderer.transform(),
        ViewTransform {
            translate_x: 12.0,
            translate_y: -4.0,
            scale: 0.05,
        }
    );
}

#[test]
fn test_set_transform_rejects_degenerate_scale() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    let before = renderer.transform();

    for scale in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let accepted = renderer.set_transform(ViewTransform {
            translate_x: 0.0,
            translate_y: 10.0,
            scale,
        });
        assert!(!accepted, "scale {scale} accepted");
    }
    assert!(!renderer.set_transform(ViewTransform {
        translate_x: f32::NAN,
        translate_y: 0.0,
        scale: 1.0,
    }));

    assert_eq!(renderer.transform(), before);
    let p = renderer.transform().apply(Point::new(1.0, 1.0));
    assert!(p.x.is_finite() && p.y.is_finite());
}

// ============================================================================
// Fullscreen
// ============================================================================

#[test]
fn test_request_fullscreen() {
    let now = Instant::now();
    let renderer = ready(now);

    let Some(DiagramEvent::RequestFullscreen {
        root,
        display_name,
        branch,
    }) = renderer.request_fullscreen()
    else {
        panic!("expected RequestFullscreen");
    };
    assert!(Arc::ptr_eq(&root, renderer.root().unwrap()));
    assert_eq!(display_name, "org/repo");
    assert_eq!(branch, "main");
}

#[test]
fn test_fullscreen_keeps_state() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.toggle_node("a", now);
    renderer.zoom_at(2.0, Point::new(100.0, 100.0));
    let transform = renderer.transform();

    renderer.set_fullscreen(true);
    assert!(renderer.is_fullscreen());
    assert!(!renderer.control_enabled(ViewControl::Maximize));
    assert!(renderer.request_fullscreen().is_none());
    assert_eq!(renderer.transform(), transform);
    assert_eq!(renderer.visible_ids().len(), 4);
}

// ============================================================================
// Data Replacement
// ============================================================================

#[test]
fn test_load_discards_previous_diagram() {
    let now = Instant::now();
    let mut renderer = ready(now);
    renderer.toggle_node("a", now);

    let other = build(&[PathEntry::blob("x.rs", 1)], "org/other");
    renderer.load(other, RepoRef::new("org/other", "dev"), now);

    assert_eq!(frame_ids(&renderer, now), ["", "x.rs"]);
    assert!(renderer.frame(now).links.iter().all(|l| l.key == "->x.rs"));
    assert_eq!(renderer.root().unwrap().name, "other");
}

#[test]
fn test_reload_resets_collapse_state() {
    let now = Instant::now();
    let mut renderer = instant_renderer(now);
    renderer.expand_all(now);
    renderer.load(sample_root(), repo(), now);
    assert_eq!(renderer.visible_ids(), ["", "a"]);
}

#[test]
fn test_unload() {
    let now = Instant::now();
    let mut renderer = ready(now);
    renderer.unload();
    assert!(!renderer.is_initialized());
    assert!(renderer.root().is_none());
    assert!(renderer.frame(now).is_empty());
}
