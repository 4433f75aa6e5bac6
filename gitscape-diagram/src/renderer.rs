//! The interactive diagram state machine.
//!
//! [`DiagramRenderer`] owns everything that changes while a diagram is on
//! screen: expand/collapse state, layout positions, animated sprites and the
//! pan/zoom transform. It stays uninitialized, drawing nothing, until it has a
//! tree, a display name, a branch and a viewport with nonzero extent.
//!
//! Every state change runs one synchronous pass: lay out the visible
//! hierarchy, diff it against what is on screen, and retarget sprites. The
//! animation itself is sampled later through [`DiagramRenderer::frame`].

use std::sync::Arc;
use std::time::Instant;

use crate::arena::{Branch, LayoutArena, NodeIdx, NodeShape};
use crate::config::DiagramConfig;
use crate::event::{DiagramEvent, ViewControl};
use crate::geometry::{Point, Viewport};
use crate::label::{tooltip, truncate_label};
use crate::layout::{LevelMetrics, layout};
use crate::link::{Connector, horizontal_connector};
use crate::model::{DiagramNode, NodeKind};
use crate::reconcile::{link_key, reconcile};
use crate::scene::{Layer, LinkVisual, NodeVisual, Phase};
use crate::transform::ViewTransform;

/// Repository the diagram belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// `owner/repo`
    pub display_name: String,
    pub branch: String,
}

impl RepoRef {
    pub fn new(display_name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            branch: branch.into(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.display_name.is_empty() && !self.branch.is_empty()
    }
}

/// How a node marker is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    File,
    /// Directory without any children.
    EmptyDirectory,
    /// Directory whose children are hidden.
    CollapsedDirectory,
    /// Directory whose children are visible.
    ExpandedDirectory,
}

impl Marker {
    pub fn is_directory(self) -> bool {
        self != Marker::File
    }

    pub fn has_visible_children(self) -> bool {
        self == Marker::ExpandedDirectory
    }
}

/// Which side of the marker the label sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    /// Left of the marker, text ending at it.
    Before,
    /// Right of the marker.
    After,
}

/// Presentation of a node that does not animate.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyle {
    pub kind: NodeKind,
    pub marker: Marker,
    pub label: String,
    pub label_side: LabelSide,
    pub tooltip: String,
    /// Clicking does something (files and directories with children).
    pub interactive: bool,
}

/// Ids of the nodes a link connects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkEnds {
    pub parent: String,
    pub child: String,
}

/// A node as it should be drawn right now.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeFrame<'a> {
    pub id: &'a str,
    pub style: &'a NodeStyle,
    /// Interpolated position in diagram space.
    pub position: Point,
    /// The same position after the view transform.
    pub screen: Point,
    pub opacity: f32,
    pub phase: Phase,
}

/// A link as it should be drawn right now.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkFrame<'a> {
    pub key: &'a str,
    pub ends: &'a LinkEnds,
    /// Connector in screen space.
    pub connector: Connector,
    pub opacity: f32,
    pub phase: Phase,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame<'a> {
    pub links: Vec<LinkFrame<'a>>,
    pub nodes: Vec<NodeFrame<'a>>,
    pub transform: ViewTransform,
    pub animating: bool,
}

impl Frame<'_> {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty()
    }
}

/// Interactive renderer for one diagram at a time.
#[derive(Debug)]
pub struct DiagramRenderer {
    config: DiagramConfig,
    root: Option<Arc<DiagramNode>>,
    repo: Option<RepoRef>,
    arena: Option<LayoutArena>,
    viewport: Viewport,
    transform: ViewTransform,
    metrics: Option<LevelMetrics>,
    nodes: Layer<NodeVisual, NodeStyle>,
    links: Layer<LinkVisual, LinkEnds>,
    initialized: bool,
    fullscreen: bool,
}

impl Default for DiagramRenderer {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl DiagramRenderer {
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config,
            root: None,
            repo: None,
            arena: None,
            viewport: Viewport::default(),
            transform: ViewTransform::identity(),
            metrics: None,
            nodes: Layer::new(),
            links: Layer::new(),
            initialized: false,
            fullscreen: false,
        }
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Replace the diagram and viewport in one go.
    pub fn initialize(&mut self, root: DiagramNode, repo: RepoRef, viewport: Viewport, now: Instant) {
        self.viewport = viewport;
        self.load(root, repo, now);
    }

    /// Replace the diagram, discarding every sprite and in-flight transition
    /// of the previous one. Expand/collapse state starts over from the
    /// default.
    pub fn load(&mut self, root: DiagramNode, repo: RepoRef, now: Instant) {
        self.discard();
        self.arena = Some(LayoutArena::from_tree(&root));
        self.root = Some(Arc::new(root));
        self.repo = Some(repo);
        self.activate(now);
    }

    /// Forget the current diagram.
    pub fn unload(&mut self) {
        self.discard();
        self.arena = None;
        self.root = None;
        self.repo = None;
    }

    /// React to a new viewport size.
    ///
    /// A zero-sized viewport makes the renderer uninitialized. Coming back
    /// from that state is a full rebuild (transform reset) that keeps the
    /// current expand/collapse state; otherwise the layout is recomputed and
    /// the transform kept.
    pub fn resize(&mut self, viewport: Viewport, now: Instant) {
        if viewport == self.viewport && self.initialized {
            return;
        }
        self.viewport = viewport;
        if self.initialized && self.ready_to_render() {
            self.update(LayoutArena::ROOT, now);
        } else {
            self.activate(now);
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn root(&self) -> Option<&Arc<DiagramNode>> {
        self.root.as_ref()
    }

    pub fn repo(&self) -> Option<&RepoRef> {
        self.repo.as_ref()
    }

    pub fn arena(&self) -> Option<&LayoutArena> {
        self.arena.as_ref()
    }

    pub fn metrics(&self) -> Option<LevelMetrics> {
        self.metrics
    }

    fn ready_to_render(&self) -> bool {
        self.arena.is_some()
            && self.repo.as_ref().is_some_and(RepoRef::is_complete)
            && !self.viewport.is_empty()
    }

    /// Full rebuild: lay out from the root and reset the transform, or fall
    /// back to uninitialized when inputs are missing.
    fn activate(&mut self, now: Instant) {
        if !self.ready_to_render() {
            if self.initialized {
                log::info!("diagram uninitialized (viewport {:?})", self.viewport);
            }
            self.discard();
            return;
        }

        self.initialized = true;
        self.update(LayoutArena::ROOT, now);
        let root = self
            .arena
            .as_ref()
            .map(|arena| arena.get(LayoutArena::ROOT).position)
            .unwrap_or_default();
        self.transform = ViewTransform::initial(self.viewport, root, &self.config);
        log::info!(
            "diagram initialized: {} nodes, viewport {}x{}",
            self.arena.as_ref().map_or(0, LayoutArena::len),
            self.viewport.width,
            self.viewport.height
        );
    }

    fn discard(&mut self) {
        self.nodes.clear();
        self.links.clear();
        self.metrics = None;
        self.initialized = false;
    }

    // -------------------------------------------------------------------------
    // Expand / collapse
    // -------------------------------------------------------------------------

    /// Toggle one directory. Returns false when nothing changed.
    pub fn toggle_node(&mut self, id: &str, now: Instant) -> bool {
        if !self.initialized {
            return false;
        }
        let Some(arena) = self.arena.as_mut() else {
            return false;
        };
        let Some(idx) = arena.lookup(id) else {
            log::debug!("toggle on unknown node '{id}'");
            return false;
        };
        if !arena.is_visible(idx) || !arena.toggle(idx) {
            return false;
        }
        self.update(idx, now);
        true
    }

    /// A click on a node: directories toggle, files ask the host to open them.
    pub fn click_node(&mut self, id: &str, now: Instant) -> Option<DiagramEvent> {
        if !self.initialized {
            return None;
        }
        let kind = self.arena.as_ref()?.node(id)?.kind;
        match kind {
            NodeKind::Directory => {
                self.toggle_node(id, now);
                None
            }
            NodeKind::File if !id.is_empty() => {
                let arena = self.arena.as_ref()?;
                if !arena.is_visible(arena.lookup(id)?) {
                    return None;
                }
                let repo = self.repo.as_ref()?;
                let url = self.config.file_url(&repo.display_name, &repo.branch, id);
                log::debug!("open external {url}");
                Some(DiagramEvent::OpenExternal { url })
            }
            NodeKind::File => None,
        }
    }

    pub fn expand_all(&mut self, now: Instant) -> bool {
        if !self.initialized {
            return false;
        }
        let Some(arena) = self.arena.as_mut() else {
            return false;
        };
        arena.expand_all();
        self.update(LayoutArena::ROOT, now);
        true
    }

    pub fn collapse_all(&mut self, now: Instant) -> bool {
        if !self.initialized {
            return false;
        }
        let Some(arena) = self.arena.as_mut() else {
            return false;
        };
        arena.collapse_all();
        self.update(LayoutArena::ROOT, now);
        true
    }

    /// Ids of the nodes currently part of the visible hierarchy.
    pub fn visible_ids(&self) -> Vec<&str> {
        match (&self.arena, self.initialized) {
            (Some(arena), true) => arena.visible_ids(),
            _ => Vec::new(),
        }
    }

    // -------------------------------------------------------------------------
    // View controls
    // -------------------------------------------------------------------------

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Mark the container this instance is hosted in. Nothing else changes.
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    /// Ask the host for fullscreen, unless already there.
    pub fn request_fullscreen(&self) -> Option<DiagramEvent> {
        if !self.control_enabled(ViewControl::Maximize) {
            return None;
        }
        let repo = self.repo.as_ref()?;
        Some(DiagramEvent::RequestFullscreen {
            root: Arc::clone(self.root.as_ref()?),
            display_name: repo.display_name.clone(),
            branch: repo.branch.clone(),
        })
    }

    pub fn control_enabled(&self, control: ViewControl) -> bool {
        match control {
            ViewControl::Maximize => self.initialized && !self.fullscreen,
            ViewControl::ExpandAll | ViewControl::CollapseAll => self.initialized,
        }
    }

    pub fn activate_control(&mut self, control: ViewControl, now: Instant) -> Option<DiagramEvent> {
        match control {
            ViewControl::Maximize => self.request_fullscreen(),
            ViewControl::ExpandAll => {
                self.expand_all(now);
                None
            }
            ViewControl::CollapseAll => {
                self.collapse_all(now);
                None
            }
        }
    }

    // -------------------------------------------------------------------------
    // Pan / zoom
    // -------------------------------------------------------------------------

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        if !self.initialized {
            return false;
        }
        self.transform = self.transform.pan(dx, dy);
        true
    }

    /// Zoom by `factor` around the screen point `anchor`.
    pub fn zoom_at(&mut self, factor: f32, anchor: Point) -> bool {
        if !self.initialized {
            return false;
        }
        self.transform = self
            .transform
            .zoom_at(factor, anchor, self.config.scale_extent());
        true
    }

    /// Replace the transform, clamping its scale. Non-finite values or a
    /// scale that is not positive leave the current transform in place.
    pub fn set_transform(&mut self, transform: ViewTransform) -> bool {
        if !self.initialized {
            return false;
        }
        if !transform.is_valid() {
            log::debug!("ignoring transform {transform:?}");
            return false;
        }
        self.transform = transform.clamped(self.config.scale_extent());
        true
    }

    // -------------------------------------------------------------------------
    // Layout pass
    // -------------------------------------------------------------------------

    /// Lay out, reconcile and retarget sprites. `source` is the node new
    /// elements grow out of and removed ones fold back into.
    fn update(&mut self, source: NodeIdx, now: Instant) {
        let Some(arena) = self.arena.as_mut() else {
            return;
        };
        let config = &self.config;
        self.metrics = Some(layout(arena, self.viewport, config));

        let anchor = arena.get(source);
        let grow_from = anchor.previous_position.unwrap_or(anchor.position);
        let fold_into = anchor.position;
        let transition = config.transition();

        // Nodes
        let order = arena.visible_order();
        let next: Vec<String> = order.iter().map(|&idx| arena.get(idx).id.clone()).collect();
        let diff = reconcile(&self.nodes.live_keys(), &next);
        for id in &diff.enter {
            if let Some(idx) = arena.lookup(id) {
                self.nodes.enter(
                    id,
                    NodeVisual::hidden(grow_from),
                    NodeVisual::shown(arena.get(idx).position),
                    node_style(arena, idx, config),
                    now,
                    transition,
                );
            }
        }
        for id in &diff.update {
            if let Some(idx) = arena.lookup(id) {
                self.nodes.update(
                    id,
                    NodeVisual::shown(arena.get(idx).position),
                    node_style(arena, idx, config),
                    now,
                    transition,
                );
            }
        }
        for id in &diff.exit {
            self.nodes
                .exit(id, NodeVisual::hidden(fold_into), now, transition);
        }
        self.nodes.arrange(&next);

        // Links
        let pairs = arena.visible_links();
        let mut next_links = Vec::with_capacity(pairs.len());
        let mut targets = Vec::with_capacity(pairs.len());
        for &(parent, child) in &pairs {
            let (parent, child) = (arena.get(parent), arena.get(child));
            next_links.push(link_key(&parent.id, &child.id));
            targets.push((
                LinkVisual::shown(parent.position, child.position),
                LinkEnds {
                    parent: parent.id.clone(),
                    child: child.id.clone(),
                },
            ));
        }
        let link_diff = reconcile(&self.links.live_keys(), &next_links);
        let entering: std::collections::HashSet<&String> = link_diff.enter.iter().collect();
        for (key, (to, ends)) in next_links.iter().zip(targets) {
            if entering.contains(key) {
                self.links
                    .enter(key, LinkVisual::folded(grow_from), to, ends, now, transition);
            } else {
                self.links.update(key, to, ends, now, transition);
            }
        }
        for key in &link_diff.exit {
            self.links
                .exit(key, LinkVisual::folded(fold_into), now, transition);
        }
        self.links.arrange(&next_links);

        log::debug!(
            "reconciled from '{}': nodes +{} ~{} -{}, links +{} ~{} -{}",
            arena.get(source).id,
            diff.enter.len(),
            diff.update.len(),
            diff.exit.len(),
            link_diff.enter.len(),
            link_diff.update.len(),
            link_diff.exit.len()
        );
    }

    // -------------------------------------------------------------------------
    // Sampling
    // -------------------------------------------------------------------------

    /// Retire finished transitions. Returns true while anything still moves.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.nodes.prune(now);
        self.links.prune(now);
        self.is_animating(now)
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.nodes.is_animating(now) || self.links.is_animating(now)
    }

    /// Sample every sprite at `now`.
    pub fn frame(&self, now: Instant) -> Frame<'_> {
        if !self.initialized {
            return Frame {
                links: Vec::new(),
                nodes: Vec::new(),
                transform: self.transform,
                animating: false,
            };
        }

        let transform = self.transform;
        let links = self
            .links
            .iter()
            .map(|sprite| {
                let visual = sprite.tween.value_at(now);
                LinkFrame {
                    key: &sprite.key,
                    ends: &sprite.data,
                    connector: horizontal_connector(
                        transform.apply(visual.source),
                        transform.apply(visual.target),
                    ),
                    opacity: visual.opacity,
                    phase: sprite.phase,
                }
            })
            .collect();
        let nodes = self
            .nodes
            .iter()
            .map(|sprite| {
                let visual = sprite.tween.value_at(now);
                NodeFrame {
                    id: &sprite.key,
                    style: &sprite.data,
                    position: visual.position,
                    screen: transform.apply(visual.position),
                    opacity: visual.opacity,
                    phase: sprite.phase,
                }
            })
            .collect();

        Frame {
            links,
            nodes,
            transform,
            animating: self.is_animating(now),
        }
    }

    /// The node whose marker is closest to `screen`, within `radius` screen
    /// units. Exiting nodes are not hit.
    pub fn hit_test(&self, screen: Point, radius: f32, now: Instant) -> Option<&str> {
        if !self.initialized {
            return None;
        }
        self.nodes
            .iter()
            .filter(|sprite| sprite.phase != Phase::Exiting)
            .map(|sprite| {
                let at = self.transform.apply(sprite.tween.value_at(now).position);
                (sprite.key.as_str(), at.distance(screen))
            })
            .filter(|&(_, distance)| distance <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }
}

fn node_style(arena: &LayoutArena, idx: NodeIdx, config: &DiagramConfig) -> NodeStyle {
    let node = arena.get(idx);
    let marker = match &node.shape {
        NodeShape::File => Marker::File,
        NodeShape::Directory(branch) if branch.children().is_empty() => Marker::EmptyDirectory,
        NodeShape::Directory(Branch::Expanded(_)) => Marker::ExpandedDirectory,
        NodeShape::Directory(Branch::Collapsed(_)) => Marker::CollapsedDirectory,
    };
    let has_children = node.has_children();
    NodeStyle {
        kind: node.kind,
        marker,
        label: truncate_label(&node.name, config.label_budget, config.label_keep),
        label_side: if has_children {
            LabelSide::Before
        } else {
            LabelSide::After
        },
        tooltip: tooltip(node.kind, &node.id, &node.name),
        interactive: node.kind == NodeKind::File || has_children,
    }
}
