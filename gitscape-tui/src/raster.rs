//! Rasterization of diagram frames and window chrome into a cell buffer.
//!
//! The diagram engine works in device-independent units. One terminal cell
//! covers `cell_width` x `cell_height` of them, so a point maps to the cell
//! containing it.

use gitscape_diagram::scene::Phase;
use gitscape_diagram::{Frame, LabelSide, LinkFrame, Marker, NodeFrame, Point, ViewControl};

use crate::buffer::{Buffer, display_width};
use crate::theme::Theme;

/// Sprites fainter than this are not drawn.
const MIN_VISIBLE: f32 = 0.05;

/// Upper bound of samples taken along one connector.
const MAX_LINK_SAMPLES: usize = 4096;

/// Size of one cell in diagram units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width: f32,
    pub height: f32,
}

/// A rectangle of cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Area {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Area {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    fn contains_signed(&self, x: i32, y: i32) -> bool {
        x >= self.x as i32
            && x < (self.x + self.width) as i32
            && y >= self.y as i32
            && y < (self.y + self.height) as i32
    }

    /// Centre of cell `(x, y)` in diagram-surface units.
    pub fn to_surface(&self, x: u16, y: u16, metrics: CellMetrics) -> Point {
        Point::new(
            (x as f32 - self.x as f32 + 0.5) * metrics.width,
            (y as f32 - self.y as f32 + 0.5) * metrics.height,
        )
    }

    /// Cell containing the surface point `p`.
    pub fn to_cell(&self, p: Point, metrics: CellMetrics) -> (i32, i32) {
        (
            self.x as i32 + (p.x / metrics.width).floor() as i32,
            self.y as i32 + (p.y / metrics.height).floor() as i32,
        )
    }

    fn columns(&self) -> (i32, i32) {
        (self.x as i32, (self.x + self.width) as i32)
    }
}

/// Cells covered by one node's marker and label.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeSpan {
    row: i32,
    start: i32,
    end: i32,
    id: String,
}

/// Which node was drawn where, for mouse hit testing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitMap {
    spans: Vec<NodeSpan>,
}

impl HitMap {
    /// The node drawn last at `(x, y)`.
    pub fn at(&self, x: u16, y: u16) -> Option<&str> {
        let (x, y) = (x as i32, y as i32);
        self.spans
            .iter()
            .rev()
            .find(|span| span.row == y && x >= span.start && x < span.end)
            .map(|span| span.id.as_str())
    }
}

/// Draw links then nodes of `frame` inside `area`.
pub fn paint_diagram(
    buf: &mut Buffer,
    area: Area,
    frame: &Frame<'_>,
    metrics: CellMetrics,
    theme: &Theme,
) -> HitMap {
    buf.fill(area.x as i32, area.y as i32, area.width, area.height, theme.background);

    for link in &frame.links {
        paint_link(buf, area, link, metrics, theme);
    }

    // Nodes on their way out are drawn but cannot be clicked
    let mut hits = HitMap::default();
    for node in &frame.nodes {
        let span = paint_node(buf, area, node, metrics, theme);
        if let Some(span) = span.filter(|_| node.phase != Phase::Exiting) {
            hits.spans.push(span);
        }
    }
    hits
}

fn paint_link(
    buf: &mut Buffer,
    area: Area,
    link: &LinkFrame<'_>,
    metrics: CellMetrics,
    theme: &Theme,
) {
    if link.opacity < MIN_VISIBLE {
        return;
    }
    let color = theme.link.fade(theme.background, link.opacity);
    let cell = metrics.width.min(metrics.height);
    let segments =
        ((link.connector.hull_length() / cell).ceil() as usize * 2).clamp(2, MAX_LINK_SAMPLES);
    let points = link.connector.sample(segments);

    for pair in points.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let dx = (to.x - from.x) / metrics.width;
        let dy = (to.y - from.y) / metrics.height;
        let (cx, cy) = area.to_cell(from, metrics);
        if !area.contains_signed(cx, cy) {
            continue;
        }
        buf.put_char(cx, cy, link_glyph(dx, dy), color);
    }
}

/// Line glyph for a step of `(dx, dy)` cells, y growing downwards.
fn link_glyph(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs());
    if ay <= ax * 0.5 {
        '─'
    } else if ax <= ay * 0.5 {
        '│'
    } else if (dx > 0.0) == (dy < 0.0) {
        '╱'
    } else {
        '╲'
    }
}

pub fn marker_glyph(marker: Marker) -> char {
    match marker {
        Marker::File => '•',
        Marker::ExpandedDirectory => '●',
        Marker::CollapsedDirectory | Marker::EmptyDirectory => '○',
    }
}

fn paint_node(
    buf: &mut Buffer,
    area: Area,
    node: &NodeFrame<'_>,
    metrics: CellMetrics,
    theme: &Theme,
) -> Option<NodeSpan> {
    if node.opacity < MIN_VISIBLE {
        return None;
    }
    let (cx, cy) = area.to_cell(node.screen, metrics);
    if cy < area.y as i32 || cy >= (area.y + area.height) as i32 {
        return None;
    }

    let style = node.style;
    let base = if style.marker.is_directory() {
        theme.directory
    } else {
        theme.file
    };
    if area.contains_signed(cx, cy) {
        let color = base.fade(theme.background, node.opacity);
        buf.put_char(cx, cy, marker_glyph(style.marker), color);
    }

    // The blank between marker and label hides links passing underneath
    let text = theme.text.fade(theme.background, node.opacity);
    let width = display_width(&style.label) as i32;
    let (start, label) = match style.label_side {
        LabelSide::After => (cx + 1, format!(" {}", style.label)),
        LabelSide::Before => (cx - 1 - width, format!("{} ", style.label)),
    };
    buf.put_str_clipped(start, cy, &label, text, node.id.is_empty(), area.columns());

    let (span_start, span_end) = match style.label_side {
        LabelSide::After => (cx, cx + 2 + width),
        LabelSide::Before => (start, cx + 1),
    };
    Some(NodeSpan {
        row: cy,
        start: span_start,
        end: span_end,
        id: node.id.to_string(),
    })
}

/// A clickable toolbar button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRegion {
    pub control: ViewControl,
    pub row: u16,
    pub start: u16,
    pub end: u16,
}

impl ControlRegion {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        y == self.row && x >= self.start && x < self.end
    }
}

pub fn control_label(control: ViewControl) -> &'static str {
    match control {
        ViewControl::Maximize => "[ Fullscreen ]",
        ViewControl::ExpandAll => "[ Expand all ]",
        ViewControl::CollapseAll => "[ Collapse all ]",
    }
}

/// Title on the left, view controls on the right of row `row`.
pub fn paint_toolbar(
    buf: &mut Buffer,
    row: u16,
    title: &str,
    controls: &[(ViewControl, bool)],
    theme: &Theme,
) -> Vec<ControlRegion> {
    let width = buf.width();
    buf.fill(0, row as i32, width, 1, theme.panel);
    buf.put_str(1, row as i32, title, theme.accent, true);

    let total: usize = controls
        .iter()
        .map(|(control, _)| display_width(control_label(*control)) + 1)
        .sum();
    let mut x = (width as usize).saturating_sub(total) as u16;
    let mut regions = Vec::with_capacity(controls.len());
    for &(control, enabled) in controls {
        let label = control_label(control);
        let color = if enabled {
            theme.control
        } else {
            theme.control_disabled
        };
        let written = buf.put_str(x as i32, row as i32, label, color, enabled) as u16;
        if enabled {
            regions.push(ControlRegion {
                control,
                row,
                start: x,
                end: x.saturating_add(written),
            });
        }
        x = x.saturating_add(written + 1);
    }
    regions
}

/// Box-drawing border around `area`, with `title` on the top edge.
pub fn paint_border(buf: &mut Buffer, area: Area, title: &str, theme: &Theme) {
    if area.width < 2 || area.height < 2 {
        return;
    }
    let (left, top) = (area.x as i32, area.y as i32);
    let right = left + area.width as i32 - 1;
    let bottom = top + area.height as i32 - 1;

    for x in left + 1..right {
        buf.put_char(x, top, '─', theme.border);
        buf.put_char(x, bottom, '─', theme.border);
    }
    for y in top + 1..bottom {
        buf.put_char(left, y, '│', theme.border);
        buf.put_char(right, y, '│', theme.border);
    }
    buf.put_char(left, top, '┌', theme.border);
    buf.put_char(right, top, '┐', theme.border);
    buf.put_char(left, bottom, '└', theme.border);
    buf.put_char(right, bottom, '┘', theme.border);

    if !title.is_empty() {
        let label = format!(" {title} ");
        buf.put_str_clipped(left + 2, top, &label, theme.muted, false, (left + 1, right));
    }
}

/// Centred placeholder shown while the diagram cannot be drawn.
pub fn paint_overlay(buf: &mut Buffer, area: Area, message: &str, theme: &Theme) {
    buf.fill(area.x as i32, area.y as i32, area.width, area.height, theme.background);
    if area.height == 0 {
        return;
    }
    let width = display_width(message) as i32;
    let x = area.x as i32 + (area.width as i32 - width) / 2;
    let y = area.y as i32 + area.height as i32 / 2;
    buf.put_str_clipped(x, y, message, theme.muted, false, area.columns());
}

pub fn paint_status(buf: &mut Buffer, row: u16, text: &str, theme: &Theme) {
    let width = buf.width();
    buf.fill(0, row as i32, width, 1, theme.panel);
    buf.put_str(1, row as i32, text, theme.text, false);
}
