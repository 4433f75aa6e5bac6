//! Layered tree layout over the visible hierarchy.
//!
//! Depth runs left to right. Every visible leaf (files, empty directories and
//! collapsed directories alike) takes the next row on the cross axis, and a
//! parent is centred between its first and last visible child, so each subtree
//! occupies a contiguous band of rows and siblings keep builder order. The
//! root ends up at the origin.

use crate::arena::{LayoutArena, NodeIdx};
use crate::config::DiagramConfig;
use crate::geometry::{Point, Viewport};

/// Spacing used by one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelMetrics {
    /// Distance between depth levels.
    pub level_spacing: f32,
    /// Distance between adjacent rows.
    pub node_spacing: f32,
    /// Deepest visible level.
    pub max_depth: usize,
    /// Number of rows used by visible leaves.
    pub rows: usize,
}

impl LevelMetrics {
    /// Deep trees are squeezed into the viewport width, shallow ones get at
    /// least `min_level_spacing`.
    pub fn level_spacing(max_depth: usize, viewport: Viewport, config: &DiagramConfig) -> f32 {
        let usable = viewport.width - config.margins.left - config.margins.right;
        let levels = max_depth as f32 + config.depth_slack;
        let fitted = if levels > 0.0 { usable / levels } else { usable };
        fitted.max(config.min_level_spacing)
    }
}

/// Lay out the visible hierarchy of `arena`.
///
/// The position each node had before this pass is kept in
/// `previous_position`; nodes never laid out before keep `None` there.
pub fn layout(arena: &mut LayoutArena, viewport: Viewport, config: &DiagramConfig) -> LevelMetrics {
    snapshot_positions(arena);

    let order = arena.visible_order();
    let max_depth = order
        .iter()
        .map(|&idx| arena.get(idx).depth)
        .max()
        .unwrap_or(0);
    let level_spacing = LevelMetrics::level_spacing(max_depth, viewport, config);

    let mut rows = 0usize;
    let root_row = place(arena, LayoutArena::ROOT, &mut rows);

    for &idx in &order {
        let node = arena.get_mut(idx);
        node.position = Point::new(
            node.depth as f32 * level_spacing,
            (node.position.y - root_row) * config.node_spacing,
        );
    }

    log::debug!(
        "layout: {} visible nodes, depth {max_depth}, {rows} rows, level spacing {level_spacing:.1}",
        order.len()
    );

    LevelMetrics {
        level_spacing,
        node_spacing: config.node_spacing,
        max_depth,
        rows,
    }
}

/// Assign rows bottom-up; `position.y` temporarily holds the row index.
fn place(arena: &mut LayoutArena, idx: NodeIdx, next_row: &mut usize) -> f32 {
    let children = arena.get(idx).visible_children().to_vec();
    let row = if children.is_empty() {
        let row = *next_row as f32;
        *next_row += 1;
        row
    } else {
        let rows: Vec<f32> = children
            .iter()
            .map(|&child| place(arena, child, next_row))
            .collect();
        let first = rows.first().copied().unwrap_or_default();
        let last = rows.last().copied().unwrap_or_default();
        (first + last) / 2.0
    };
    arena.get_mut(idx).position.y = row;
    row
}

fn snapshot_positions(arena: &mut LayoutArena) {
    let placed: Vec<NodeIdx> = arena
        .iter()
        .filter(|(_, node)| node.laid_out)
        .map(|(idx, _)| idx)
        .collect();
    for idx in placed {
        let node = arena.get_mut(idx);
        node.previous_position = Some(node.position);
    }
    for idx in arena.visible_order() {
        arena.get_mut(idx).laid_out = true;
    }
}
