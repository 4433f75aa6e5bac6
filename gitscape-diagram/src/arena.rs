//! Render-time node state.
//!
//! The built [`DiagramNode`] tree is flattened into an arena of
//! [`LayoutNode`]s indexed by [`NodeIdx`]. Parents are referenced by index
//! only, and every directory carries its children in a [`Branch`] that is
//! either expanded (children attached to the visible hierarchy) or collapsed
//! (children held back).

use std::collections::HashMap;

use crate::geometry::Point;
use crate::model::{DiagramNode, NodeKind};

/// Index of a node inside a [`LayoutArena`].
pub type NodeIdx = usize;

/// Children of a directory, attached or detached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Branch {
    Expanded(Vec<NodeIdx>),
    Collapsed(Vec<NodeIdx>),
}

impl Branch {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Branch::Expanded(_))
    }

    /// Children regardless of state.
    pub fn children(&self) -> &[NodeIdx] {
        match self {
            Branch::Expanded(children) | Branch::Collapsed(children) => children,
        }
    }

    fn expand(&mut self) {
        if let Branch::Collapsed(hidden) = self {
            *self = Branch::Expanded(std::mem::take(hidden));
        }
    }

    fn collapse(&mut self) {
        if let Branch::Expanded(children) = self {
            *self = Branch::Collapsed(std::mem::take(children));
        }
    }

    fn toggle(&mut self) {
        if self.is_expanded() {
            self.collapse();
        } else {
            self.expand();
        }
    }
}

/// Files have no expand state; directories always have a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeShape {
    File,
    Directory(Branch),
}

/// The renderer's mutable view of one [`DiagramNode`].
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub weight: u64,
    pub depth: usize,
    pub parent: Option<NodeIdx>,
    pub shape: NodeShape,
    /// Position from the latest layout pass.
    pub position: Point,
    /// Position before the latest layout pass.
    pub previous_position: Option<Point>,
    /// Set once a layout pass has positioned this node.
    pub laid_out: bool,
}

impl LayoutNode {
    /// Children currently attached to the visible hierarchy.
    pub fn visible_children(&self) -> &[NodeIdx] {
        match &self.shape {
            NodeShape::Directory(Branch::Expanded(children)) => children,
            _ => &[],
        }
    }

    /// Children detached while the directory is collapsed.
    pub fn hidden_children(&self) -> &[NodeIdx] {
        match &self.shape {
            NodeShape::Directory(Branch::Collapsed(hidden)) => hidden,
            _ => &[],
        }
    }

    pub fn has_children(&self) -> bool {
        match &self.shape {
            NodeShape::Directory(branch) => !branch.children().is_empty(),
            NodeShape::File => false,
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(&self.shape, NodeShape::Directory(branch) if branch.is_expanded())
    }
}

/// All layout nodes of one diagram, root at index 0.
#[derive(Debug, Clone)]
pub struct LayoutArena {
    nodes: Vec<LayoutNode>,
    index: HashMap<String, NodeIdx>,
}

impl LayoutArena {
    pub const ROOT: NodeIdx = 0;

    /// Flatten `root` in the default state: root expanded, every other
    /// directory collapsed.
    pub fn from_tree(root: &DiagramNode) -> Self {
        let mut arena = Self {
            nodes: Vec::with_capacity(root.count()),
            index: HashMap::new(),
        };
        arena.insert(root, None, 0);
        arena
    }

    fn insert(&mut self, node: &DiagramNode, parent: Option<NodeIdx>, depth: usize) -> NodeIdx {
        let idx = self.nodes.len();
        self.nodes.push(LayoutNode {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            weight: node.weight,
            depth,
            parent,
            shape: NodeShape::File,
            position: Point::ORIGIN,
            previous_position: None,
            laid_out: false,
        });
        self.index.insert(node.id.clone(), idx);

        if let Some(children) = node.child_nodes() {
            let children: Vec<NodeIdx> = children
                .iter()
                .map(|child| self.insert(child, Some(idx), depth + 1))
                .collect();
            self.nodes[idx].shape = NodeShape::Directory(if depth == 0 {
                Branch::Expanded(children)
            } else {
                Branch::Collapsed(children)
            });
        } else if !node.children.is_empty() {
            log::warn!(
                "file '{}' carries {} children; they are not displayed",
                node.id,
                node.children.len()
            );
        }
        idx
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, idx: NodeIdx) -> &LayoutNode {
        &self.nodes[idx]
    }

    pub fn get_mut(&mut self, idx: NodeIdx) -> &mut LayoutNode {
        &mut self.nodes[idx]
    }

    pub fn lookup(&self, id: &str) -> Option<NodeIdx> {
        self.index.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.lookup(id).map(|idx| &self.nodes[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeIdx, &LayoutNode)> {
        self.nodes.iter().enumerate()
    }

    /// Flip one directory between expanded and collapsed.
    ///
    /// Returns false for files and for directories without children, which
    /// have nothing to show or hide.
    pub fn toggle(&mut self, idx: NodeIdx) -> bool {
        match &mut self.nodes[idx].shape {
            NodeShape::Directory(branch) if !branch.children().is_empty() => {
                branch.toggle();
                true
            }
            _ => false,
        }
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if let NodeShape::Directory(branch) = &mut node.shape {
                branch.expand();
            }
        }
    }

    /// Collapse every directory below the root. The root stays expanded so
    /// its first level remains reachable.
    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            let depth = node.depth;
            match &mut node.shape {
                NodeShape::Directory(branch) if depth > 0 => branch.collapse(),
                NodeShape::Directory(branch) => branch.expand(),
                NodeShape::File => {}
            }
        }
    }

    /// Visible nodes in pre-order, siblings in builder order.
    pub fn visible_order(&self) -> Vec<NodeIdx> {
        let mut order = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            stack.extend(self.nodes[idx].visible_children().iter().rev());
        }
        order
    }

    /// Parent/child pairs of the visible hierarchy, in pre-order.
    pub fn visible_links(&self) -> Vec<(NodeIdx, NodeIdx)> {
        self.visible_order()
            .into_iter()
            .flat_map(move |idx| {
                self.nodes[idx]
                    .visible_children()
                    .iter()
                    .map(move |&child| (idx, child))
            })
            .collect()
    }

    /// A node is visible when every ancestor is expanded.
    pub fn is_visible(&self, idx: NodeIdx) -> bool {
        let mut current = self.nodes[idx].parent;
        while let Some(parent) = current {
            if !self.nodes[parent].is_expanded() {
                return false;
            }
            current = self.nodes[parent].parent;
        }
        true
    }

    /// Ids of the visible nodes, in pre-order.
    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible_order()
            .into_iter()
            .map(|idx| self.nodes[idx].id.as_str())
            .collect()
    }
}
