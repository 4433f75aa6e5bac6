use std::fmt;

use super::PathEntry;

/// Weight given to files whose size is unknown.
pub const DEFAULT_FILE_WEIGHT: u64 = 100;

/// Weight given to directories.
pub const DEFAULT_DIRECTORY_WEIGHT: u64 = 1000;

/// Whether a node is a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    File,
}

impl NodeKind {
    /// Kind implied by an entry when it is the final segment of its own path.
    pub fn of_entry(entry: &PathEntry) -> Self {
        if entry.kind.is_blob() {
            NodeKind::File
        } else {
            NodeKind::Directory
        }
    }

    /// Sizing hint for a node of this kind.
    pub fn weight(self, size: Option<u64>) -> u64 {
        match (self, size) {
            (NodeKind::File, Some(size)) => size,
            (NodeKind::File, None) => DEFAULT_FILE_WEIGHT,
            (NodeKind::Directory, _) => DEFAULT_DIRECTORY_WEIGHT,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Directory => f.write_str("directory"),
            NodeKind::File => f.write_str("file"),
        }
    }
}

/// A node of the built hierarchy.
///
/// `id` is the full path from the repository root and never changes once the
/// node exists; the synthetic root has the empty id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub path: String,
    /// Ordered children. Files built from consistent input have none.
    pub children: Vec<DiagramNode>,
    pub weight: u64,
    /// Original record, kept for nodes that had an explicit entry.
    pub source: Option<PathEntry>,
}

impl DiagramNode {
    pub fn is_root(&self) -> bool {
        self.id.is_empty()
    }

    pub fn is_directory(&self) -> bool {
        self.kind == NodeKind::Directory
    }

    /// Children as seen by consumers: `None` for files.
    pub fn child_nodes(&self) -> Option<&[DiagramNode]> {
        match self.kind {
            NodeKind::Directory => Some(&self.children),
            NodeKind::File => None,
        }
    }

    /// Find a descendant (or self) by id, following path segments.
    pub fn find(&self, id: &str) -> Option<&DiagramNode> {
        if id.is_empty() {
            return self.is_root().then_some(self);
        }
        let mut current = self;
        for segment in id.split('/') {
            current = current.children.iter().find(|c| c.name == segment)?;
        }
        (current.id == id).then_some(current)
    }

    /// Depth-first pre-order walk over every node.
    pub fn walk(&self) -> impl Iterator<Item = &DiagramNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Number of nodes in this subtree, self included.
    pub fn count(&self) -> usize {
        self.walk().count()
    }

    /// Longest distance from this node down to a leaf.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.height() + 1)
            .max()
            .unwrap_or(0)
    }
}
