//! Signals the renderer sends to its host, and the controls it accepts.

use std::sync::Arc;

use crate::model::DiagramNode;

/// Something the host has to carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagramEvent {
    /// Open `url` in a new browsing context.
    OpenExternal { url: String },
    /// Show the same diagram in an enlarged container.
    RequestFullscreen {
        root: Arc<DiagramNode>,
        display_name: String,
        branch: String,
    },
}

/// View-control affordances exposed next to the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewControl {
    Maximize,
    ExpandAll,
    CollapseAll,
}

impl ViewControl {
    pub const ALL: [ViewControl; 3] = [
        ViewControl::Maximize,
        ViewControl::ExpandAll,
        ViewControl::CollapseAll,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewControl::Maximize => "Enter Fullscreen View",
            ViewControl::ExpandAll => "Expand All Nodes",
            ViewControl::CollapseAll => "Collapse All Nodes to First Level",
        }
    }
}
