//! Interactive repository diagram engine
//!
//! Turns a flat list of repository paths into a collapsible, zoomable tree
//! diagram. The crate is surface-independent: hosts feed it path entries and
//! viewport sizes, forward clicks and pan/zoom gestures, and draw the
//! [`Frame`]s it produces.

pub mod arena;
pub mod builder;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod label;
pub mod layout;
pub mod link;
pub mod model;
pub mod reconcile;
pub mod renderer;
pub mod scene;
pub mod transform;
pub mod transition;

pub use builder::{build, build_with_report};
pub use config::{DiagramConfig, Margins};
pub use event::{DiagramEvent, ViewControl};
pub use geometry::{Point, Viewport};
pub use model::{DiagramNode, EntryKind, NodeKind, PathEntry, entries_from_json};
pub use renderer::{DiagramRenderer, Frame, LabelSide, LinkFrame, Marker, NodeFrame, RepoRef};
pub use transform::ViewTransform;
pub use transition::{Easing, TransitionConfig};
