//! Input records and the built hierarchy

mod entry;
mod node;

pub use entry::*;
pub use node::*;
