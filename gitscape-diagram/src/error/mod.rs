//! Error types

mod build;
mod input;

pub use build::*;
pub use input::*;
