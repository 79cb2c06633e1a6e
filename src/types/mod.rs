//! Type definitions for contribgrid

mod entry;
mod error;
mod grid;

pub use entry::*;
pub use error::*;
pub use grid::*;
