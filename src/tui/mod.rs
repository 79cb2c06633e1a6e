//! Interactive terminal view of the contribution grid

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::{run, App};
