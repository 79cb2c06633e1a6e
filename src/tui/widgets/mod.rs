//! TUI widgets

pub mod day_detail;
pub mod grid;
pub mod help;
