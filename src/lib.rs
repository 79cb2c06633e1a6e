//! Calendar contribution grid: per-day completion counts laid out as a
//! year of week columns, with an interactive terminal view.

pub mod cli;
pub mod config;
pub mod parsers;
pub mod services;
pub mod tui;
pub mod types;
