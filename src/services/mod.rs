//! Services for turning completion entries into a contribution grid

pub mod aggregator;
pub mod builder;
pub mod classifier;
pub mod cursor;
pub mod demo;
pub mod layout;
pub mod range;
pub mod scroll;
pub mod year_nav;

pub use aggregator::Aggregator;
pub use builder::{ContributionGrid, GridBuilder};
pub use classifier::classify;
pub use cursor::GridCursor;
pub use demo::demo_entries;
pub use layout::{month_starts, partition_weeks};
pub use range::DateRange;
pub use scroll::{initial_scroll, keep_visible};
pub use year_nav::YearCursor;
