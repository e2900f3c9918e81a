//! Menu lookup and report formatting
//!
//! This is the pure core of the service. Given a feed snapshot it:
//! - Resolves the requested date (or the latest date in the feed)
//! - Looks up the day's entries and groups them by floor
//! - Renders a deterministic text report
//!
//! Nothing here performs I/O; fetching the feed lives in [`crate::source`].

pub mod error;
pub mod feed;
pub mod report;

pub use error::MenuError;
pub use feed::{MealEntry, MenuFeed};
pub use report::{format_menu, get_meal_menu, MenuQuery};
