//! Pipeline entry points for aggregator operations.
//!
//! - `run_scrape`: crawl every alder and merge new posts into the cache
//! - `run_feed`: render the RSS feed from the cache
//! - `run_validate`: check configuration and selectors

pub mod aggregate;
pub mod feed;
pub mod merge;
pub mod scrape;
pub mod validate;

pub use aggregate::{Aggregation, SourceReport, aggregate};
pub use feed::{render_feed, run_feed};
pub use merge::{merge_posts, sort_newest_first};
pub use scrape::{ScrapeSummary, run_scrape};
pub use validate::run_validate;
