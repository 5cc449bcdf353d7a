// src/models/mod.rs

//! Domain models for the aggregator.

mod alder;
mod config;
mod post;
mod selectors;

// Re-export all public types
pub use alder::Alder;
pub use config::{
    Config, CrawlerConfig, FeedConfig, PathsConfig, REQUEST_DELAY_ENV, delay_override,
};
pub use post::{BlogPost, PostsCache, parse_published};
pub use selectors::PageSelectors;
