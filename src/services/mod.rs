//! Service layer for the aggregator.
//!
//! This module contains the business logic for:
//! - Listing page fetching (`PageFetcher`, `HttpFetcher`)
//! - Listing page parsing (`ListPageParser`)
//! - Incremental per-alder crawling (`IncrementalCrawler`)

pub(crate) mod crawler;
pub(crate) mod fetcher;
pub(crate) mod parser;

pub use crawler::{IncrementalCrawler, SourceCrawl, StopReason};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use parser::{ListPageParser, ParsedPage};
