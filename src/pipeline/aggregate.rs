// src/pipeline/aggregate.rs

//! Aggregation across all alders.

use crate::models::{Alder, BlogPost, PostsCache};
use crate::pipeline::merge::merge_posts;
use crate::services::{IncrementalCrawler, StopReason};

/// Outcome of crawling one alder.
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub district: u32,
    pub name: String,
    pub new_posts: usize,
    pub pages_fetched: u32,
    /// How the crawl ended; `None` when it failed outright
    pub stop: Option<StopReason>,
    pub error: Option<String>,
}

impl SourceReport {
    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone)]
pub struct Aggregation {
    /// Posts discovered in this run, in crawl order
    pub new_posts: Vec<BlogPost>,
    /// Merged cache to persist; `None` when nothing new was found
    pub merged: Option<PostsCache>,
    pub reports: Vec<SourceReport>,
}

impl Aggregation {
    pub fn failed_sources(&self) -> usize {
        self.reports.iter().filter(|r| r.is_failure()).count()
    }
}

/// Crawl every alder in order and merge new posts into `cache`.
///
/// Alders are crawled one at a time. URLs found for one alder are known
/// while crawling the next, so a cross-posted entry is only added once.
/// A failing alder is reported and skipped.
pub async fn aggregate(
    alders: &[Alder],
    cache: &PostsCache,
    crawler: &IncrementalCrawler<'_>,
) -> Aggregation {
    let mut known = cache.known_urls();
    let mut new_posts: Vec<BlogPost> = Vec::new();
    let mut reports = Vec::with_capacity(alders.len());

    for alder in alders {
        match crawler.crawl_source(alder, &known).await {
            Ok(crawl) => {
                known.extend(crawl.posts.iter().map(|p| p.url.clone()));
                reports.push(SourceReport {
                    district: alder.district,
                    name: alder.name.clone(),
                    new_posts: crawl.posts.len(),
                    pages_fetched: crawl.pages_fetched,
                    stop: Some(crawl.stop),
                    error: None,
                });
                new_posts.extend(crawl.posts);
            }
            Err(e) => {
                log::error!("Error scraping district {}: {}", alder.district, e);
                reports.push(SourceReport {
                    district: alder.district,
                    name: alder.name.clone(),
                    new_posts: 0,
                    pages_fetched: 0,
                    stop: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    let merged = if new_posts.is_empty() {
        None
    } else {
        Some(PostsCache::new(merge_posts(
            new_posts.clone(),
            cache.posts.clone(),
        )))
    };

    Aggregation {
        new_posts,
        merged,
        reports,
    }
}
