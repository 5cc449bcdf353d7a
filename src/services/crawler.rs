// src/services/crawler.rs

//! Incremental blog crawler.
//!
//! Walks an alder's listing pages from page 0 and collects posts until it
//! reaches one that is already known. The city site lists posts newest
//! first, so everything after the first known post is known as well.

use std::collections::HashSet;

use crate::error::Result;
use crate::models::{Alder, BlogPost};
use crate::services::{ListPageParser, PageFetcher};

/// Why a crawl of one alder ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Reached a post already in the known set
    KnownPost,
    /// A page yielded no posts
    EmptyPage,
    /// Reached the last page advertised by the pager
    LastPage,
    /// A page could not be fetched
    FetchFailed,
    /// Hit the configured page ceiling
    PageLimit,
}

/// Result of crawling one alder.
#[derive(Debug, Clone)]
pub struct SourceCrawl {
    /// New posts, newest first
    pub posts: Vec<BlogPost>,
    /// Number of listing pages requested
    pub pages_fetched: u32,
    pub stop: StopReason,
}

/// Crawler for a single alder's paginated blog listing.
pub struct IncrementalCrawler<'a> {
    fetcher: &'a dyn PageFetcher,
    parser: ListPageParser,
    max_pages: Option<u32>,
}

impl<'a> IncrementalCrawler<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, parser: ListPageParser) -> Self {
        Self {
            fetcher,
            parser,
            max_pages: None,
        }
    }

    /// Stop each alder after `max_pages` listing pages.
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Collect the posts of `alder` that are not in `known`.
    ///
    /// Fetch failures end the crawl early and keep what was collected.
    /// An `Err` means the alder itself is unusable (bad blog URL).
    pub async fn crawl_source(
        &self,
        alder: &Alder,
        known: &HashSet<String>,
    ) -> Result<SourceCrawl> {
        log::info!("Scraping district {} - {}", alder.district, alder.name);

        let mut posts: Vec<BlogPost> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut last_page_index: Option<u32> = None;
        let mut page: u32 = 0;
        let mut pages_fetched: u32 = 0;

        let stop = loop {
            let url = alder.page_url(page)?;
            log::debug!("Fetching page {page}: {url}");

            let html = match self.fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(e) => {
                    log::warn!("Error fetching {url}: {e}");
                    break StopReason::FetchFailed;
                }
            };
            pages_fetched += 1;

            let parsed = self.parser.parse(&html, alder)?;

            if last_page_index.is_none() {
                if let Some(last) = parsed.last_page_index {
                    log::debug!("Detected {} total pages", u64::from(last) + 1);
                    last_page_index = Some(last);
                }
            }

            if parsed.posts.is_empty() {
                log::debug!("Page {page}: no posts found");
                break StopReason::EmptyPage;
            }

            let mut new_on_page = 0;
            let mut hit_known = false;
            for post in parsed.posts {
                if known.contains(&post.url) {
                    hit_known = true;
                    break;
                }
                if !seen.insert(post.url.clone()) {
                    log::debug!("Skipping repeated post {}", post.url);
                    continue;
                }
                posts.push(post);
                new_on_page += 1;
            }
            log::debug!("Page {page}: {new_on_page} new posts");

            if hit_known {
                log::debug!("Found known post, stopping pagination");
                break StopReason::KnownPost;
            }
            if last_page_index.is_some_and(|last| page >= last) {
                break StopReason::LastPage;
            }
            if self.max_pages.is_some_and(|max| pages_fetched >= max) {
                log::warn!(
                    "District {}: page limit of {} reached",
                    alder.district,
                    pages_fetched
                );
                break StopReason::PageLimit;
            }

            page += 1;
        };

        log::info!(
            "District {}: {} new posts ({} pages, stop: {:?})",
            alder.district,
            posts.len(),
            pages_fetched,
            stop
        );

        Ok(SourceCrawl {
            posts,
            pages_fetched,
            stop,
        })
    }
}
