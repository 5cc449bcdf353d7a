// src/pipeline/scrape.rs

//! Scrape pipeline: load cache, crawl every alder, persist the merge.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::aggregate::{SourceReport, aggregate};
use crate::services::{IncrementalCrawler, ListPageParser, PageFetcher};
use crate::storage::PostStorage;

/// Summary of a scrape run.
#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub alder_count: usize,
    pub failed_alders: usize,
    pub new_posts: usize,
    pub total_posts: usize,
    /// Whether the cache file was rewritten
    pub cache_written: bool,
    pub reports: Vec<SourceReport>,
}

/// Run the incremental scraper against `storage`.
pub async fn run_scrape(
    config: &Config,
    storage: &dyn PostStorage,
    fetcher: &dyn PageFetcher,
) -> Result<ScrapeSummary> {
    let start_time = Utc::now();

    let cache = storage.load_cache().await?;
    log::info!("Loaded {} existing posts from cache", cache.len());
    log::info!("Scraping {} alder blogs for new posts", config.alders.len());

    let parser = ListPageParser::new(&config.selectors)?;
    let crawler =
        IncrementalCrawler::new(fetcher, parser).with_max_pages(config.crawler.max_pages);
    let aggregation = aggregate(&config.alders, &cache, &crawler).await;
    let failed_alders = aggregation.failed_sources();

    let (total_posts, cache_written) = match &aggregation.merged {
        Some(merged) => {
            log::info!("Found {} new posts", aggregation.new_posts.len());
            storage.save_cache(merged).await?;
            (merged.len(), true)
        }
        None => {
            log::info!("No new posts found. Cache unchanged.");
            (cache.len(), false)
        }
    };

    let summary = ScrapeSummary {
        start_time,
        end_time: Utc::now(),
        alder_count: config.alders.len(),
        failed_alders,
        new_posts: aggregation.new_posts.len(),
        total_posts,
        cache_written,
        reports: aggregation.reports,
    };

    log::info!(
        "Scrape finished in {} ms: {} alders ({} failed), {} new posts, {} total",
        (summary.end_time - summary.start_time).num_milliseconds(),
        summary.alder_count,
        summary.failed_alders,
        summary.new_posts,
        summary.total_posts
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Alder;
    use crate::services::fetcher::testing::StaticFetcher;
    use crate::services::parser::fixtures::{item, page};
    use crate::storage::LocalStorage;
    use tempfile::TempDir;

    const BLOG: &str = "https://www.cityofmadison.com/council/district4/blog";

    fn config() -> Config {
        Config {
            alders: vec![Alder::new(4, "Michael E. Verveer", BLOG)],
            ..Config::default()
        }
    }

    fn fetcher() -> StaticFetcher {
        StaticFetcher::new().page(
            format!("{BLOG}?page=0"),
            page(
                &[
                    item("/council/district4/blog/two", "Two", "2024-01-20"),
                    item("/council/district4/blog/one", "One", "2024-01-10"),
                ],
                Some("/council/district4/blog?page=0"),
            ),
        )
    }

    #[tokio::test]
    async fn test_first_run_writes_cache() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("data/posts.json"));

        let summary = run_scrape(&config(), &storage, &fetcher()).await.unwrap();

        assert!(summary.cache_written);
        assert_eq!(summary.new_posts, 2);
        assert_eq!(summary.total_posts, 2);
        let cache = storage.load_cache().await.unwrap();
        assert_eq!(cache.posts[0].title, "Two");
    }

    #[tokio::test]
    async fn test_second_run_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("data/posts.json"));

        run_scrape(&config(), &storage, &fetcher()).await.unwrap();
        let before = std::fs::read(storage.cache_file()).unwrap();

        let summary = run_scrape(&config(), &storage, &fetcher()).await.unwrap();
        let after = std::fs::read(storage.cache_file()).unwrap();

        assert!(!summary.cache_written);
        assert_eq!(summary.new_posts, 0);
        assert_eq!(summary.total_posts, 2);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_all_fetches_failing_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("data/posts.json"));
        let fetcher = StaticFetcher::new().fail(format!("{BLOG}?page=0"), 503);

        let summary = run_scrape(&config(), &storage, &fetcher).await.unwrap();

        assert!(!summary.cache_written);
        assert!(!storage.cache_file().exists());
    }
}
