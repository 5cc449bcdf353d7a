//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{Alder, PageSelectors};

/// Environment variable overriding `crawler.request_delay_ms`.
pub const REQUEST_DELAY_ENV: &str = "REQUEST_DELAY_MS";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and crawling behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Input/output file locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// RSS channel settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Listing page selectors
    #[serde(default)]
    pub selectors: PageSelectors,

    /// Blogs to aggregate, crawled in this order
    #[serde(default = "defaults::default_alders")]
    pub alders: Vec<Alder>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply environment overrides (`REQUEST_DELAY_MS`).
    pub fn apply_env(&mut self) {
        let raw = std::env::var(REQUEST_DELAY_ENV).ok();
        self.crawler.request_delay_ms =
            delay_override(raw.as_deref(), self.crawler.request_delay_ms);
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_pages == Some(0) {
            return Err(AppError::validation("crawler.max_pages must be > 0 when set"));
        }
        if self.feed.max_items == 0 {
            return Err(AppError::validation("feed.max_items must be > 0"));
        }
        if self.alders.is_empty() {
            return Err(AppError::config("No alders defined"));
        }

        let mut districts = HashSet::new();
        for alder in &self.alders {
            if !districts.insert(alder.district) {
                return Err(AppError::config(format!(
                    "Duplicate district {}",
                    alder.district
                )));
            }
            alder.listing_url().map_err(|e| {
                AppError::config(format!(
                    "District {} has invalid blog_url '{}': {}",
                    alder.district, alder.blog_url, e
                ))
            })?;
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            paths: PathsConfig::default(),
            feed: FeedConfig::default(),
            selectors: PageSelectors::default(),
            alders: defaults::default_alders(),
        }
    }
}

/// Resolve the request delay from a raw environment value.
///
/// Non-numeric values are ignored and `current` stays in force.
pub fn delay_override(raw: Option<&str>, current: u64) -> u64 {
    match raw {
        None => current,
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            log::warn!(
                "Ignoring non-numeric {}={:?}; using {} ms",
                REQUEST_DELAY_ENV,
                value,
                current
            );
            current
        }),
    }
}

/// HTTP client and crawling behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay before every request in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,

    /// Optional ceiling on listing pages fetched per alder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
            max_pages: None,
        }
    }
}

/// Input/output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Post cache (JSON)
    #[serde(default = "defaults::cache_file")]
    pub cache_file: PathBuf,

    /// Generated RSS feed
    #[serde(default = "defaults::feed_file")]
    pub feed_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            cache_file: defaults::cache_file(),
            feed_file: defaults::feed_file(),
        }
    }
}

/// RSS channel settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "defaults::feed_title")]
    pub title: String,

    /// Public site URL; the feed itself is served at `{link}/feed.xml`
    #[serde(default = "defaults::feed_link")]
    pub link: String,

    #[serde(default = "defaults::feed_description")]
    pub description: String,

    #[serde(default = "defaults::feed_language")]
    pub language: String,

    /// Maximum number of items in the feed
    #[serde(default = "defaults::feed_max_items")]
    pub max_items: usize,
}

impl FeedConfig {
    /// Self link of the feed document.
    pub fn self_link(&self) -> String {
        format!("{}/feed.xml", self.link.trim_end_matches('/'))
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: defaults::feed_title(),
            link: defaults::feed_link(),
            description: defaults::feed_description(),
            language: defaults::feed_language(),
            max_items: defaults::feed_max_items(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use crate::models::Alder;

    // Crawler defaults
    pub fn user_agent() -> String {
        "MadisonAlderBlogAggregator/1.0 (civic project)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        200
    }

    // Path defaults
    pub fn cache_file() -> PathBuf {
        PathBuf::from("data/posts.json")
    }
    pub fn feed_file() -> PathBuf {
        PathBuf::from("public/feed.xml")
    }

    // Feed defaults
    pub fn feed_title() -> String {
        "Madison Alder Blog Aggregator".into()
    }
    pub fn feed_link() -> String {
        "https://example.com".into()
    }
    pub fn feed_description() -> String {
        "Aggregated blog posts from all 20 Madison Common Council Alders".into()
    }
    pub fn feed_language() -> String {
        "en-us".into()
    }
    pub fn feed_max_items() -> usize {
        100
    }

    // Alder roster defaults
    const ROSTER: &[(u32, &str)] = &[
        (1, "John W. Duncan"),
        (2, "Juliana R. Bennett"),
        (3, "Derek Field"),
        (4, "Michael E. Verveer"),
        (5, "Regina M. Vidaver"),
        (6, "Marsha A. Rummel"),
        (7, "Nasra Wehelie"),
        (8, "MGR Govindarajan"),
        (9, "Nikki Conklin"),
        (10, "Yannette Figueroa Cole"),
        (11, "Bill Tishler"),
        (12, "Amani Latimer Burris"),
        (13, "Tag Evers"),
        (14, "Isadore Knox Jr."),
        (15, "Dina Nina Martinez-Rutherford"),
        (16, "Jael Currie"),
        (17, "Sabrina V. Madison"),
        (18, "Charles Myadze"),
        (19, "John P. Guequierre"),
        (20, "Barbara Harrington-McKinney"),
    ];

    pub fn default_alders() -> Vec<Alder> {
        ROSTER
            .iter()
            .map(|(district, name)| {
                Alder::new(
                    *district,
                    *name,
                    format!("https://www.cityofmadison.com/council/district{district}/blog"),
                )
            })
            .collect()
    }
}
