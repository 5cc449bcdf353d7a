//! Blog post record and the persisted post cache.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Alder;

/// Date formats accepted for `published_at`, tried after RFC 3339 and RFC 2822.
const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%dT%H:%M%z"];
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];
const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y"];

/// A post extracted from an alder's blog listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    /// District of the alder that published the post
    pub alder_district: u32,

    /// Alder display name
    pub alder_name: String,

    /// Post title
    pub title: String,

    /// Permalink; the deduplication key
    pub url: String,

    /// Publication timestamp as extracted (ISO 8601 or raw text)
    pub published_at: String,

    /// Short preview from the listing page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl BlogPost {
    /// Build a post for `alder`.
    ///
    /// Returns `None` when the title or URL is empty.
    pub fn new(
        alder: &Alder,
        title: impl Into<String>,
        url: impl Into<String>,
        published_at: impl Into<String>,
        preview: Option<String>,
    ) -> Option<Self> {
        let title = title.into();
        let url = url.into();
        if title.trim().is_empty() || url.trim().is_empty() {
            return None;
        }

        Some(Self {
            alder_district: alder.district,
            alder_name: alder.name.clone(),
            title,
            url,
            published_at: published_at.into(),
            preview: preview.filter(|p| !p.trim().is_empty()),
        })
    }

    /// Publication time, if `published_at` parses as a date.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        parse_published(&self.published_at)
    }
}

/// Interpret a scraped publication date.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    // Naive forms are UTC; a trailing `Z` says so explicitly.
    let naive = raw
        .strip_suffix('Z')
        .or_else(|| raw.strip_suffix('z'))
        .unwrap_or(raw);
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt.and_utc());
        }
    }

    NAIVE_DATE_FORMATS.iter().find_map(|format| {
        NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    })
}

/// Persisted set of known posts, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostsCache {
    #[serde(default)]
    pub posts: Vec<BlogPost>,
}

impl PostsCache {
    pub fn new(posts: Vec<BlogPost>) -> Self {
        Self { posts }
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// URLs of every cached post.
    pub fn known_urls(&self) -> std::collections::HashSet<String> {
        self.posts.iter().map(|p| p.url.clone()).collect()
    }
}
