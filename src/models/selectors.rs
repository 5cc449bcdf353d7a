// src/models/selectors.rs

//! CSS selectors for scraping a blog listing page.

use serde::{Deserialize, Serialize};

/// CSS selectors for scraping a blog listing page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageSelectors {
    /// Selector for each post item in the listing
    #[serde(default = "defaults::post_item")]
    pub post_item: String,

    /// Selector for the title link within an item
    #[serde(default = "defaults::post_title")]
    pub post_title: String,

    /// Selector for the date element within an item
    #[serde(default = "defaults::post_date")]
    pub post_date: String,

    /// Selector for the preview element within an item
    #[serde(default = "defaults::post_preview")]
    pub post_preview: String,

    /// Selector for the "last page" pagination link
    #[serde(default = "defaults::last_page_link")]
    pub last_page_link: String,

    /// Machine-readable date attribute on the date element
    #[serde(default = "defaults::date_attr")]
    pub date_attr: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            post_item: defaults::post_item(),
            post_title: defaults::post_title(),
            post_date: defaults::post_date(),
            post_preview: defaults::post_preview(),
            last_page_link: defaults::last_page_link(),
            date_attr: defaults::date_attr(),
        }
    }
}

mod defaults {
    pub fn post_item() -> String {
        "#block-city-front-content .content-blog-summary .cards li".into()
    }
    pub fn post_title() -> String {
        ".article-title a".into()
    }
    pub fn post_date() -> String {
        "time .datetime".into()
    }
    pub fn post_preview() -> String {
        ".article-content".into()
    }
    pub fn last_page_link() -> String {
        "#block-city-front-content nav.pager .pager__item--last a".into()
    }
    pub fn date_attr() -> String {
        "datetime".into()
    }
}
