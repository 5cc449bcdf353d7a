// src/models/alder.rs

//! Alder (blog source) definition.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// A council member whose blog is aggregated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alder {
    /// District number, unique across the registry
    pub district: u32,

    /// Display name
    pub name: String,

    /// URL of the blog listing page (page 0, without query)
    pub blog_url: String,
}

impl Alder {
    pub fn new(district: u32, name: impl Into<String>, blog_url: impl Into<String>) -> Self {
        Self {
            district,
            name: name.into(),
            blog_url: blog_url.into(),
        }
    }

    /// Parse the blog listing URL.
    pub fn listing_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.blog_url)?)
    }

    /// URL of listing page `page` (zero-based).
    pub fn page_url(&self, page: u32) -> Result<String> {
        let mut url = self.listing_url()?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        Ok(url.to_string())
    }

    /// Site origin (`scheme://host[:port]/`) used to resolve relative links.
    pub fn site_origin(&self) -> Result<Url> {
        let mut origin = self.listing_url()?;
        origin.set_path("/");
        origin.set_query(None);
        origin.set_fragment(None);
        Ok(origin)
    }
}
