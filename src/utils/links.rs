// src/utils/links.rs

//! Link handling for listing pages.

use regex::Regex;
use url::Url;

/// Whether `href` already carries an http(s) scheme.
pub fn is_absolute(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Turn a listing link into an absolute URL.
///
/// Absolute links are returned unchanged. Rooted links (`/...`) are
/// prefixed with the origin verbatim, so the href is neither re-encoded
/// nor dot-segment collapsed. Anything else is joined onto `origin`; if
/// the join fails the raw href is returned.
pub fn resolve_href(origin: &Url, href: &str) -> String {
    if is_absolute(href) {
        return href.to_string();
    }
    if href.starts_with('/') && !href.starts_with("//") {
        return format!("{}{}", origin.as_str().trim_end_matches('/'), href);
    }
    origin
        .join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Extract the `page` query parameter from a pagination link.
///
/// # Examples
/// ```
/// use aggregator::utils::links::extract_page_number;
///
/// assert_eq!(extract_page_number("/council/district4/blog?page=7"), Some(7));
/// assert_eq!(extract_page_number("/council/district4/blog"), None);
/// ```
pub fn extract_page_number(href: &str) -> Option<u32> {
    let pattern = Regex::new(r"[?&]page=(\d+)").ok()?;
    pattern
        .captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
