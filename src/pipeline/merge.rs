//! Merging newly scraped posts into the cache.
//!
//! Ordering: posts with a parseable `published_at` come first, newest
//! first. Posts whose date does not parse come after all dated posts.
//! Ties keep their input order, so fresh posts stay ahead of cached ones.

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::models::BlogPost;

/// Merge `new_posts` ahead of `cached`, drop repeated URLs and sort.
pub fn merge_posts(new_posts: Vec<BlogPost>, cached: Vec<BlogPost>) -> Vec<BlogPost> {
    let mut seen = HashSet::new();
    let mut merged: Vec<BlogPost> = new_posts
        .into_iter()
        .chain(cached)
        .filter(|post| seen.insert(post.url.clone()))
        .collect();

    sort_newest_first(&mut merged);
    merged
}

/// Stable sort by publication date, newest first, undated last.
pub fn sort_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by_cached_key(|post| Reverse(post.published()));
}
