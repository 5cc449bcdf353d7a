// src/services/parser.rs

//! Blog listing page parser.
//!
//! Turns one listing page into post records plus the pagination hint
//! from the "last page" link, if the page renders one.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Alder, BlogPost, PageSelectors};
use crate::utils::links::{extract_page_number, resolve_href};
use crate::utils::normalize_whitespace;

/// Posts and pagination hint extracted from a single listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Posts in document order (newest first on the city site)
    pub posts: Vec<BlogPost>,

    /// Zero-based index of the last listing page, when linked
    pub last_page_index: Option<u32>,
}

/// Parser with pre-compiled listing selectors.
#[derive(Debug, Clone)]
pub struct ListPageParser {
    item: Selector,
    title: Selector,
    date: Selector,
    preview: Selector,
    last_page: Selector,
    date_attr: String,
}

impl ListPageParser {
    /// Compile the configured selectors.
    pub fn new(selectors: &PageSelectors) -> Result<Self> {
        Ok(Self {
            item: Self::parse_selector(&selectors.post_item)?,
            title: Self::parse_selector(&selectors.post_title)?,
            date: Self::parse_selector(&selectors.post_date)?,
            preview: Self::parse_selector(&selectors.post_preview)?,
            last_page: Self::parse_selector(&selectors.last_page_link)?,
            date_attr: selectors.date_attr.clone(),
        })
    }

    /// Parse a listing page belonging to `alder`.
    ///
    /// Items without a title or link are skipped. Fails only when the
    /// alder's blog URL cannot be parsed.
    pub fn parse(&self, html: &str, alder: &Alder) -> Result<ParsedPage> {
        let origin = alder.site_origin()?;
        let document = Html::parse_document(html);

        let posts = document
            .select(&self.item)
            .filter_map(|item| self.parse_item(&item, alder, &origin))
            .collect();

        let last_page_index = document
            .select(&self.last_page)
            .next()
            .and_then(|link| link.value().attr("href"))
            .and_then(extract_page_number);

        Ok(ParsedPage {
            posts,
            last_page_index,
        })
    }

    fn parse_item(&self, item: &ElementRef, alder: &Alder, origin: &Url) -> Option<BlogPost> {
        let link = item.select(&self.title).next()?;
        let title = normalize_whitespace(&link.text().collect::<String>());
        let href = link.value().attr("href").unwrap_or("").trim();

        if title.is_empty() || href.is_empty() {
            log::debug!(
                "Skipping malformed item for district {} (title: {:?}, href: {:?})",
                alder.district,
                title,
                href
            );
            return None;
        }

        let url = resolve_href(origin, href);
        let published_at = item
            .select(&self.date)
            .next()
            .map(|el| {
                el.value()
                    .attr(&self.date_attr)
                    .map(str::trim)
                    .filter(|attr| !attr.is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| el.text().collect::<String>().trim().to_string())
            })
            .unwrap_or_default();

        let preview = item
            .select(&self.preview)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .filter(|text| !text.is_empty());

        BlogPost::new(alder, title, url, published_at, preview)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::{item, page};
    use super::*;

    fn district4() -> Alder {
        Alder::new(
            4,
            "Michael E. Verveer",
            "https://www.cityofmadison.com/council/district4/blog",
        )
    }

    fn parse(html: &str) -> ParsedPage {
        ListPageParser::new(&PageSelectors::default())
            .unwrap()
            .parse(html, &district4())
            .unwrap()
    }

    #[test]
    fn test_parse_single_post() {
        let html = r#"
            <html><body>
              <div id="block-city-front-content">
                <div class="content-blog-summary">
                  <ul class="cards">
                    <li>
                      <h3 class="article-title">
                        <a href="/council/district4/blog/test-post">Test Post Title</a>
                      </h3>
                      <time>
                        <span class="datetime" datetime="2024-01-15T10:30:00-06:00">January 15, 2024</span>
                      </time>
                      <div class="article-content">This is a preview of the post content.</div>
                    </li>
                  </ul>
                </div>
              </div>
            </body></html>
        "#;

        let result = parse(html);

        assert_eq!(result.posts.len(), 1);
        assert_eq!(
            result.posts[0],
            BlogPost {
                alder_district: 4,
                alder_name: "Michael E. Verveer".to_string(),
                title: "Test Post Title".to_string(),
                url: "https://www.cityofmadison.com/council/district4/blog/test-post".to_string(),
                published_at: "2024-01-15T10:30:00-06:00".to_string(),
                preview: Some("This is a preview of the post content.".to_string()),
            }
        );
        assert_eq!(result.last_page_index, None);
    }

    #[test]
    fn test_parse_keeps_document_order() {
        let html = page(
            &[
                item("/post1", "Post One", "2024-01-20"),
                item("/post2", "Post Two", "2024-01-19"),
                item("/post3", "Post Three", "2024-01-18"),
            ],
            None,
        );

        let titles: Vec<_> = parse(&html).posts.into_iter().map(|p| p.title).collect();
        assert_eq!(titles, vec!["Post One", "Post Two", "Post Three"]);
    }

    #[test]
    fn test_last_page_index() {
        let html = page(
            &[item("/post1", "Post", "2024-01-20")],
            Some("/council/district4/blog?page=7"),
        );
        assert_eq!(parse(&html).last_page_index, Some(7));
    }

    #[test]
    fn test_last_page_link_without_page_param() {
        let html = page(
            &[item("/post1", "Post", "2024-01-20")],
            Some("/council/district4/blog"),
        );
        assert_eq!(parse(&html).last_page_index, None);
    }

    #[test]
    fn test_empty_listing() {
        let result = parse(&page(&[], None));
        assert!(result.posts.is_empty());
        assert_eq!(result.last_page_index, None);
    }

    #[test]
    fn test_skips_items_without_title_or_url() {
        let html = page(
            &[
                item("", "No Link", "2024-01-21"),
                item("/untitled", "   ", "2024-01-21"),
                item("/valid", "Valid Post", "2024-01-20"),
            ],
            None,
        );

        let result = parse(&html);
        assert_eq!(result.posts.len(), 1);
        assert_eq!(result.posts[0].title, "Valid Post");
    }

    #[test]
    fn test_skips_item_without_title_link() {
        let html = page(
            &[
                "<li><h3 class=\"article-title\">Plain heading</h3></li>".to_string(),
                item("/valid", "Valid Post", "2024-01-20"),
            ],
            None,
        );
        assert_eq!(parse(&html).posts.len(), 1);
    }

    #[test]
    fn test_absolute_url_passthrough() {
        let html = page(
            &[item("https://example.com/external-post", "External Post", "2024-01-20")],
            None,
        );
        assert_eq!(parse(&html).posts[0].url, "https://example.com/external-post");
    }

    #[test]
    fn test_date_falls_back_to_text() {
        let html = page(
            &[r#"<li>
                <h3 class="article-title"><a href="/p">Post</a></h3>
                <time><span class="datetime"> March 3, 2024 </span></time>
            </li>"#
                .to_string()],
            None,
        );
        assert_eq!(parse(&html).posts[0].published_at, "March 3, 2024");
    }

    #[test]
    fn test_missing_date_is_empty() {
        let html = page(
            &[r#"<li><h3 class="article-title"><a href="/p">Post</a></h3></li>"#.to_string()],
            None,
        );
        assert_eq!(parse(&html).posts[0].published_at, "");
    }

    #[test]
    fn test_empty_preview_is_absent() {
        let html = page(
            &[r#"<li>
                <h3 class="article-title"><a href="/p">Post</a></h3>
                <div class="article-content">   </div>
            </li>"#
                .to_string()],
            None,
        );
        assert_eq!(parse(&html).posts[0].preview, None);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let selectors = PageSelectors {
            post_item: "[[invalid".to_string(),
            ..PageSelectors::default()
        };
        assert!(matches!(
            ListPageParser::new(&selectors),
            Err(AppError::Selector { .. })
        ));
    }
}
