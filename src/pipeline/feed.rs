// src/pipeline/feed.rs

//! RSS 2.0 feed generation from the post cache.

use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{AppError, Result};
use crate::models::{BlogPost, Config, FeedConfig};
use crate::storage::{PostStorage, write_atomic};

/// Format a timestamp the way RSS readers expect (`Mon, 15 Jan 2024 16:30:00 GMT`).
pub fn to_rfc822(dt: &DateTime<Utc>) -> String {
    dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Thin wrapper mapping writer errors into `AppError`.
struct FeedWriter {
    inner: Writer<Vec<u8>>,
}

impl FeedWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.inner.write_event(event).map_err(AppError::feed)
    }

    fn start(&mut self, tag: BytesStart<'_>) -> Result<()> {
        self.event(Event::Start(tag))
    }

    fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(BytesStart::new(name))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    fn finish(self) -> Result<String> {
        String::from_utf8(self.inner.into_inner()).map_err(AppError::feed)
    }
}

/// Render the feed document for `posts` (already sorted newest first).
pub fn render_feed(posts: &[BlogPost], feed: &FeedConfig, now: DateTime<Utc>) -> Result<String> {
    let mut w = FeedWriter::new();

    w.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"));
    w.start(rss)?;
    w.start(BytesStart::new("channel"))?;

    w.text_element("title", &feed.title)?;
    w.text_element("link", &feed.link)?;
    w.text_element("description", &feed.description)?;
    w.text_element("language", &feed.language)?;
    w.text_element("lastBuildDate", &to_rfc822(&now))?;

    let self_link = feed.self_link();
    let mut atom = BytesStart::new("atom:link");
    atom.push_attribute(("href", self_link.as_str()));
    atom.push_attribute(("rel", "self"));
    atom.push_attribute(("type", "application/rss+xml"));
    w.event(Event::Empty(atom))?;

    for post in posts.iter().take(feed.max_items) {
        write_item(&mut w, post)?;
    }

    w.end("channel")?;
    w.end("rss")?;
    w.finish()
}

fn write_item(w: &mut FeedWriter, post: &BlogPost) -> Result<()> {
    let description = match &post.preview {
        Some(preview) => preview.clone(),
        None => format!(
            "Blog post from District {} Alder {}",
            post.alder_district, post.alder_name
        ),
    };

    w.start(BytesStart::new("item"))?;
    w.text_element("title", &post.title)?;
    w.text_element("link", &post.url)?;

    let mut guid = BytesStart::new("guid");
    guid.push_attribute(("isPermaLink", "true"));
    w.start(guid)?;
    w.event(Event::Text(BytesText::new(&post.url)))?;
    w.end("guid")?;

    match post.published() {
        Some(published) => w.text_element("pubDate", &to_rfc822(&published))?,
        None => log::debug!("Omitting pubDate for {}: {:?}", post.url, post.published_at),
    }

    w.text_element("description", &description)?;
    w.text_element(
        "author",
        &format!("District {} - {}", post.alder_district, post.alder_name),
    )?;
    w.end("item")
}

/// Generate the feed file from the cache.
///
/// Fails with `MissingInput` when the cache is absent or has no posts.
/// Returns the number of items written.
pub async fn run_feed(config: &Config, storage: &dyn PostStorage) -> Result<usize> {
    log::info!("Generating RSS feed...");

    let cache = storage.load_existing().await?;
    if cache.is_empty() {
        return Err(AppError::missing_input("No posts found in cache"));
    }
    log::info!("Found {} posts", cache.len());

    let xml = render_feed(&cache.posts, &config.feed, Utc::now())?;
    write_atomic(&config.paths.feed_file, xml.as_bytes()).await?;

    let items = cache.len().min(config.feed.max_items);
    log::info!(
        "RSS feed written to {} ({} items)",
        config.paths.feed_file.display(),
        items
    );
    Ok(items)
}
