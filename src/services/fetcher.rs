// src/services/fetcher.rs

//! Listing page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::CrawlerConfig;
use crate::utils::http::create_async_client;

/// Source of raw listing page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// HTTP fetcher that waits a fixed delay before every request.
pub struct HttpFetcher {
    client: Client,
    delay: Duration,
}

impl HttpFetcher {
    /// Create a fetcher from crawler settings.
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_async_client(config)?,
            Duration::from_millis(config.request_delay_ms),
        ))
    }

    pub fn with_client(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Transport {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory fetcher for crawl and aggregation tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Serves canned pages by URL and records every request.
    #[derive(Default)]
    pub struct StaticFetcher {
        pages: HashMap<String, String>,
        failures: HashMap<String, u16>,
        requests: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
            self.pages.insert(url.into(), html.into());
            self
        }

        pub fn fail(mut self, url: impl Into<String>, status: u16) -> Self {
            self.failures.insert(url.into(), status);
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String> {
            self.requests.lock().unwrap().push(url.to_string());
            if let Some(status) = self.failures.get(url) {
                return Err(AppError::Transport {
                    url: url.to_string(),
                    status: *status,
                });
            }
            // Unknown URLs behave like a missing page.
            self.pages.get(url).cloned().ok_or_else(|| AppError::Transport {
                url: url.to_string(),
                status: 404,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::testing::StaticFetcher;
    use super::*;

    /// Serve one canned HTTP response on a loopback port and return its URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });

        format!("http://{addr}/council/district4/blog")
    }

    fn loopback_fetcher(delay: Duration) -> HttpFetcher {
        let client = Client::builder().no_proxy().build().unwrap();
        HttpFetcher::with_client(client, delay)
    }

    #[tokio::test]
    async fn test_http_fetcher_returns_body_after_delay() {
        let url = serve_once("HTTP/1.1 200 OK", "<ul class=\"blog-list\"></ul>").await;
        let delay = Duration::from_millis(150);
        let fetcher = loopback_fetcher(delay);

        let started = Instant::now();
        let body = fetcher.fetch(&url).await.unwrap();

        assert!(started.elapsed() >= delay);
        assert_eq!(body, "<ul class=\"blog-list\"></ul>");
    }

    #[tokio::test]
    async fn test_http_fetcher_maps_error_status() {
        let url = serve_once("HTTP/1.1 503 Service Unavailable", "down").await;
        let delay = Duration::from_millis(100);
        let fetcher = loopback_fetcher(delay);

        let started = Instant::now();
        let result = fetcher.fetch(&url).await;

        assert!(started.elapsed() >= delay);
        match result {
            Err(AppError::Transport { url: failed, status }) => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("expected transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_http_fetcher_uses_configured_delay() {
        let mut config = CrawlerConfig::default();
        config.request_delay_ms = 350;
        let fetcher = HttpFetcher::new(&config).unwrap();
        assert_eq!(fetcher.delay(), Duration::from_millis(350));
    }

    #[tokio::test]
    async fn test_static_fetcher_reports_status() {
        let fetcher = StaticFetcher::new()
            .page("https://x/a", "<html></html>")
            .fail("https://x/b", 500);

        assert_eq!(fetcher.fetch("https://x/a").await.unwrap(), "<html></html>");
        match fetcher.fetch("https://x/b").await {
            Err(AppError::Transport { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected transport error, got {other:?}"),
        }
        assert_eq!(fetcher.requests(), vec!["https://x/a", "https://x/b"]);
    }
}
