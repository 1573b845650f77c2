use crate::fetcher::traits::FeedSource;
use crate::model::FetchError;
use chrono::Utc;
use reqwest::header::CACHE_CONTROL;
use reqwest::Client;
use std::time::Duration;
use tracing::{info, warn};

pub struct HttpFeedSource {
    client: Client,
}

impl HttpFeedSource {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (compatible; GardenCompare/0.1)")
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self { client })
    }
}

/// Appends `_=<millis>` so intermediate caches never serve a stale feed.
pub fn with_cache_buster(url: &str, millis: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{}{}_={}", url, sep, millis)
}

#[async_trait::async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let busted = with_cache_buster(url, Utc::now().timestamp_millis());
        info!("Fetching feed {}", busted);

        let response = self
            .client
            .get(&busted)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Feed responded [{}]", status);
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        info!("Feed received: {} bytes", text.len());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_buster_picks_separator() {
        assert_eq!(
            with_cache_buster("https://x.test/jardin.csv", 42),
            "https://x.test/jardin.csv?_=42"
        );
        assert_eq!(
            with_cache_buster("https://x.test/feed?id=3", 42),
            "https://x.test/feed?id=3&_=42"
        );
    }

    #[test]
    fn status_error_reads_like_http_code() {
        assert_eq!(FetchError::Status(404).to_string(), "HTTP 404");
    }
}
