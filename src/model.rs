// Core structs: ProductRecord, error types
use thiserror::Error;

/// One product line of the feed, as mapped from the CSV.
///
/// Counts are kept as the raw cell text and only turned into numbers when a card
/// is rendered, so a cell like "12 offres" still yields 12.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub category: String,
    pub product: String,
    pub offers: String,
    pub refs: String,
    pub publication_content_id: String,
}

impl ProductRecord {
    pub fn offers_count(&self) -> Option<u64> {
        parse_count(&self.offers)
    }

    pub fn reference_count(&self) -> Option<u64> {
        parse_count(&self.refs)
    }

    pub fn has_publication(&self) -> bool {
        !self.publication_content_id.trim().is_empty()
    }
}

/// Keeps only ASCII digits and parses what is left. Nothing left means unknown, not zero.
pub fn parse_count(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV URL manquante")]
    MissingCsvUrl,
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{0}")]
    Http(String),
    #[error("HTTP {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::Http(e.to_string())
    }
}

/// Cloneable so a single shared load can hand the same failure to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptLoadError {
    #[error("script {url} failed: {reason}")]
    Failed { url: String, reason: String },
    #[error("script {url} failed: HTTP {status}")]
    Status { url: String, status: u16 },
}
