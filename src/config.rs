use crate::model::ConfigError;
use crate::offers::DEFAULT_OFFERS_SCRIPT_URL;
use reqwest::Url;
use serde::Deserialize;
use std::fs;

fn default_offers_script_url() -> String {
    DEFAULT_OFFERS_SCRIPT_URL.to_string()
}

#[derive(Debug, Deserialize)]
pub struct WidgetConfig {
    /// Feed location, absolute or relative to `base_url`.
    #[serde(default)]
    pub csv_url: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_offers_script_url")]
    pub offers_script_url: String,
    #[serde(default)]
    pub initial_category: Option<String>,
    /// Open every visible card's offers panel after each load.
    #[serde(default)]
    pub open_offers: bool,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub widget: WidgetConfig,
    /// Refetch period. Without it the feed is loaded once.
    #[serde(default)]
    pub refresh_interval_seconds: Option<u64>,
}

impl WidgetConfig {
    pub fn resolved_csv_url(&self) -> Result<String, ConfigError> {
        let raw = self
            .csv_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingCsvUrl)?;

        if let Ok(url) = Url::parse(raw) {
            return Ok(url.to_string());
        }

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: raw.to_string(),
            reason,
        };
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| invalid("relative URL without base_url".into()))?;
        let base = Url::parse(base).map_err(|e| invalid(format!("bad base_url: {}", e)))?;
        base.join(raw)
            .map(|u| u.to_string())
            .map_err(|e| invalid(e.to_string()))
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_fields() {
        let cfg = parse_config(r#"{ "widget": { "csv_url": "https://x.test/jardin.csv" } }"#).unwrap();
        assert_eq!(cfg.widget.offers_script_url, DEFAULT_OFFERS_SCRIPT_URL);
        assert!(cfg.widget.initial_category.is_none());
        assert!(!cfg.widget.open_offers);
        assert!(cfg.refresh_interval_seconds.is_none());
        assert_eq!(cfg.widget.resolved_csv_url().unwrap(), "https://x.test/jardin.csv");
    }

    #[test]
    fn relative_url_resolves_against_base() {
        let cfg = parse_config(
            r#"{ "widget": { "csv_url": "./data/jardin.csv", "base_url": "https://site.test/widgets/index.html" } }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.widget.resolved_csv_url().unwrap(),
            "https://site.test/widgets/data/jardin.csv"
        );
    }

    #[test]
    fn missing_or_blank_url_is_an_error() {
        let cfg = parse_config(r#"{ "widget": {} }"#).unwrap();
        assert!(matches!(cfg.widget.resolved_csv_url(), Err(ConfigError::MissingCsvUrl)));

        let cfg = parse_config(r#"{ "widget": { "csv_url": "   " } }"#).unwrap();
        assert!(matches!(cfg.widget.resolved_csv_url(), Err(ConfigError::MissingCsvUrl)));
    }

    #[test]
    fn relative_url_without_base_is_invalid() {
        let cfg = parse_config(r#"{ "widget": { "csv_url": "jardin.csv" } }"#).unwrap();
        assert!(matches!(
            cfg.widget.resolved_csv_url(),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn broken_json_is_reported() {
        assert!(matches!(parse_config("{"), Err(ConfigError::Json(_))));
    }
}
