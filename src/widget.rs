// One widget instance: feed state, category selection, render model
use crate::catalog::{category_chips, count_label, render, CategoryFilter, Chip, RenderModel};
use crate::fetcher::FeedSource;
use crate::model::ProductRecord;
use crate::offers::OffersPanel;
use crate::parser::{map_rows, CsvFeedParser, Parser};
use chrono::{DateTime, Utc};
use tracing::{error, info};

pub const TITLE: &str = "Comparateur de prix — Accessoires de Jardinage";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Pending,
    Loaded { loaded_at: DateTime<Utc> },
    Failed { url: String, message: String },
}

pub struct GardenWidget {
    csv_url: String,
    parser: CsvFeedParser,
    records: Vec<ProductRecord>,
    selected: CategoryFilter,
    status: FeedStatus,
}

impl GardenWidget {
    pub fn new(csv_url: impl Into<String>) -> Self {
        Self {
            csv_url: csv_url.into(),
            parser: CsvFeedParser::new(),
            records: Vec::new(),
            selected: CategoryFilter::All,
            status: FeedStatus::Pending,
        }
    }

    pub fn csv_url(&self) -> &str {
        &self.csv_url
    }

    /// Fetches and replaces the whole record set. Failures end up in `status`.
    pub async fn load(&mut self, source: &dyn FeedSource) -> &FeedStatus {
        let fetched = source.fetch(&self.csv_url).await;
        match fetched {
            Ok(text) => self.load_text(&text),
            Err(e) => {
                error!("CSV error for {}: {}", self.csv_url, e);
                self.records.clear();
                self.selected = CategoryFilter::All;
                self.status = FeedStatus::Failed {
                    url: self.csv_url.clone(),
                    message: e.to_string(),
                };
            }
        }
        &self.status
    }

    pub fn load_text(&mut self, text: &str) {
        let parsed = self.parser.parse(text);
        self.records = map_rows(&parsed.headers, &parsed.rows);
        self.selected = CategoryFilter::All;
        self.status = FeedStatus::Loaded {
            loaded_at: Utc::now(),
        };
        info!("Widget loaded {} products from {}", self.records.len(), self.csv_url);
    }

    pub fn status(&self) -> &FeedStatus {
        &self.status
    }

    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    pub fn selected(&self) -> &CategoryFilter {
        &self.selected
    }

    pub fn select(&mut self, filter: CategoryFilter) {
        info!("Category selected: {}", filter.label());
        self.selected = filter;
    }

    pub fn reset(&mut self) {
        self.select(CategoryFilter::All);
    }

    /// Applies the configured starting category after a successful load only.
    pub fn apply_initial_category(&mut self, label: Option<&str>) {
        if !matches!(self.status, FeedStatus::Loaded { .. }) {
            return;
        }
        match label {
            Some(label) => self.select(CategoryFilter::from_label(label)),
            None => self.reset(),
        }
    }

    pub fn chips(&self) -> Vec<Chip> {
        category_chips(&self.records, &self.selected)
    }

    pub fn render(&self) -> RenderModel {
        render(&self.records, &self.selected)
    }

    /// Unknown while nothing was loaded successfully.
    pub fn count_label(&self) -> String {
        match self.status {
            FeedStatus::Loaded { .. } => count_label(Some(self.render().count)),
            _ => count_label(None),
        }
    }

    /// In-place error panel text, if the last load failed.
    pub fn error_message(&self) -> Option<String> {
        match &self.status {
            FeedStatus::Failed { url, message } => Some(format!(
                "Impossible de charger le CSV.\nCSV: {}\nErreur: {}",
                url, message
            )),
            _ => None,
        }
    }

    /// Fresh, closed offers panels for the currently visible products.
    pub fn panels(&self) -> Vec<OffersPanel> {
        self.render()
            .cards
            .iter()
            .map(|c| OffersPanel::new(c.publication_content_id.as_str()))
            .collect()
    }
}
