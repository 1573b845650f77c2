// offers/panel.rs

use crate::model::ScriptLoadError;
use crate::offers::loader::{OffersScript, ScriptLoad};
use tracing::{info, warn};

pub const OFFERS_ELEMENT_TAG: &str = "affilizz-rendering-component";
pub const STATUS_LOADING: &str = "Chargement…";
pub const STATUS_NO_OFFERS: &str = "Aucune offre (publication_content_id manquant).";
pub const STATUS_UNAVAILABLE: &str = "Comparateur indisponible pour le moment.";

/// The element handed to the external script once it is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountedElement {
    pub tag: &'static str,
    pub attributes: Vec<(&'static str, String)>,
}

impl MountedElement {
    pub fn for_publication(publication_content_id: &str) -> Self {
        Self {
            tag: OFFERS_ELEMENT_TAG,
            attributes: vec![
                ("loading", "lazy".to_string()),
                ("publication-content-id", publication_content_id.to_string()),
            ],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn to_html(&self) -> String {
        let attrs: String = self
            .attributes
            .iter()
            .map(|(k, v)| format!(" {}=\"{}\"", k, escape_attr(v)))
            .collect();
        format!("<{tag}{attrs}></{tag}>", tag = self.tag, attrs = attrs)
    }
}

fn escape_attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value)
        .replace('\n', " ")
        .trim()
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Closed,
    Loading,
    Opened(MountedElement),
    /// Script unavailable. The panel stays open and empty until closed.
    Failed,
    /// Nothing to load for this card.
    NoOffers,
}

/// A script load started by `open`, tagged with the open it belongs to.
pub struct PendingLoad {
    generation: u64,
    load: ScriptLoad,
}

pub struct LoadOutcome {
    generation: u64,
    result: Result<(), ScriptLoadError>,
}

impl PendingLoad {
    pub async fn wait(self) -> LoadOutcome {
        LoadOutcome {
            generation: self.generation,
            result: self.load.await,
        }
    }
}

/// Offers panel of one product card.
pub struct OffersPanel {
    publication_content_id: String,
    state: PanelState,
    generation: u64,
}

impl OffersPanel {
    pub fn new(publication_content_id: impl Into<String>) -> Self {
        Self {
            publication_content_id: publication_content_id.into().trim().to_string(),
            state: PanelState::Closed,
            generation: 0,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state != PanelState::Closed
    }

    pub fn status_text(&self) -> &'static str {
        match self.state {
            PanelState::Closed | PanelState::Opened(_) => "",
            PanelState::Loading => STATUS_LOADING,
            PanelState::Failed => STATUS_UNAVAILABLE,
            PanelState::NoOffers => STATUS_NO_OFFERS,
        }
    }

    pub fn mounted(&self) -> Option<&MountedElement> {
        match &self.state {
            PanelState::Opened(el) => Some(el),
            _ => None,
        }
    }

    /// Opens a closed panel, closes an open one.
    pub fn toggle(&mut self, script: &OffersScript) -> Option<PendingLoad> {
        if self.is_open() {
            self.close();
            None
        } else {
            self.open(script)
        }
    }

    /// Returns the load to wait for, or nothing when the card has no publication id.
    pub fn open(&mut self, script: &OffersScript) -> Option<PendingLoad> {
        self.generation += 1;

        if self.publication_content_id.is_empty() {
            self.state = PanelState::NoOffers;
            return None;
        }

        self.state = PanelState::Loading;
        Some(PendingLoad {
            generation: self.generation,
            load: script.ensure_loaded(),
        })
    }

    /// Applies a finished load. Outcomes of an open that was closed since are dropped.
    pub fn complete(&mut self, outcome: LoadOutcome) {
        if outcome.generation != self.generation || self.state != PanelState::Loading {
            info!("Ignoring stale offers load for '{}'", self.publication_content_id);
            return;
        }
        self.state = match outcome.result {
            Ok(()) => PanelState::Opened(MountedElement::for_publication(&self.publication_content_id)),
            Err(e) => {
                warn!("Offers unavailable for '{}': {}", self.publication_content_id, e);
                PanelState::Failed
            }
        };
    }

    pub fn close(&mut self) {
        self.generation += 1;
        self.state = PanelState::Closed;
    }

    /// Toggle and, if a load was started, wait for it and apply it.
    pub async fn toggle_and_wait(&mut self, script: &OffersScript) {
        if let Some(pending) = self.toggle(script) {
            let outcome = pending.wait().await;
            self.complete(outcome);
        }
    }
}
