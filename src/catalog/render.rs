use crate::catalog::filter::{apply_filter, CategoryFilter};
use crate::model::ProductRecord;

pub const EMPTY_TITLE: &str = "Aucun produit.";
pub const EMPTY_HINT: &str = "Change de catégorie ou réinitialise.";

/// What a product card shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub product: String,
    pub offers_count: Option<u64>,
    pub reference_count: Option<u64>,
    pub publication_content_id: String,
}

impl Card {
    pub fn from_record(record: &ProductRecord) -> Self {
        Self {
            product: record.product.clone(),
            offers_count: record.offers_count(),
            reference_count: record.reference_count(),
            publication_content_id: record.publication_content_id.clone(),
        }
    }

    /// Pill texts, only for the counts that are known.
    pub fn pills(&self) -> Vec<String> {
        let mut pills = Vec::new();
        if let Some(n) = self.offers_count {
            pills.push(format!("{} offres", n));
        }
        if let Some(n) = self.reference_count {
            pills.push(format!("{} références", n));
        }
        pills
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Products,
    /// Nothing matches the current selection.
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderModel {
    pub count: usize,
    pub cards: Vec<Card>,
    pub state: RenderState,
}

impl RenderModel {
    pub fn is_empty(&self) -> bool {
        self.state == RenderState::Empty
    }
}

pub fn render(records: &[ProductRecord], selected: &CategoryFilter) -> RenderModel {
    let cards: Vec<Card> = apply_filter(records, selected)
        .into_iter()
        .map(Card::from_record)
        .collect();
    let state = if cards.is_empty() {
        RenderState::Empty
    } else {
        RenderState::Products
    };
    RenderModel {
        count: cards.len(),
        cards,
        state,
    }
}

/// "Produits : 3", or "Produits : —" when the count is unknown.
pub fn count_label(count: Option<usize>) -> String {
    match count {
        Some(n) => format!("Produits : {}", n),
        None => "Produits : —".to_string(),
    }
}
