// Maps parsed CSV rows onto ProductRecord by fuzzy header names
use crate::model::ProductRecord;
use crate::normalizer::normalize_key;
use std::collections::HashMap;
use tracing::info;

pub const CATEGORY_ALIASES: &[&str] = &["Catégorie", "Categorie", "Category"];
pub const PRODUCT_ALIASES: &[&str] = &["title", "Titre", "Produit", "Product", "Nom", "name"];
pub const OFFERS_ALIASES: &[&str] = &["Nb d'offres", "Nombre d'offres", "offers", "nb_offres"];
pub const REFS_ALIASES: &[&str] = &[
    "Nb de références",
    "Nb de references",
    "references",
    "refs",
    "nb_references",
];
pub const PUBLICATION_ALIASES: &[&str] = &[
    "publication_content_id",
    "publication content id",
    "pubid",
    "publication-id",
];

/// Normalized header name -> column. A repeated header keeps its last column.
pub struct HeaderIndex {
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    pub fn new(headers: &[String]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (normalize_key(h), i))
            .collect();
        Self { columns }
    }

    /// First alias present in the headers wins.
    pub fn resolve(&self, aliases: &[&str]) -> Option<usize> {
        aliases
            .iter()
            .find_map(|alias| self.columns.get(&normalize_key(alias)).copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FieldColumns {
    category: Option<usize>,
    product: Option<usize>,
    offers: Option<usize>,
    refs: Option<usize>,
    publication: Option<usize>,
}

impl FieldColumns {
    fn from_index(index: &HeaderIndex) -> Self {
        Self {
            category: index.resolve(CATEGORY_ALIASES),
            product: index.resolve(PRODUCT_ALIASES),
            offers: index.resolve(OFFERS_ALIASES),
            refs: index.resolve(REFS_ALIASES),
            publication: index.resolve(PUBLICATION_ALIASES),
        }
    }
}

fn cell(row: &[String], column: Option<usize>) -> String {
    column
        .and_then(|i| row.get(i))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

pub fn map_rows(headers: &[String], rows: &[Vec<String>]) -> Vec<ProductRecord> {
    let columns = FieldColumns::from_index(&HeaderIndex::new(headers));
    if columns.product.is_none() {
        info!("No product column among headers {:?}", headers);
    }

    let records: Vec<ProductRecord> = rows
        .iter()
        .filter_map(|row| {
            let product = cell(row, columns.product);
            if product.is_empty() {
                return None;
            }
            Some(ProductRecord {
                category: cell(row, columns.category),
                product,
                offers: cell(row, columns.offers),
                refs: cell(row, columns.refs),
                publication_content_id: cell(row, columns.publication),
            })
        })
        .collect();

    info!("Mapped {} of {} rows to products", records.len(), rows.len());
    records
}
