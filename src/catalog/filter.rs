use crate::model::ProductRecord;
use crate::normalizer::compare_fr;
use std::collections::HashSet;

/// Label of the "show everything" chip.
pub const ALL_LABEL: &str = "Tout";

/// Active category selector. `All` is its own variant so a feed category that is
/// literally called "Tout" stays filterable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Selector for a configured label; "Tout" means everything here.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label == ALL_LABEL {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_LABEL,
            CategoryFilter::Only(c) => c,
        }
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(c) => record.category == *c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub filter: CategoryFilter,
    pub selected: bool,
}

/// Records visible under `filter`, in feed order.
pub fn apply_filter<'a>(records: &'a [ProductRecord], filter: &CategoryFilter) -> Vec<&'a ProductRecord> {
    records.iter().filter(|r| filter.matches(r)).collect()
}

/// Distinct non-empty categories, exact-string dedup, French order.
pub fn categories(records: &[ProductRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out: Vec<String> = records
        .iter()
        .map(|r| r.category.as_str())
        .filter(|c| !c.is_empty() && seen.insert(*c))
        .map(str::to_string)
        .collect();
    out.sort_by(|a, b| compare_fr(a, b));
    out
}

/// The "Tout" chip first, then one chip per category.
pub fn category_chips(records: &[ProductRecord], selected: &CategoryFilter) -> Vec<Chip> {
    std::iter::once(CategoryFilter::All)
        .chain(categories(records).into_iter().map(CategoryFilter::Only))
        .map(|filter| Chip {
            label: filter.label().to_string(),
            selected: filter == *selected,
            filter,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(category: &str, product: &str) -> ProductRecord {
        ProductRecord {
            category: category.into(),
            product: product.into(),
            offers: String::new(),
            refs: String::new(),
            publication_content_id: String::new(),
        }
    }

    fn sample() -> Vec<ProductRecord> {
        vec![
            rec("Gazon", "Tondeuse"),
            rec("Arrosage", "Tuyau"),
            rec("", "Gants"),
            rec("gazon", "Râteau"),
            rec("Arrosage", "Arroseur"),
        ]
    }

    #[test]
    fn all_returns_everything_in_order() {
        let records = sample();
        let visible = apply_filter(&records, &CategoryFilter::All);
        let names: Vec<&str> = visible.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["Tondeuse", "Tuyau", "Gants", "Râteau", "Arroseur"]);
    }

    #[test]
    fn concrete_category_is_exact_and_case_sensitive() {
        let records = sample();
        let visible = apply_filter(&records, &CategoryFilter::Only("Gazon".into()));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].product, "Tondeuse");

        let visible = apply_filter(&records, &CategoryFilter::Only("Arrosage".into()));
        let names: Vec<&str> = visible.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(names, vec!["Tuyau", "Arroseur"]);
    }

    #[test]
    fn unknown_category_gives_empty_set() {
        let records = sample();
        assert!(apply_filter(&records, &CategoryFilter::Only("Piscine".into())).is_empty());
    }

    #[test]
    fn chips_start_with_all_and_keep_case_variants() {
        let records = sample();
        let chips = category_chips(&records, &CategoryFilter::All);
        let labels: Vec<&str> = chips.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Tout", "Arrosage", "gazon", "Gazon"]);
        assert!(chips[0].selected);
        assert!(chips[1..].iter().all(|c| !c.selected));
    }

    #[test]
    fn selected_chip_follows_filter() {
        let records = sample();
        let chips = category_chips(&records, &CategoryFilter::Only("Arrosage".into()));
        assert!(!chips[0].selected);
        assert!(chips[1].selected);
    }

    #[test]
    fn configured_label_maps_tout_to_all() {
        assert_eq!(CategoryFilter::from_label("Tout"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_label("  "), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_label(" Gazon "),
            CategoryFilter::Only("Gazon".into())
        );
    }

    #[test]
    fn real_tout_category_does_not_collide_with_all() {
        let records = vec![rec("Tout", "Kit complet"), rec("Gazon", "Tondeuse")];
        let chips = category_chips(&records, &CategoryFilter::All);
        assert_eq!(chips.len(), 3);
        assert_eq!(chips[0].filter, CategoryFilter::All);
        assert!(chips.iter().any(|c| c.filter == CategoryFilter::Only("Tout".into())));

        let visible = apply_filter(&records, &CategoryFilter::Only("Tout".into()));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].product, "Kit complet");
    }
}
