use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercase, NFD, combining marks dropped, trimmed. "  Catégorie " -> "categorie".
pub fn normalize_key(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Marks dropped and the French ligatures spelled out, since NFD keeps Œ and Æ whole.
fn strip_marks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.nfd().filter(|c| !is_combining_mark(*c)) {
        match c {
            'œ' => out.push_str("oe"),
            'Œ' => out.push_str("OE"),
            'æ' => out.push_str("ae"),
            'Æ' => out.push_str("AE"),
            _ => out.push(c),
        }
    }
    out
}

/// Orders labels the way a French reader expects in a chip list: letters first
/// regardless of accents and case, then unaccented before accented, then
/// lowercase before uppercase, then code points as the last resort.
pub fn compare_fr(a: &str, b: &str) -> Ordering {
    let primary = |s: &str| strip_marks(s).to_lowercase();
    primary(a)
        .cmp(&primary(b))
        .then_with(|| a.to_lowercase().nfd().count().cmp(&b.to_lowercase().nfd().count()))
        .then_with(|| {
            let a_nfd = a.to_lowercase().nfd().collect::<String>();
            let b_nfd = b.to_lowercase().nfd().collect::<String>();
            a_nfd.cmp(&b_nfd)
        })
        .then_with(|| case_order(a, b))
        .then_with(|| a.cmp(b))
}

fn case_order(a: &str, b: &str) -> Ordering {
    for (ca, cb) in a.chars().zip(b.chars()) {
        match (ca.is_lowercase(), cb.is_lowercase()) {
            (true, false) if cb.is_uppercase() => return Ordering::Less,
            (false, true) if ca.is_uppercase() => return Ordering::Greater,
            _ => {}
        }
    }
    Ordering::Equal
}
