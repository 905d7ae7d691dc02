//! # Dish Name Normalization
//!
//! Canonical lookup keys for dish names. The same dish arrives from
//! parsed menus with varying niqqud, punctuation, casing, and spacing;
//! normalization collapses those variants onto one key while preserving
//! the base letters of every script (the catalog is predominantly
//! Hebrew with occasional Latin entries).
//!
//! Pipeline: NFKD decomposition → strip combining marks → lowercase →
//! punctuation to spaces → collapse whitespace.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalize a raw dish name into its catalog lookup key.
///
/// Returns the empty string when nothing usable remains (the caller
/// skips such names). The output is stable: normalizing a normalized
/// name is the identity.
pub fn normalize_dish_name(raw: &str) -> String {
    let stripped: String = raw
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    let cleaned: String = stripped
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
