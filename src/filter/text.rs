//! Case- and accent-insensitive text matching.
//!
//! The store holds names and titles in more than one script, so a keyword
//! has to match under at least one of two normalization strategies: a
//! generic Unicode fold (lowercase + strip combining marks) and a
//! Vietnamese-aware fold that additionally maps the non-combining letters
//! đ/Đ to d.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase the input and strip combining marks after NFD decomposition.
pub fn fold_generic(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Generic fold plus the Vietnamese đ/Đ -> d mapping, which NFD does not
/// decompose.
pub fn fold_vietnamese(input: &str) -> String {
    let mapped: String = input
        .chars()
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .collect();
    fold_generic(&mapped)
}

/// True when `haystack` contains `keyword` under either fold.
pub fn contains_insensitive(haystack: &str, keyword: &str) -> bool {
    if keyword.is_empty() {
        return true;
    }
    fold_generic(haystack).contains(&fold_generic(keyword))
        || fold_vietnamese(haystack).contains(&fold_vietnamese(keyword))
}
