// crates/geopolitical-core/src/text.rs
//! Text folding and display-name normalization.

use once_cell::sync::Lazy;
use regex::Regex;

/// An uppercase letter directly followed by a lowercase one ("Sa", "Ho").
static MIXED_CASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Lu}\p{Ll}").expect("valid regex"));

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Łódź` -> `Lodz`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use geopolitical_core::text::fold_key;
///
/// assert_eq!(fold_key("Łódź"), "lodz");
/// assert_eq!(fold_key("Straße"), "strasse");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after Unicode folding.
///
/// Names that differ only in diacritics or case compare equal, so
/// `"São Paulo"` and `"sao paulo"` collide in scoped uniqueness checks.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// Normalizes a display name on write.
///
/// Input that already carries deliberate mixed case (an uppercase letter
/// followed by a lowercase one anywhere in the text) passes through
/// untouched; anything else is title-cased word by word. Surrounding
/// whitespace is trimmed in both cases.
///
/// ```rust
/// use geopolitical_core::text::normalize_name;
///
/// assert_eq!(normalize_name("lower east side"), "Lower East Side");
/// assert_eq!(normalize_name("SoHo District"), "SoHo District");
/// assert_eq!(normalize_name("NEW YORK"), "New York");
/// ```
pub fn normalize_name(text: &str) -> String {
    let text = text.trim();
    if MIXED_CASE.is_match(text) {
        text.to_string()
    } else {
        titleize(text)
    }
}

/// Upper-cases the first letter of every word and lower-cases the rest.
///
/// A word starts after whitespace, a hyphen, a slash or an opening
/// parenthesis; apostrophes do not start a word (`"d'oeste"` stays one).
pub fn titleize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = !matches!(ch, '\'' | '’' | '`');
        }
    }
    out
}
