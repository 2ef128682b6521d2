// crates/geopolitical-core/src/slug.rs
//! Canonical identifiers: encoding text into slugs and resolving collisions.

use tracing::debug;

/// Transliterates `text` into a canonical, URL-safe, lowercase token.
///
/// Diacritics are stripped via `deunicode`, periods are dropped, and every
/// run of other non-alphanumeric characters becomes a single hyphen. No
/// leading or trailing hyphen survives. The result is empty when the input
/// holds nothing alphanumeric; callers treat that as absence.
///
/// ```rust
/// use geopolitical_core::slug::encode;
///
/// assert_eq!(encode("Patópolis"), "patopolis");
/// assert_eq!(encode("Jd. Italia"), "jd-italia");
/// assert_eq!(encode("The \"Heights\" & Co."), "the-heights-co");
/// assert_eq!(encode(" -- "), "");
/// ```
pub fn encode(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut out = String::with_capacity(ascii.len());
    let mut pending_dash = false;
    for ch in ascii.chars().filter(|c| *c != '.') {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Why a slug could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugConflict {
    /// The base text encodes to nothing.
    Empty,
    /// Both the base candidate and its disambiguated form are taken.
    Duplicate(String),
}

/// Produces a collision-free slug for a new entity.
///
/// The base candidate is `encode(base)`. When `taken` reports it in use, the
/// encoded `disambiguator` (the parent's abbreviation, or its name) is
/// appended once. A second collision is a genuine data conflict and is
/// reported as [`SlugConflict::Duplicate`] with the last candidate tried.
pub fn resolve_slug(
    base: &str,
    taken: impl Fn(&str) -> bool,
    disambiguator: Option<&str>,
) -> Result<String, SlugConflict> {
    let candidate = encode(base);
    if candidate.is_empty() {
        return Err(SlugConflict::Empty);
    }
    if !taken(&candidate) {
        return Ok(candidate);
    }

    let suffix = disambiguator.map(encode).unwrap_or_default();
    if suffix.is_empty() {
        return Err(SlugConflict::Duplicate(candidate));
    }
    let disambiguated = format!("{candidate}-{suffix}");
    debug!(%candidate, %disambiguated, "slug taken, appending disambiguator");
    if taken(&disambiguated) {
        return Err(SlugConflict::Duplicate(disambiguated));
    }
    Ok(disambiguated)
}

/// Slug for a hood: always `city_slug-encoded_name`, even when the name
/// itself starts with the city's name.
pub fn resolve_hood_slug(
    city_slug: &str,
    name: &str,
    taken: impl Fn(&str) -> bool,
) -> Result<String, SlugConflict> {
    let name_part = encode(name);
    if name_part.is_empty() {
        return Err(SlugConflict::Empty);
    }
    let candidate = format!("{city_slug}-{name_part}");
    if taken(&candidate) {
        return Err(SlugConflict::Duplicate(candidate));
    }
    Ok(candidate)
}

/// Strips a `-suffix` disambiguator from `slug`, if present.
pub(crate) fn strip_disambiguator<'a>(slug: &'a str, disambiguator: &str) -> Option<&'a str> {
    let suffix = encode(disambiguator);
    if suffix.is_empty() {
        return None;
    }
    slug.strip_suffix(suffix.as_str())
        .and_then(|rest| rest.strip_suffix('-'))
        .filter(|rest| !rest.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn encodes_accents_and_punctuation() {
        assert_eq!(encode("République Française!"), "republique-francaise");
        assert_eq!(encode("New Brunswick/Nouveau-Brunswick"), "new-brunswick-nouveau-brunswick");
        assert_eq!(encode("Amapá State"), "amapa-state");
        assert_eq!(encode("St. John's"), "st-john-s");
    }

    #[test]
    fn resolves_free_candidate() {
        assert_eq!(resolve_slug("Patópolis", |_| false, Some("MG")), Ok("patopolis".into()));
    }

    #[test]
    fn appends_disambiguator_on_collision() {
        let taken: HashSet<&str> = ["patopolis"].into_iter().collect();
        assert_eq!(
            resolve_slug("Patópolis", |s| taken.contains(s), Some("MG")),
            Ok("patopolis-mg".into())
        );
    }

    #[test]
    fn second_collision_is_a_conflict() {
        let taken: HashSet<&str> = ["patopolis", "patopolis-mg"].into_iter().collect();
        assert_eq!(
            resolve_slug("Patópolis", |s| taken.contains(s), Some("MG")),
            Err(SlugConflict::Duplicate("patopolis-mg".into()))
        );
    }

    #[test]
    fn collision_without_disambiguator_is_a_conflict() {
        assert_eq!(
            resolve_slug("Gotham", |_| true, None),
            Err(SlugConflict::Duplicate("gotham".into()))
        );
    }

    #[test]
    fn blank_base_is_empty() {
        assert_eq!(resolve_slug("...", |_| false, None), Err(SlugConflict::Empty));
        assert_eq!(resolve_hood_slug("gotham", "", |_| false), Err(SlugConflict::Empty));
    }

    #[test]
    fn hood_slug_always_carries_the_city_prefix() {
        assert_eq!(
            resolve_hood_slug("gotham", "Jd. Italia", |_| false),
            Ok("gotham-jd-italia".into())
        );
        assert_eq!(
            resolve_hood_slug("gotham", "Gotham Heights", |_| false),
            Ok("gotham-gotham-heights".into())
        );
    }

    #[test]
    fn strips_only_a_real_suffix() {
        assert_eq!(strip_disambiguator("patopolis-mg", "MG"), Some("patopolis"));
        assert_eq!(strip_disambiguator("patopolis", "MG"), None);
        assert_eq!(strip_disambiguator("mg", "MG"), None);
    }

    proptest! {
        #[test]
        fn encoded_slugs_use_the_canonical_charset(s in "\\PC{0,40}") {
            let slug = encode(&s);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }

        #[test]
        fn encoding_is_idempotent(s in "\\PC{0,40}") {
            let once = encode(&s);
            prop_assert_eq!(encode(&once), once);
        }
    }
}
