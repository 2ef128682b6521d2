// crates/geopolitical-core/src/traits.rs
use crate::common::{EntityKind, EntityRef};
use crate::model::GeoAttrs;
use crate::text::equals_folded;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;

/// A record kept in one of the store's collections.
///
/// Implementors name their key type and, when they have one, expose the
/// slug the store indexes uniquely.
pub trait Document: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    type Id: Clone
        + Ord
        + Hash
        + fmt::Debug
        + fmt::Display
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    const KIND: EntityKind;

    fn id(&self) -> &Self::Id;

    /// Slug indexed uniquely by the store; `None` for unindexed documents.
    fn slug(&self) -> Option<&str>;

    /// Key used by `ordered()` listings.
    fn sort_name(&self) -> &str;
}

/// Behavior shared by Nation, Region, City and Hood.
///
/// The common fields live in a [`GeoAttrs`] value each entity embeds; the
/// entity itself only says where that value is and who its parent is.
pub trait Geopolitical: Document {
    fn geo(&self) -> &GeoAttrs;

    /// Reference to this entity, usable in parent walks and memberships.
    fn entity_ref(&self) -> EntityRef;

    /// Owning entity one level up; `None` only for nations.
    fn parent(&self) -> Option<EntityRef>;

    fn name(&self) -> &str {
        &self.geo().name
    }

    fn geo_slug(&self) -> &str {
        &self.geo().slug
    }

    fn abbr(&self) -> Option<&str> {
        self.geo().abbr.as_deref()
    }

    fn population(&self) -> Option<u64> {
        self.geo().population
    }

    /// The name, or the slug when no name is set.
    fn display_name(&self) -> &str {
        let geo = self.geo();
        if geo.name.trim().is_empty() {
            &geo.slug
        } else {
            &geo.name
        }
    }

    /// Localized name for `locale`, falling back to the default name.
    fn name_in(&self, locale: &str) -> &str {
        self.geo()
            .translations
            .get(locale)
            .map(String::as_str)
            .unwrap_or_else(|| self.display_name())
    }

    /// True when `query` equals the name or one of its translations,
    /// ignoring accents and case.
    fn is_named(&self, query: &str) -> bool {
        let geo = self.geo();
        equals_folded(&geo.name, query)
            || geo.translations.values().any(|t| equals_folded(t, query))
    }
}
