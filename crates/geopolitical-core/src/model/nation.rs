// crates/geopolitical-core/src/model/nation.rs
use super::attrs::{GeoAttrs, GeoForm};
use crate::common::{CityId, EntityKind, EntityRef, NationId};
use crate::traits::{Document, Geopolitical};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A nation. Its key is the upper-cased abbreviation, not a surrogate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Nation {
    pub id: NationId,
    pub geo: GeoAttrs,
    /// ISO 3166-1 alpha-3
    pub code3: Option<String>,
    pub tld: Option<String>,
    pub currency: Option<String>,
    /// Official languages, primary first.
    pub languages: Vec<String>,
    pub capital: Option<CityId>,
}

impl Nation {
    pub fn abbr(&self) -> &str {
        self.id.as_str()
    }

    pub fn primary_language(&self) -> Option<&str> {
        self.languages.first().map(String::as_str)
    }
}

impl PartialEq for Nation {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Nation {}

impl PartialOrd for Nation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Nations sort by name; abbreviation breaks ties.
impl Ord for Nation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.geo
            .name
            .cmp(&other.geo.name)
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl Document for Nation {
    type Id = NationId;
    const KIND: EntityKind = EntityKind::Nation;

    fn id(&self) -> &NationId {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.geo.slug)
    }

    fn sort_name(&self) -> &str {
        &self.geo.name
    }
}

impl Geopolitical for Nation {
    fn geo(&self) -> &GeoAttrs {
        &self.geo
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::Nation(self.id.clone())
    }

    fn parent(&self) -> Option<EntityRef> {
        None
    }
}

/// Input for creating or updating a [`Nation`]. `abbr` is required.
#[derive(Clone, Debug, Default)]
pub struct NationForm {
    pub geo: GeoAttrs,
    pub code3: Option<String>,
    pub tld: Option<String>,
    pub currency: Option<String>,
    pub languages: Vec<String>,
    pub capital: Option<CityId>,
}

impl NationForm {
    pub fn new(name: impl Into<String>, abbr: impl Into<String>) -> Self {
        Self::default().named(name).abbr(abbr)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.geo.name = name.into();
        self
    }

    pub fn code3(mut self, code3: impl Into<String>) -> Self {
        self.code3 = Some(code3.into());
        self
    }

    pub fn tld(mut self, tld: impl Into<String>) -> Self {
        self.tld = Some(tld.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn languages<I, L>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    pub fn capital(mut self, capital: CityId) -> Self {
        self.capital = Some(capital);
        self
    }
}

impl From<&Nation> for NationForm {
    fn from(n: &Nation) -> Self {
        Self {
            geo: n.geo.clone(),
            code3: n.code3.clone(),
            tld: n.tld.clone(),
            currency: n.currency.clone(),
            languages: n.languages.clone(),
            capital: n.capital,
        }
    }
}

impl GeoForm for NationForm {
    fn geo_mut(&mut self) -> &mut GeoAttrs {
        &mut self.geo
    }
}
