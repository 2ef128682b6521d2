// crates/geopolitical-core/src/model/attrs.rs
use crate::text::normalize_name;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fields every geopolitical entity carries.
///
/// The same value doubles as form input: there, an empty `slug` asks the
/// write pipeline to derive one from `name`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoAttrs {
    pub name: String,
    pub abbr: Option<String>,
    pub slug: String,
    pub population: Option<u64>,
    /// Local dialing code; empty means inherit from the parent.
    pub phone: Option<String>,
    /// Local postal code; empty means inherit from the parent.
    pub postal: Option<String>,
    /// ISO 3166-2 style code, unique within the parent.
    pub code: Option<String>,
    /// locale -> name
    pub translations: BTreeMap<String, String>,
}

impl GeoAttrs {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Name normalization step of the write pipeline.
    ///
    /// Titleizes `name` and translations, trims free-form fields and turns
    /// blank optional fields into `None`. `abbr` and `slug` are only trimmed.
    pub(crate) fn normalized(mut self) -> Self {
        self.name = normalize_name(&self.name);
        self.slug = self.slug.trim().to_string();
        self.abbr = non_blank(self.abbr);
        self.phone = non_blank(self.phone);
        self.postal = non_blank(self.postal);
        self.code = non_blank(self.code);
        self.translations = self
            .translations
            .into_iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k, normalize_name(&v)))
            .collect();
        self
    }
}

pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Builder helpers shared by the entity forms.
pub trait GeoForm: Sized {
    fn geo_mut(&mut self) -> &mut GeoAttrs;

    fn abbr(mut self, abbr: impl Into<String>) -> Self {
        self.geo_mut().abbr = Some(abbr.into());
        self
    }

    /// Requests an explicit slug instead of one derived from the name.
    fn slug(mut self, slug: impl Into<String>) -> Self {
        self.geo_mut().slug = slug.into();
        self
    }

    fn population(mut self, population: u64) -> Self {
        self.geo_mut().population = Some(population);
        self
    }

    fn phone(mut self, phone: impl Into<String>) -> Self {
        self.geo_mut().phone = Some(phone.into());
        self
    }

    fn postal(mut self, postal: impl Into<String>) -> Self {
        self.geo_mut().postal = Some(postal.into());
        self
    }

    fn code(mut self, code: impl Into<String>) -> Self {
        self.geo_mut().code = Some(code.into());
        self
    }

    fn translation(mut self, locale: impl Into<String>, name: impl Into<String>) -> Self {
        self.geo_mut()
            .translations
            .insert(locale.into(), name.into());
        self
    }
}
