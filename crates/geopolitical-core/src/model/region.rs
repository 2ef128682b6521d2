// crates/geopolitical-core/src/model/region.rs
use super::attrs::{GeoAttrs, GeoForm};
use crate::common::{CityId, EntityKind, EntityRef, NationId, RegionId};
use crate::traits::{Document, Geopolitical};
use serde::{Deserialize, Serialize};

/// A region / state / province within a nation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub nation: NationId,
    pub geo: GeoAttrs,
    pub timezone: Option<String>,
    pub capital: Option<CityId>,
}

impl Document for Region {
    type Id = RegionId;
    const KIND: EntityKind = EntityKind::Region;

    fn id(&self) -> &RegionId {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.geo.slug)
    }

    fn sort_name(&self) -> &str {
        &self.geo.name
    }
}

impl Geopolitical for Region {
    fn geo(&self) -> &GeoAttrs {
        &self.geo
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::Region(self.id)
    }

    fn parent(&self) -> Option<EntityRef> {
        Some(EntityRef::Nation(self.nation.clone()))
    }
}

/// Input for creating or updating a [`Region`].
#[derive(Clone, Debug, Default)]
pub struct RegionForm {
    pub geo: GeoAttrs,
    pub nation: Option<NationId>,
    pub timezone: Option<String>,
    pub capital: Option<CityId>,
}

impl RegionForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            geo: GeoAttrs::named(name),
            ..Self::default()
        }
    }

    pub fn in_nation(mut self, nation: impl Into<NationId>) -> Self {
        self.nation = Some(nation.into());
        self
    }

    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn capital(mut self, capital: CityId) -> Self {
        self.capital = Some(capital);
        self
    }
}

impl From<&Region> for RegionForm {
    fn from(r: &Region) -> Self {
        Self {
            geo: r.geo.clone(),
            nation: Some(r.nation.clone()),
            timezone: r.timezone.clone(),
            capital: r.capital,
        }
    }
}

impl GeoForm for RegionForm {
    fn geo_mut(&mut self) -> &mut GeoAttrs {
        &mut self.geo
    }
}
