// crates/geopolitical-core/src/model/hood.rs
use super::attrs::{GeoAttrs, GeoForm};
use crate::common::{CityId, EntityKind, EntityRef, HoodId};
use crate::traits::{Document, Geopolitical};
use serde::{Deserialize, Serialize};

/// A neighborhood. Its slug always starts with its city's slug.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hood {
    pub id: HoodId,
    pub city: CityId,
    pub geo: GeoAttrs,
    pub rank: Option<u32>,
}

impl Document for Hood {
    type Id = HoodId;
    const KIND: EntityKind = EntityKind::Hood;

    fn id(&self) -> &HoodId {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.geo.slug)
    }

    fn sort_name(&self) -> &str {
        &self.geo.name
    }
}

impl Geopolitical for Hood {
    fn geo(&self) -> &GeoAttrs {
        &self.geo
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::Hood(self.id)
    }

    fn parent(&self) -> Option<EntityRef> {
        Some(EntityRef::City(self.city))
    }
}

#[derive(Clone, Debug, Default)]
pub struct HoodForm {
    pub geo: GeoAttrs,
    pub city: Option<CityId>,
    pub rank: Option<u32>,
}

impl HoodForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            geo: GeoAttrs::named(name),
            ..Self::default()
        }
    }

    pub fn in_city(mut self, city: CityId) -> Self {
        self.city = Some(city);
        self
    }

    pub fn rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

impl From<&Hood> for HoodForm {
    fn from(h: &Hood) -> Self {
        Self {
            geo: h.geo.clone(),
            city: Some(h.city),
            rank: h.rank,
        }
    }
}

impl GeoForm for HoodForm {
    fn geo_mut(&mut self) -> &mut GeoAttrs {
        &mut self.geo
    }
}
