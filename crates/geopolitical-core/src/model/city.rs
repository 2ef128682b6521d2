// crates/geopolitical-core/src/model/city.rs
use super::attrs::{GeoAttrs, GeoForm};
use crate::common::{CityId, EntityKind, EntityRef, NationId, RegionId};
use crate::geo::Point;
use crate::traits::{Document, Geopolitical};
use serde::{Deserialize, Serialize};

/// A city. Belongs to a nation and, optionally, to one of its regions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: CityId,
    pub nation: NationId,
    pub region: Option<RegionId>,
    pub geo: GeoAttrs,
    /// km²
    pub area: Option<u64>,
    pub point: Option<Point>,
    /// Region abbreviation copied on write. Not refreshed when the region
    /// later changes its abbreviation.
    pub region_abbr: Option<String>,
}

impl Document for City {
    type Id = CityId;
    const KIND: EntityKind = EntityKind::City;

    fn id(&self) -> &CityId {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.geo.slug)
    }

    fn sort_name(&self) -> &str {
        &self.geo.name
    }
}

impl Geopolitical for City {
    fn geo(&self) -> &GeoAttrs {
        &self.geo
    }

    fn entity_ref(&self) -> EntityRef {
        EntityRef::City(self.id)
    }

    /// The region when set, else the nation directly.
    fn parent(&self) -> Option<EntityRef> {
        Some(match self.region {
            Some(region) => EntityRef::Region(region),
            None => EntityRef::Nation(self.nation.clone()),
        })
    }
}

/// Input for creating or updating a [`City`].
///
/// `nation` may be left out when `region` is given; it is then taken from
/// the region.
#[derive(Clone, Debug, Default)]
pub struct CityForm {
    pub geo: GeoAttrs,
    pub nation: Option<NationId>,
    pub region: Option<RegionId>,
    pub area: Option<u64>,
    pub point: Option<Point>,
}

impl CityForm {
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

    pub fn in_region(mut self, region: RegionId) -> Self {
        self.region = Some(region);
        self
    }

    pub fn area(mut self, area: u64) -> Self {
        self.area = Some(area);
        self
    }

    pub fn at(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }
}

impl From<&City> for CityForm {
    fn from(c: &City) -> Self {
        Self {
            geo: c.geo.clone(),
            nation: Some(c.nation.clone()),
            region: c.region,
            area: c.area,
            point: c.point,
        }
    }
}

impl GeoForm for CityForm {
    fn geo_mut(&mut self) -> &mut GeoAttrs {
        &mut self.geo
    }
}
