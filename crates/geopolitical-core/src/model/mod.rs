// crates/geopolitical-core/src/model/mod.rs
pub mod attrs;
pub mod city;
pub mod hood;
pub mod nation;
pub mod region;
pub mod zone;

pub use attrs::{GeoAttrs, GeoForm};
pub use city::{City, CityForm};
pub use hood::{Hood, HoodForm};
pub use nation::{Nation, NationForm};
pub use region::{Region, RegionForm};
pub use zone::{Member, Zone, ZoneForm};

/// Any geopolitical entity, owned. Returned when resolving an
/// [`EntityRef`](crate::EntityRef).
#[derive(Clone, Debug)]
pub enum GeoEntity {
    Nation(Nation),
    Region(Region),
    City(City),
    Hood(Hood),
}

impl GeoEntity {
    pub fn geo(&self) -> &GeoAttrs {
        match self {
            GeoEntity::Nation(n) => &n.geo,
            GeoEntity::Region(r) => &r.geo,
            GeoEntity::City(c) => &c.geo,
            GeoEntity::Hood(h) => &h.geo,
        }
    }

    pub fn name(&self) -> &str {
        &self.geo().name
    }

    pub fn slug(&self) -> &str {
        &self.geo().slug
    }
}
