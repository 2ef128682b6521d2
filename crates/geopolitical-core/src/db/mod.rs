// crates/geopolitical-core/src/db/mod.rs

//! # GeoDb
//!
//! The engine facade. Every mutation goes through the same pipeline
//! (normalize, derive defaults, resolve slug, validate, commit) and every
//! read goes through the store, the search helpers or the spatial index.

use crate::common::{
    CityId, DbStats, EntityKind, EntityRef, HoodId, NationId, RegionId, ZoneId,
};
use crate::error::{GeoError, Result};
use crate::geo::GeoIndex;
use crate::model::{City, GeoEntity, Hood, Member, Nation, Region, Zone};
use crate::store::{GeoStore, MemoryStore, Store};
use crate::text::fold_key;
use crate::traits::{Document, Geopolitical};
use std::cmp::Ordering;

mod delete;
mod inherit;
mod validate;
mod write;
mod zones;

pub use inherit::Inherited;

/// Top-level database structure.
///
/// Generic over the document store so that persistence can be swapped;
/// [`MemoryStore`] is the default and the one snapshots are made of.
#[derive(Debug)]
pub struct GeoDb<S: GeoStore = MemoryStore> {
    pub(crate) store: S,
    pub(crate) geo: GeoIndex,
}

/// Convenient alias for the default backend.
pub type DefaultGeoDb = GeoDb<MemoryStore>;

impl GeoDb<MemoryStore> {
    pub fn new() -> Self {
        Self::with_store(MemoryStore::new())
    }
}

impl Default for GeoDb<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: GeoStore> GeoDb<S> {
    /// Wraps an existing store, building the spatial index from its cities.
    pub fn with_store(store: S) -> Self {
        let geo = GeoIndex::from_points(
            Store::<City>::all(&store)
                .into_iter()
                .filter_map(|c| c.point.map(|p| (c.id, p))),
        );
        Self { store, geo }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub(crate) fn col<D: Document>(&self) -> &dyn Store<D>
    where
        S: Store<D>,
    {
        &self.store
    }

    pub(crate) fn col_mut<D: Document>(&mut self) -> &mut dyn Store<D>
    where
        S: Store<D>,
    {
        &mut self.store
    }

    pub fn stats(&self) -> DbStats {
        DbStats {
            nations: self.col::<Nation>().len(),
            regions: self.col::<Region>().len(),
            cities: self.col::<City>().len(),
            hoods: self.col::<Hood>().len(),
            zones: self.col::<Zone>().len(),
            members: self.col::<Member>().len(),
        }
    }

    // -----------------------------------------------------------------------
    // LOOKUPS
    // -----------------------------------------------------------------------

    pub fn get<D: Document>(&self, id: &D::Id) -> Option<&D>
    where
        S: Store<D>,
    {
        self.col::<D>().get(id)
    }

    /// Looks a document up by slug, then by its key rendered as text
    /// (case-insensitive, so `"br"` finds nation `BR`).
    pub fn find<D: Document>(&self, key: &str) -> Result<&D>
    where
        S: Store<D>,
    {
        let key = key.trim();
        let col = self.col::<D>();
        col.find_by_slug(key)
            .or_else(|| {
                col.all()
                    .into_iter()
                    .find(|d| d.id().to_string().eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| GeoError::not_found(D::KIND, key))
    }

    pub fn nation(&self, id: &NationId) -> Result<&Nation> {
        self.get::<Nation>(id)
            .ok_or_else(|| GeoError::not_found(EntityKind::Nation, id))
    }

    pub fn region(&self, id: RegionId) -> Result<&Region> {
        self.get::<Region>(&id)
            .ok_or_else(|| GeoError::not_found(EntityKind::Region, id))
    }

    pub fn city(&self, id: CityId) -> Result<&City> {
        self.get::<City>(&id)
            .ok_or_else(|| GeoError::not_found(EntityKind::City, id))
    }

    pub fn hood(&self, id: HoodId) -> Result<&Hood> {
        self.get::<Hood>(&id)
            .ok_or_else(|| GeoError::not_found(EntityKind::Hood, id))
    }

    pub fn zone(&self, id: ZoneId) -> Result<&Zone> {
        self.get::<Zone>(&id)
            .ok_or_else(|| GeoError::not_found(EntityKind::Zone, id))
    }

    /// Resolves a typed reference to an owned copy of the entity.
    pub fn resolve(&self, r: &EntityRef) -> Result<GeoEntity> {
        Ok(match r {
            EntityRef::Nation(id) => GeoEntity::Nation(self.nation(id)?.clone()),
            EntityRef::Region(id) => GeoEntity::Region(self.region(*id)?.clone()),
            EntityRef::City(id) => GeoEntity::City(self.city(*id)?.clone()),
            EntityRef::Hood(id) => GeoEntity::Hood(self.hood(*id)?.clone()),
        })
    }

    pub fn regions_of(&self, nation: &NationId) -> Vec<&Region> {
        let mut out: Vec<&Region> = self
            .col::<Region>()
            .all()
            .into_iter()
            .filter(|r| r.nation == *nation)
            .collect();
        out.sort_by(|a, b| by_name(*a, *b));
        out
    }

    /// Every city of the nation, with or without a region.
    pub fn cities_of_nation(&self, nation: &NationId) -> Vec<&City> {
        let mut out: Vec<&City> = self
            .col::<City>()
            .all()
            .into_iter()
            .filter(|c| c.nation == *nation)
            .collect();
        out.sort_by(|a, b| by_name(*a, *b));
        out
    }

    pub fn cities_of_region(&self, region: RegionId) -> Vec<&City> {
        let mut out: Vec<&City> = self
            .col::<City>()
            .all()
            .into_iter()
            .filter(|c| c.region == Some(region))
            .collect();
        out.sort_by(|a, b| by_name(*a, *b));
        out
    }

    pub fn hoods_of(&self, city: CityId) -> Vec<&Hood> {
        let mut out: Vec<&Hood> = self
            .col::<Hood>()
            .all()
            .into_iter()
            .filter(|h| h.city == city)
            .collect();
        out.sort_by(|a, b| by_name(*a, *b));
        out
    }

    // -----------------------------------------------------------------------
    // COLLECTION VIEWS
    // -----------------------------------------------------------------------

    /// All documents of a kind sorted by name (folded), then slug.
    pub fn ordered<D: Document>(&self) -> Vec<&D>
    where
        S: Store<D>,
    {
        let mut out = self.col::<D>().all();
        out.sort_by(|a, b| by_name(*a, *b));
        out
    }

    /// Cities by population, largest first; unknown populations last.
    pub fn population_ordered(&self) -> Vec<&City> {
        let mut out = self.col::<City>().all();
        out.sort_by(|a, b| {
            b.geo
                .population
                .cmp(&a.geo.population)
                .then_with(|| a.geo.slug.cmp(&b.geo.slug))
        });
        out
    }

    // -----------------------------------------------------------------------
    // DISPLAY HELPERS
    // -----------------------------------------------------------------------

    /// Region abbreviation for a city: the cached copy when present, else a
    /// live lookup of the region. Reading never writes the cache.
    pub fn region_abbr(&self, city: &City) -> Option<String> {
        if let Some(cached) = &city.region_abbr {
            return Some(cached.clone());
        }
        city.region
            .and_then(|id| self.get::<Region>(&id))
            .and_then(|r| r.geo.abbr.clone())
    }

    /// `"name<sep>region"`, where region is its abbreviation or, lacking
    /// one, its name. A city without region yields just its name.
    pub fn qualified_name(&self, city: &City, separator: &str) -> String {
        let region = self.region_abbr(city).or_else(|| {
            city.region
                .and_then(|id| self.get::<Region>(&id))
                .map(|r| r.display_name().to_string())
        });
        match region {
            Some(region) => format!("{}{separator}{region}", city.display_name()),
            None => city.display_name().to_string(),
        }
    }

    /// [`qualified_name`](Self::qualified_name) followed by the nation abbr.
    pub fn fully_qualified_name(&self, city: &City, separator: &str) -> String {
        format!(
            "{}{separator}{}",
            self.qualified_name(city, separator),
            city.nation
        )
    }

    /// Abbreviation of the city's disambiguating parent: its region's
    /// abbreviation when it has a region, else its nation's.
    pub fn parent_abbr(&self, city: &City) -> Option<String> {
        match city.region {
            Some(_) => self.region_abbr(city),
            None => Some(city.nation.to_string()),
        }
    }
}

pub(crate) fn by_name<D: Document>(a: &D, b: &D) -> Ordering {
    fold_key(a.sort_name())
        .cmp(&fold_key(b.sort_name()))
        .then_with(|| a.slug().cmp(&b.slug()))
}
