// crates/geopolitical-core/src/db/delete.rs
//! Cascading deletes.
//!
//! Owned children go first, deepest level first (hoods, cities, regions).
//! Removal is sequential; the first failure stops the cascade and the
//! parent is kept, reported as [`GeoError::CascadeIncomplete`] with the
//! children that are still there.

use super::GeoDb;
use crate::common::{CityId, EntityRef, HoodId, NationId, RegionId};
use crate::error::{GeoError, Result};
use crate::model::{City, GeoEntity, Hood, Nation, Region};
use crate::store::GeoStore;
use tracing::{info, warn};

impl<S: GeoStore> GeoDb<S> {
    /// Children owned by `parent`, in removal order.
    fn cascade_plan(&self, parent: &EntityRef) -> Vec<EntityRef> {
        let cities: Vec<CityId> = match parent {
            EntityRef::Nation(id) => self.cities_of_nation(id).iter().map(|c| c.id).collect(),
            EntityRef::Region(id) => self.cities_of_region(*id).iter().map(|c| c.id).collect(),
            EntityRef::City(id) => vec![*id],
            EntityRef::Hood(_) => Vec::new(),
        };
        let mut plan: Vec<EntityRef> = cities
            .iter()
            .flat_map(|c| self.hoods_of(*c))
            .map(|h| EntityRef::Hood(h.id))
            .collect();
        match parent {
            EntityRef::Nation(id) => {
                plan.extend(cities.iter().map(|c| EntityRef::City(*c)));
                plan.extend(self.regions_of(id).iter().map(|r| EntityRef::Region(r.id)));
            }
            EntityRef::Region(_) => plan.extend(cities.iter().map(|c| EntityRef::City(*c))),
            EntityRef::City(_) | EntityRef::Hood(_) => {}
        }
        plan
    }

    fn remove_ref(&mut self, r: &EntityRef) -> Result<GeoEntity> {
        Ok(match r {
            EntityRef::Nation(id) => GeoEntity::Nation(self.col_mut::<Nation>().remove(id)?),
            EntityRef::Region(id) => GeoEntity::Region(self.col_mut::<Region>().remove(id)?),
            EntityRef::City(id) => {
                let city = self.col_mut::<City>().remove(id)?;
                self.geo.remove(*id);
                GeoEntity::City(city)
            }
            EntityRef::Hood(id) => GeoEntity::Hood(self.col_mut::<Hood>().remove(id)?),
        })
    }

    fn remove_children(&mut self, parent: &EntityRef) -> Result<usize> {
        let plan = self.cascade_plan(parent);
        for (done, child) in plan.iter().enumerate() {
            if let Err(source) = self.remove_ref(child) {
                let remaining: Vec<String> = plan[done..].iter().map(ToString::to_string).collect();
                warn!(%parent, %child, remaining = remaining.len(), error = %source, "cascade stopped");
                return Err(GeoError::CascadeIncomplete {
                    parent: parent.to_string(),
                    remaining,
                    source: Box::new(source),
                });
            }
        }
        Ok(plan.len())
    }

    /// Deletes any geopolitical entity together with everything it owns.
    pub fn delete(&mut self, target: &EntityRef) -> Result<GeoEntity> {
        // NotFound before touching any child
        self.resolve(target)?;
        let children = self.remove_children(target)?;
        let removed = self.remove_ref(target)?;
        info!(entity = %target, slug = %removed.slug(), children, "deleted");
        Ok(removed)
    }

    pub fn delete_nation(&mut self, id: &NationId) -> Result<Nation> {
        match self.delete(&EntityRef::Nation(id.clone()))? {
            GeoEntity::Nation(n) => Ok(n),
            other => Err(unexpected(other)),
        }
    }

    pub fn delete_region(&mut self, id: RegionId) -> Result<Region> {
        match self.delete(&EntityRef::Region(id))? {
            GeoEntity::Region(r) => Ok(r),
            other => Err(unexpected(other)),
        }
    }

    pub fn delete_city(&mut self, id: CityId) -> Result<City> {
        match self.delete(&EntityRef::City(id))? {
            GeoEntity::City(c) => Ok(c),
            other => Err(unexpected(other)),
        }
    }

    pub fn delete_hood(&mut self, id: HoodId) -> Result<Hood> {
        match self.delete(&EntityRef::Hood(id))? {
            GeoEntity::Hood(h) => Ok(h),
            other => Err(unexpected(other)),
        }
    }
}

fn unexpected(entity: GeoEntity) -> GeoError {
    GeoError::InvalidData(format!("store returned unexpected entity {}", entity.slug()))
}
