// crates/geopolitical-core/src/store.rs
//! Storage seam: a per-collection create/read/update/delete interface with
//! a unique slug index, and the in-memory implementation used by default.

use crate::error::{GeoError, Result};
use crate::model::{City, Hood, Member, Nation, Region, Zone};
use crate::traits::Document;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Document store for one collection.
///
/// `insert` and `replace` are the final backstop for identity: a write
/// whose id or slug is already held by another document fails with
/// [`GeoError::DuplicateIdentity`] and leaves the collection unchanged.
pub trait Store<D: Document> {
    fn get(&self, id: &D::Id) -> Option<&D>;

    fn find_by_slug(&self, slug: &str) -> Option<&D>;

    /// Every document, in key order.
    fn all(&self) -> Vec<&D>;

    /// Fresh surrogate key value for this collection.
    fn next_id(&mut self) -> u32;

    fn insert(&mut self, doc: D) -> Result<D>;

    fn replace(&mut self, doc: D) -> Result<D>;

    fn remove(&mut self, id: &D::Id) -> Result<D>;

    fn len(&self) -> usize {
        self.all().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything the engine needs: one [`Store`] per document type.
pub trait GeoStore:
    Store<Nation> + Store<Region> + Store<City> + Store<Hood> + Store<Zone> + Store<Member>
{
}

impl<T> GeoStore for T where
    T: Store<Nation> + Store<Region> + Store<City> + Store<Hood> + Store<Zone> + Store<Member>
{
}

/// One in-memory collection: documents by key plus a unique slug index.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Collection<D: Document> {
    docs: BTreeMap<D::Id, D>,
    #[serde(skip)]
    slugs: HashMap<String, D::Id>,
    seq: u32,
}

impl<D: Document> Default for Collection<D> {
    fn default() -> Self {
        Self {
            docs: BTreeMap::new(),
            slugs: HashMap::new(),
            seq: 0,
        }
    }
}

impl<D: Document> Collection<D> {
    /// Rebuilds the slug index from the documents (after deserializing).
    pub fn reindex(&mut self) -> Result<()> {
        self.slugs.clear();
        for (id, doc) in &self.docs {
            if let Some(slug) = doc.slug() {
                if self.slugs.insert(slug.to_string(), id.clone()).is_some() {
                    return Err(GeoError::InvalidData(format!(
                        "{} slug {slug} stored twice",
                        D::KIND
                    )));
                }
            }
        }
        Ok(())
    }

    fn slug_owner(&self, slug: &str) -> Option<&D::Id> {
        self.slugs.get(slug)
    }

    fn duplicate(key: impl ToString) -> GeoError {
        GeoError::DuplicateIdentity {
            kind: D::KIND,
            key: key.to_string(),
        }
    }
}

impl<D: Document> Store<D> for Collection<D> {
    fn get(&self, id: &D::Id) -> Option<&D> {
        self.docs.get(id)
    }

    fn find_by_slug(&self, slug: &str) -> Option<&D> {
        self.slugs.get(slug).and_then(|id| self.docs.get(id))
    }

    fn all(&self) -> Vec<&D> {
        self.docs.values().collect()
    }

    fn next_id(&mut self) -> u32 {
        self.seq += 1;
        self.seq
    }

    fn insert(&mut self, doc: D) -> Result<D> {
        let id = doc.id().clone();
        if self.docs.contains_key(&id) {
            return Err(Self::duplicate(&id));
        }
        if let Some(slug) = doc.slug() {
            if self.slug_owner(slug).is_some() {
                return Err(Self::duplicate(slug));
            }
            self.slugs.insert(slug.to_string(), id.clone());
        }
        self.docs.insert(id, doc.clone());
        Ok(doc)
    }

    fn replace(&mut self, doc: D) -> Result<D> {
        let id = doc.id().clone();
        let Some(old) = self.docs.get(&id) else {
            return Err(GeoError::not_found(D::KIND, &id));
        };
        let old_slug = old.slug().map(str::to_string);
        if let Some(slug) = doc.slug() {
            if self.slug_owner(slug).is_some_and(|owner| *owner != id) {
                return Err(Self::duplicate(slug));
            }
        }
        if let Some(old_slug) = old_slug {
            self.slugs.remove(&old_slug);
        }
        if let Some(slug) = doc.slug() {
            self.slugs.insert(slug.to_string(), id.clone());
        }
        self.docs.insert(id, doc.clone());
        Ok(doc)
    }

    fn remove(&mut self, id: &D::Id) -> Result<D> {
        let doc = self
            .docs
            .remove(id)
            .ok_or_else(|| GeoError::not_found(D::KIND, id))?;
        if let Some(slug) = doc.slug() {
            self.slugs.remove(slug);
        }
        Ok(doc)
    }

    fn len(&self) -> usize {
        self.docs.len()
    }
}

/// Default backend: one [`Collection`] per document type, all in memory.
///
/// Serializable as a whole, which is what snapshots persist.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    nations: Collection<Nation>,
    regions: Collection<Region>,
    cities: Collection<City>,
    hoods: Collection<Hood>,
    zones: Collection<Zone>,
    members: Collection<Member>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds every slug index; call after deserializing.
    pub fn reindex(&mut self) -> Result<()> {
        self.nations.reindex()?;
        self.regions.reindex()?;
        self.cities.reindex()?;
        self.hoods.reindex()?;
        self.zones.reindex()?;
        self.members.reindex()
    }
}

macro_rules! delegate_store {
    ($doc:ty, $field:ident) => {
        impl Store<$doc> for MemoryStore {
            fn get(&self, id: &<$doc as Document>::Id) -> Option<&$doc> {
                self.$field.get(id)
            }
            fn find_by_slug(&self, slug: &str) -> Option<&$doc> {
                self.$field.find_by_slug(slug)
            }
            fn all(&self) -> Vec<&$doc> {
                self.$field.all()
            }
            fn next_id(&mut self) -> u32 {
                self.$field.next_id()
            }
            fn insert(&mut self, doc: $doc) -> Result<$doc> {
                self.$field.insert(doc)
            }
            fn replace(&mut self, doc: $doc) -> Result<$doc> {
                self.$field.replace(doc)
            }
            fn remove(&mut self, id: &<$doc as Document>::Id) -> Result<$doc> {
                self.$field.remove(id)
            }
            fn len(&self) -> usize {
                Store::<$doc>::len(&self.$field)
            }
        }
    };
}

delegate_store!(Nation, nations);
delegate_store!(Region, regions);
delegate_store!(City, cities);
delegate_store!(Hood, hoods);
delegate_store!(Zone, zones);
delegate_store!(Member, members);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{EntityKind, ZoneId};

    fn zone(id: u32, slug: &str) -> Zone {
        Zone {
            id: ZoneId(id),
            name: slug.to_string(),
            slug: slug.to_string(),
            abbr: None,
            kind: None,
            info: None,
            active: true,
        }
    }

    #[test]
    fn insert_rejects_taken_slug() {
        let mut zones: Collection<Zone> = Collection::default();
        zones.insert(zone(1, "north")).unwrap();
        let err = zones.insert(zone(2, "north")).unwrap_err();
        assert!(matches!(
            err,
            GeoError::DuplicateIdentity { kind: EntityKind::Zone, ref key } if key == "north"
        ));
        assert_eq!(Store::<Zone>::len(&zones), 1);
    }

    #[test]
    fn replace_moves_slug_index() {
        let mut zones: Collection<Zone> = Collection::default();
        zones.insert(zone(1, "north")).unwrap();
        zones.replace(zone(1, "south")).unwrap();
        assert!(zones.find_by_slug("north").is_none());
        assert_eq!(zones.find_by_slug("south").unwrap().id, ZoneId(1));
        // the freed slug is available again
        zones.insert(zone(2, "north")).unwrap();
    }

    #[test]
    fn replace_rejects_slug_of_another_document() {
        let mut zones: Collection<Zone> = Collection::default();
        zones.insert(zone(1, "north")).unwrap();
        zones.insert(zone(2, "south")).unwrap();
        assert!(zones.replace(zone(2, "north")).is_err());
        assert_eq!(zones.find_by_slug("south").unwrap().id, ZoneId(2));
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut zones: Collection<Zone> = Collection::default();
        assert!(matches!(
            zones.remove(&ZoneId(9)),
            Err(GeoError::NotFound { kind: EntityKind::Zone, .. })
        ));
    }

    #[test]
    fn ids_are_sequential_per_collection() {
        let mut store = MemoryStore::new();
        assert_eq!(Store::<Zone>::next_id(&mut store), 1);
        assert_eq!(Store::<Zone>::next_id(&mut store), 2);
        assert_eq!(Store::<City>::next_id(&mut store), 1);
    }
}
