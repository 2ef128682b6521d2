//! Fail-closed cascades and the store's uniqueness backstop, driven through
//! a store whose writes can be made to fail for chosen slugs.

use geopolitical_core::prelude::*;
use geopolitical_core::{
    City, Document, Hood, Member, MemoryStore, Nation, Region, Store, ValidationError, Zone,
};
use std::collections::HashSet;

#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_on: HashSet<String>,
    /// Slugs another writer claims between validation and commit.
    raced: HashSet<String>,
}

macro_rules! flaky_store {
    ($doc:ty) => {
        impl Store<$doc> for FlakyStore {
            fn get(&self, id: &<$doc as Document>::Id) -> Option<&$doc> {
                Store::<$doc>::get(&self.inner, id)
            }
            fn find_by_slug(&self, slug: &str) -> Option<&$doc> {
                Store::<$doc>::find_by_slug(&self.inner, slug)
            }
            fn all(&self) -> Vec<&$doc> {
                Store::<$doc>::all(&self.inner)
            }
            fn next_id(&mut self) -> u32 {
                Store::<$doc>::next_id(&mut self.inner)
            }
            fn insert(&mut self, doc: $doc) -> geopolitical_core::Result<$doc> {
                if let Some(slug) = doc.slug().filter(|s| self.raced.contains(*s)) {
                    return Err(GeoError::DuplicateIdentity {
                        kind: <$doc as Document>::KIND,
                        key: slug.to_string(),
                    });
                }
                Store::<$doc>::insert(&mut self.inner, doc)
            }
            fn replace(&mut self, doc: $doc) -> geopolitical_core::Result<$doc> {
                Store::<$doc>::replace(&mut self.inner, doc)
            }
            fn remove(&mut self, id: &<$doc as Document>::Id) -> geopolitical_core::Result<$doc> {
                let refused = Store::<$doc>::get(&self.inner, id)
                    .and_then(|d| d.slug())
                    .is_some_and(|slug| self.fail_on.contains(slug));
                if refused {
                    return Err(GeoError::InvalidData(format!("refusing to remove {id}")));
                }
                Store::<$doc>::remove(&mut self.inner, id)
            }
        }
    };
}

flaky_store!(Nation);
flaky_store!(Region);
flaky_store!(City);
flaky_store!(Hood);
flaky_store!(Zone);
flaky_store!(Member);

fn seeded(fail_on: &[&str]) -> GeoDb<FlakyStore> {
    let store = FlakyStore {
        fail_on: fail_on.iter().map(|s| s.to_string()).collect(),
        ..FlakyStore::default()
    };
    let mut db = GeoDb::with_store(store);
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    let nj = db
        .create_region(RegionForm::new("New Jersey").in_nation("US").abbr("NJ"))
        .unwrap();
    let gotham = db.create_city(CityForm::new("Gotham").in_region(nj.id)).unwrap();
    let metropolis = db.create_city(CityForm::new("Metropolis").in_nation("US")).unwrap();
    db.create_hood(HoodForm::new("Downtown").in_city(gotham.id)).unwrap();
    db.create_hood(HoodForm::new("Jd. Italia").in_city(metropolis.id)).unwrap();
    db
}

#[test]
fn failing_child_keeps_the_parent() {
    let mut db = seeded(&["metropolis-jd-italia"]);
    let us = geopolitical_core::NationId::new("US");

    let err = db.delete_nation(&us).unwrap_err();
    match err {
        GeoError::CascadeIncomplete {
            parent,
            remaining,
            source,
        } => {
            assert_eq!(parent, "nation:US");
            assert_eq!(remaining, ["hood:2", "city:1", "city:2", "region:1"]);
            assert!(matches!(*source, GeoError::InvalidData(_)));
        }
        other => panic!("expected an incomplete cascade, got {other:?}"),
    }

    // the first hood went, everything after the failure is still there
    assert!(db.find::<Hood>("gotham-downtown").is_err());
    assert!(db.find::<Hood>("metropolis-jd-italia").is_ok());
    assert!(db.nation(&us).is_ok());
    assert_eq!(db.stats().cities, 2);
    assert_eq!(db.stats().regions, 1);
}

#[test]
fn healthy_store_cascades_fully() {
    let mut db = seeded(&[]);
    let city = db.find::<City>("gotham").unwrap().id;

    let removed = db.delete_city(city).unwrap();
    assert_eq!(removed.geo.slug, "gotham");
    assert_eq!(db.stats().hoods, 1);
    assert!(db.find::<Region>("new-jersey").is_ok());
}

#[test]
fn region_delete_spares_region_less_cities() {
    let mut db = seeded(&[]);
    let nj = db.find::<Region>("new-jersey").unwrap().id;

    db.delete_region(nj).unwrap();
    assert!(db.find::<City>("gotham").is_err());
    assert!(db.find::<City>("metropolis").is_ok());
    assert!(db.find::<Hood>("metropolis-jd-italia").is_ok());
}

#[test]
fn store_duplicate_surfaces_as_a_validation_finding() {
    let mut store = seeded(&[]).into_store();
    store.raced.insert("smallville".to_string());
    let mut db = GeoDb::with_store(store);

    let err = db
        .create_city(CityForm::new("Smallville").in_nation("US"))
        .unwrap_err();
    let findings = err.validation().expect("validation errors");
    assert!(findings.contains(&ValidationError::DuplicateIdentity {
        slug: "smallville".into()
    }));
    assert!(db.find::<City>("smallville").is_err());
    assert_eq!(db.stats().cities, 2);
}
