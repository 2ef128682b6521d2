use geopolitical_core::prelude::*;
use geopolitical_core::{
    City, EntityKind, Hood, Nation, NationId, Region, ValidationError, ValidationErrors,
};

fn invalid(err: GeoError) -> ValidationErrors {
    match err {
        GeoError::Invalid(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    }
}

struct Brasil {
    db: GeoDb,
    br: Nation,
    sp: Region,
    mg: Region,
}

fn brasil() -> Brasil {
    let mut db = GeoDb::new();
    let br = db
        .create_nation(NationForm::new("Brasil", "br").phone("55"))
        .unwrap();
    let sp = db
        .create_region(RegionForm::new("São Paulo").in_nation(br.id.clone()).abbr("SP"))
        .unwrap();
    let mg = db
        .create_region(
            RegionForm::new("minas gerais")
                .in_nation(br.id.clone())
                .abbr("MG")
                .postal("30000"),
        )
        .unwrap();
    Brasil { db, br, sp, mg }
}

#[test]
fn same_named_cities_get_region_suffix() {
    let Brasil { mut db, br, sp, mg } = brasil();

    let first = db.create_city(CityForm::new("Patópolis").in_region(sp.id)).unwrap();
    let second = db.create_city(CityForm::new("Patópolis").in_region(mg.id)).unwrap();

    assert_eq!(first.geo.slug, "patopolis");
    assert_eq!(second.geo.slug, "patopolis-mg");
    // nation comes from the region when omitted
    assert_eq!(second.nation, br.id);
    assert_eq!(mg.geo.name, "Minas Gerais");
}

#[test]
fn third_sibling_under_same_disambiguator_is_a_conflict() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();

    let a = db.create_city(CityForm::new("Springfield").in_nation("US")).unwrap();
    let b = db.create_city(CityForm::new("Springfield").in_nation("US")).unwrap();
    let err = db
        .create_city(CityForm::new("Springfield").in_nation("US"))
        .unwrap_err();

    assert_eq!(a.geo.slug, "springfield");
    assert_eq!(b.geo.slug, "springfield-us");
    assert!(invalid(err).contains(&ValidationError::DuplicateIdentity {
        slug: "springfield-us".into()
    }));
    assert_eq!(db.stats().cities, 2);
}

#[test]
fn hood_slug_is_prefixed_with_city() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    let gotham = db.create_city(CityForm::new("Gotham").in_nation("US")).unwrap();
    let metropolis = db.create_city(CityForm::new("Metropolis").in_nation("US")).unwrap();

    let hood = db.create_hood(HoodForm::new("Jd. Italia").in_city(gotham.id)).unwrap();
    let other = db
        .create_hood(HoodForm::new("Jd. Italia").in_city(metropolis.id))
        .unwrap();

    assert_eq!(hood.geo.slug, "gotham-jd-italia");
    assert_eq!(other.geo.slug, "metropolis-jd-italia");
}

#[test]
fn hood_slug_collision_is_not_disambiguated() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    let gotham = db.create_city(CityForm::new("Gotham").in_nation("US")).unwrap();
    db.create_hood(HoodForm::new("Jd. Italia").in_city(gotham.id)).unwrap();

    let err = db
        .create_hood(HoodForm::new("Jd Italia").in_city(gotham.id))
        .unwrap_err();
    assert!(invalid(err).contains(&ValidationError::DuplicateIdentity {
        slug: "gotham-jd-italia".into()
    }));
}

#[test]
fn hood_named_after_its_city_still_gets_the_prefix() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    let gotham = db.create_city(CityForm::new("Gotham").in_nation("US")).unwrap();

    let heights = db
        .create_hood(HoodForm::new("Gotham Heights").in_city(gotham.id))
        .unwrap();
    let park = db.create_hood(HoodForm::new("Park").in_city(gotham.id)).unwrap();
    let gotham_park = db
        .create_hood(HoodForm::new("Gotham Park").in_city(gotham.id))
        .unwrap();

    assert_eq!(heights.geo.slug, "gotham-gotham-heights");
    assert_eq!(park.geo.slug, "gotham-park");
    assert_eq!(gotham_park.geo.slug, "gotham-gotham-park");

    // a requested slug that already names the city is not prefixed twice
    let plaza = db
        .create_hood(HoodForm::new("Plaza").in_city(gotham.id).slug("gotham-old-plaza"))
        .unwrap();
    assert_eq!(plaza.geo.slug, "gotham-old-plaza");
}

#[test]
fn hood_names_are_unique_within_their_city() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    let gotham = db.create_city(CityForm::new("Gotham").in_nation("US")).unwrap();
    let metropolis = db.create_city(CityForm::new("Metropolis").in_nation("US")).unwrap();
    db.create_hood(HoodForm::new("Downtown").in_city(gotham.id)).unwrap();

    let err = db
        .create_hood(HoodForm::new("DOWNTOWN").in_city(gotham.id).slug("downtown-two"))
        .unwrap_err();
    assert!(invalid(err).contains(&ValidationError::ScopedUniquenessViolation {
        field: "name",
        scope: "city",
    }));

    assert!(db
        .create_hood(HoodForm::new("Downtown").in_city(metropolis.id))
        .is_ok());
}

#[test]
fn moving_a_hood_swaps_its_city_prefix() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    let gotham = db.create_city(CityForm::new("Gotham").in_nation("US")).unwrap();
    let metropolis = db.create_city(CityForm::new("Metropolis").in_nation("US")).unwrap();
    let hood = db.create_hood(HoodForm::new("Jd. Italia").in_city(gotham.id)).unwrap();

    let moved = db
        .update_hood(hood.id, HoodForm::from(&hood).in_city(metropolis.id))
        .unwrap();
    assert_eq!(moved.geo.slug, "metropolis-jd-italia");
    assert!(db.search::<Hood>("gotham", false).is_empty());
}

#[test]
fn phone_and_postal_fall_back_to_ancestors() {
    let Brasil { mut db, mg, .. } = brasil();
    let bh = db
        .create_city(CityForm::new("Belo Horizonte").in_region(mg.id).phone("002"))
        .unwrap();
    let op = db.create_city(CityForm::new("Ouro Preto").in_region(mg.id)).unwrap();
    let savassi = db.create_hood(HoodForm::new("Savassi").in_city(bh.id)).unwrap();
    let centro = db.create_hood(HoodForm::new("Centro").in_city(op.id)).unwrap();

    assert_eq!(db.effective_phone(&savassi).as_deref(), Some("002"));
    assert_eq!(db.effective_phone(&centro).as_deref(), Some("55"));
    assert_eq!(db.effective_postal(&bh).as_deref(), Some("30000"));
    assert_eq!(db.effective(&centro, Inherited::Postal).as_deref(), Some("30000"));

    // resolution never writes back
    assert_eq!(db.hood(savassi.id).unwrap().geo.phone, None);
}

#[test]
fn region_from_another_nation_is_rejected_and_not_persisted() {
    let Brasil { mut db, mg, .. } = brasil();
    db.create_nation(NationForm::new("Argentina", "AR")).unwrap();

    let err = db
        .create_city(CityForm::new("Rosario").in_nation("AR").in_region(mg.id))
        .unwrap_err();

    let errors = invalid(err);
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::HierarchyMismatch { field: "region", .. })));
    assert_eq!(db.stats().cities, 0);
    assert!(db.search::<City>("rosario", true).is_empty());
}

#[test]
fn all_findings_are_reported_together() {
    let mut db = GeoDb::new();
    let err = db
        .create_city(CityForm::new("   ").in_nation("ZZ"))
        .unwrap_err();

    let by_field = invalid(err).by_field();
    assert!(by_field.contains_key("name"));
    assert!(by_field.contains_key("nation"));
    assert!(by_field.contains_key("slug"));
}

#[test]
fn region_names_are_unique_within_their_nation() {
    let Brasil { mut db, br, .. } = brasil();
    let err = db
        .create_region(RegionForm::new("MINAS GERAIS").in_nation(br.id.clone()))
        .unwrap_err();
    assert!(invalid(err).contains(&ValidationError::ScopedUniquenessViolation {
        field: "name",
        scope: "nation",
    }));

    // same name under another nation is fine
    db.create_nation(NationForm::new("Portugal", "PT")).unwrap();
    let other = db
        .create_region(RegionForm::new("Minas Gerais").in_nation("PT"))
        .unwrap();
    assert_eq!(other.geo.slug, "minas-gerais-pt");
}

#[test]
fn region_abbrs_are_unique_within_their_nation() {
    let Brasil { mut db, br, .. } = brasil();
    let err = db
        .create_region(RegionForm::new("Mato Grosso").in_nation(br.id.clone()).abbr("MG"))
        .unwrap_err();
    assert!(invalid(err).contains(&ValidationError::ScopedUniquenessViolation {
        field: "abbr",
        scope: "nation",
    }));

    db.create_nation(NationForm::new("Portugal", "PT")).unwrap();
    assert!(db
        .create_region(RegionForm::new("Minho Galego").in_nation("PT").abbr("MG"))
        .is_ok());
}

#[test]
fn city_names_are_unique_within_their_region() {
    let Brasil { mut db, sp, mg, .. } = brasil();
    db.create_city(CityForm::new("Patópolis").in_region(sp.id)).unwrap();

    // the slug would disambiguate, the name check still refuses
    let err = db
        .create_city(CityForm::new("PATOPOLIS").in_region(sp.id))
        .unwrap_err();
    let errors = invalid(err);
    assert!(errors.contains(&ValidationError::ScopedUniquenessViolation {
        field: "name",
        scope: "region",
    }));
    assert_eq!(errors.len(), 1);

    assert!(db.create_city(CityForm::new("Patópolis").in_region(mg.id)).is_ok());
}

#[test]
fn nation_keeps_its_descriptive_fields() {
    let mut db = GeoDb::new();
    let ch = db
        .create_nation(
            NationForm::new("Switzerland", "ch")
                .code3("che")
                .tld(".ch")
                .currency("CHF")
                .languages(["de", " ", "fr", "it", "rm"]),
        )
        .unwrap();

    assert_eq!(ch.code3.as_deref(), Some("CHE"));
    assert_eq!(ch.tld.as_deref(), Some(".ch"));
    assert_eq!(ch.languages, ["de", "fr", "it", "rm"]);
    assert_eq!(ch.primary_language(), Some("de"));

    let bare = db.create_nation(NationForm::new("Nowhere", "NW")).unwrap();
    assert_eq!(bare.primary_language(), None);
}

#[test]
fn nation_abbr_is_an_uppercase_immutable_key() {
    let Brasil { mut db, br, .. } = brasil();
    assert_eq!(br.id.as_str(), "BR");
    assert_eq!(br.geo.abbr.as_deref(), Some("BR"));

    let dup = db.create_nation(NationForm::new("Brazil", "Br")).unwrap_err();
    assert!(invalid(dup).contains(&ValidationError::ScopedUniquenessViolation {
        field: "abbr",
        scope: "collection",
    }));

    let err = db
        .update_nation(&br.id, NationForm::from(&br).abbr("BZ"))
        .unwrap_err();
    assert!(invalid(err).contains(&ValidationError::ImmutableField { field: "abbr" }));

    assert_eq!(db.find::<Nation>("br").unwrap().id, br.id);
}

#[test]
fn nation_capital_must_be_one_of_its_cities() {
    let Brasil { mut db, br, mg, .. } = brasil();
    db.create_nation(NationForm::new("Argentina", "AR")).unwrap();
    let rosario = db.create_city(CityForm::new("Rosario").in_nation("AR")).unwrap();
    let bh = db.create_city(CityForm::new("Belo Horizonte").in_region(mg.id)).unwrap();

    let err = db
        .update_nation(&br.id, NationForm::from(&br).capital(rosario.id))
        .unwrap_err();
    assert!(invalid(err)
        .iter()
        .any(|e| matches!(e, ValidationError::HierarchyMismatch { field: "capital", .. })));

    let updated = db
        .update_nation(&br.id, NationForm::from(&br).capital(bh.id))
        .unwrap();
    assert_eq!(updated.capital, Some(bh.id));
}

#[test]
fn slug_survives_rename_but_follows_parent_change() {
    let Brasil { mut db, br, sp, mg } = brasil();
    let rj = db
        .create_region(RegionForm::new("Rio de Janeiro").in_nation(br.id.clone()).abbr("RJ"))
        .unwrap();
    let a = db.create_city(CityForm::new("Patópolis").in_region(sp.id)).unwrap();
    let b = db.create_city(CityForm::new("Patópolis").in_region(mg.id)).unwrap();

    let mut rename = CityForm::from(&a);
    rename.geo.name = "Patópolis Velha".into();
    let renamed = db.update_city(a.id, rename).unwrap();
    assert_eq!(renamed.geo.slug, "patopolis");

    let moved = db.update_city(b.id, CityForm::from(&b).in_region(rj.id)).unwrap();
    assert_eq!(moved.geo.slug, "patopolis-rj");
    assert_eq!(moved.region_abbr.as_deref(), Some("RJ"));
}

#[test]
fn move_reslugs_from_the_abbr_the_slug_was_built_with() {
    let Brasil { mut db, br, sp, mg } = brasil();
    let rj = db
        .create_region(RegionForm::new("Rio de Janeiro").in_nation(br.id.clone()).abbr("RJ"))
        .unwrap();
    db.create_city(CityForm::new("Patópolis").in_region(sp.id)).unwrap();
    let b = db.create_city(CityForm::new("Patópolis").in_region(mg.id)).unwrap();
    assert_eq!(b.geo.slug, "patopolis-mg");

    db.update_region(mg.id, RegionForm::from(&mg).abbr("MN")).unwrap();

    // staying put keeps the slug even though the region abbr changed
    let mut rename = CityForm::from(&b);
    rename.geo.population = Some(12_000);
    let kept = db.update_city(b.id, rename).unwrap();
    assert_eq!(kept.geo.slug, "patopolis-mg");

    let moved = db.update_city(b.id, CityForm::from(&kept).in_region(rj.id)).unwrap();
    assert_eq!(moved.geo.slug, "patopolis-rj");
}

#[test]
fn region_abbr_cache_is_not_invalidated() {
    let Brasil { mut db, sp, mg, .. } = brasil();
    let city = db.create_city(CityForm::new("Patópolis").in_region(mg.id)).unwrap();
    assert_eq!(city.region_abbr.as_deref(), Some("MG"));

    db.update_region(mg.id, RegionForm::from(&mg).abbr("MN")).unwrap();

    // stale until the city's region reference changes
    let cached = db.city(city.id).unwrap().clone();
    assert_eq!(db.region_abbr(&cached).as_deref(), Some("MG"));
    assert_eq!(db.qualified_name(&cached, ", "), "Patópolis, MG");

    let fresh = db.create_city(CityForm::new("Uberaba").in_region(mg.id)).unwrap();
    assert_eq!(fresh.region_abbr.as_deref(), Some("MN"));

    let moved = db.update_city(city.id, CityForm::from(&cached).in_region(sp.id)).unwrap();
    assert_eq!(moved.region_abbr.as_deref(), Some("SP"));
    assert_eq!(db.fully_qualified_name(&moved, "/"), "Patópolis/SP/BR");
}

#[test]
fn city_without_region_has_bare_qualified_name() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("Monaco", "MC")).unwrap();
    let city = db.create_city(CityForm::new("Monaco").in_nation("MC")).unwrap();

    assert_eq!(db.qualified_name(&city, ", "), "Monaco");
    assert_eq!(db.parent_abbr(&city).as_deref(), Some("MC"));
}

#[test]
fn prefix_and_exact_search() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("United States", "US")).unwrap();
    db.create_nation(NationForm::new("United Kingdom", "GB")).unwrap();
    db.create_nation(NationForm::new("Uruguay", "UY")).unwrap();

    let slugs: Vec<&str> = db
        .search::<Nation>("United", false)
        .iter()
        .map(|n| n.geo.slug.as_str())
        .collect();
    assert_eq!(slugs, ["united-kingdom", "united-states"]);
    assert_eq!(db.search::<Nation>("united-states", true).len(), 1);
    assert!(db.search::<Nation>("united", true).is_empty());
    assert!(db.search::<Nation>("-- ", false).is_empty());
}

#[test]
fn nearby_orders_by_distance_then_slug() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("Brasil", "BR")).unwrap();
    let at = |lon, lat| Point::new(lon, lat).unwrap();
    db.create_city(CityForm::new("Far").in_nation("BR").at(at(-43.2, -22.9))).unwrap();
    db.create_city(CityForm::new("Here").in_nation("BR").at(at(-46.63, -23.55))).unwrap();
    db.create_city(CityForm::new("Near").in_nation("BR").at(at(-46.5, -23.5))).unwrap();
    db.create_city(CityForm::new("Nowhere").in_nation("BR")).unwrap();

    let origin = at(-46.63, -23.55);
    let names: Vec<&str> = db.nearby(&origin, None).iter().map(|c| c.name()).collect();
    assert_eq!(names, ["Here", "Near", "Far"]);
    assert_eq!(db.nearby(&origin, Some(2)).len(), 2);

    let with_km = db.nearby_with_distance(&origin, None);
    assert!(with_km[0].1 < 1e-6);
    assert!(with_km.windows(2).all(|w| w[0].1 <= w[1].1));
    // São Paulo to Rio is roughly 360 km
    assert!((with_km[2].1 - 360.0).abs() < 20.0);
}

#[test]
fn nearby_breaks_ties_by_slug() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("Nowhere", "NW")).unwrap();
    let p = Point::new(10.0, 10.0).unwrap();
    db.create_city(CityForm::new("Beta").in_nation("NW").at(p)).unwrap();
    db.create_city(CityForm::new("Alpha").in_nation("NW").at(p)).unwrap();

    let probe = Point::new(10.0, 10.5).unwrap();
    let slugs: Vec<&str> = db.nearby(&probe, None).iter().map(|c| c.geo_slug()).collect();
    assert_eq!(slugs, ["alpha", "beta"]);
    assert_eq!(db.nearby(&probe, Some(1))[0].geo.slug, "alpha");
}

#[test]
fn invalid_coordinates_fail_before_any_write() {
    let mut db = GeoDb::new();
    db.create_nation(NationForm::new("Brasil", "BR")).unwrap();
    let bad = Point { lon: 200.0, lat: 0.0 };

    let err = db
        .create_city(CityForm::new("Atlantis").in_nation("BR").at(bad))
        .unwrap_err();
    assert!(matches!(err, GeoError::InvalidGeometry(_)));
    assert_eq!(db.stats().cities, 0);
}

#[test]
fn deleting_a_nation_cascades_down_the_hierarchy() {
    let Brasil { mut db, br, sp, mg } = brasil();
    let bh = db.create_city(CityForm::new("Belo Horizonte").in_region(mg.id)).unwrap();
    let loose = db.create_city(CityForm::new("Brasília").in_nation("BR")).unwrap();
    let savassi = db.create_hood(HoodForm::new("Savassi").in_city(bh.id)).unwrap();

    db.create_nation(NationForm::new("Argentina", "AR")).unwrap();
    let rosario = db
        .create_city(CityForm::new("Rosario").in_nation("AR").at(Point::new(-60.6, -32.9).unwrap()))
        .unwrap();

    let removed = db.delete_nation(&br.id).unwrap();
    assert_eq!(removed.id, br.id);

    for err in [
        db.nation(&br.id).map(|_| ()).unwrap_err(),
        db.region(sp.id).map(|_| ()).unwrap_err(),
        db.region(mg.id).map(|_| ()).unwrap_err(),
        db.city(bh.id).map(|_| ()).unwrap_err(),
        db.city(loose.id).map(|_| ()).unwrap_err(),
        db.hood(savassi.id).map(|_| ()).unwrap_err(),
    ] {
        assert!(matches!(err, GeoError::NotFound { .. }), "{err:?}");
    }
    assert!(db.city(rosario.id).is_ok());
    assert_eq!(db.stats().regions, 0);
}

#[test]
fn deleting_unknown_entity_is_not_found() {
    let mut db = GeoDb::new();
    let err = db.delete_nation(&NationId::new("XX")).unwrap_err();
    assert!(matches!(
        err,
        GeoError::NotFound { kind: EntityKind::Nation, ref key } if key == "XX"
    ));
}

#[test]
fn smart_search_ranks_abbr_exact_prefix_phone() {
    let Brasil { mut db, mg, .. } = brasil();
    let bh = db.create_city(CityForm::new("Brasilândia").in_region(mg.id)).unwrap();
    db.create_hood(HoodForm::new("Centro").in_city(bh.id)).unwrap();

    let hits = db.smart_search("br");
    assert!(hits[0].is_nation_abbr("BR"));

    let hits = db.smart_search("brasil");
    let slugs: Vec<&str> = hits.iter().map(|h| h.item.slug()).collect();
    assert_eq!(slugs, ["brasil", "brasilandia", "brasilandia-centro"]);
    assert!(hits[1].is_city_named("brasilandia"));

    let hits = db.smart_search("+55");
    assert_eq!(hits.len(), 1);
    assert!(hits[0].is_nation_abbr("br"));
}

#[test]
fn localized_names_fall_back_to_default() {
    let mut db = GeoDb::new();
    let de = db
        .create_nation(NationForm::new("Germany", "DE").translation("de", "deutschland"))
        .unwrap();
    assert_eq!(de.name_in("de"), "Deutschland");
    assert_eq!(de.name_in("fr"), "Germany");

    assert!(de.is_named("GERMANY"));
    assert!(de.is_named("deutschland"));
    assert!(!de.is_named("Allemagne"));
}
