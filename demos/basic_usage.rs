//! Basic usage example for geopolitical-rs
//!
//! This example demonstrates how to:
//! - Build a small hierarchy through the validated write pipeline
//! - Read inherited phone codes and qualified names
//! - Search by slug prefix and run nearest-city queries
//! - Inspect validation failures field by field

use geopolitical_rs::prelude::*;
use geopolitical_rs::{City, ValidationErrors};

fn main() -> Result<()> {
    println!("=== geopolitical-rs Basic Usage Example ===\n");

    let mut db = GeoDb::new();

    // Example 1: Build a hierarchy
    println!("--- Example 1: Build a hierarchy ---");
    let br = db.create_nation(NationForm::new("Brasil", "br").phone("+55").code3("BRA"))?;
    let sp = db.create_region(RegionForm::new("são paulo").in_nation(br.id.clone()).abbr("SP"))?;
    let mg = db.create_region(RegionForm::new("Minas Gerais").in_nation(br.id.clone()).abbr("MG"))?;
    let a = db.create_city(
        CityForm::new("Patópolis")
            .in_region(sp.id)
            .at(Point::new(-46.63, -23.55)?),
    )?;
    let b = db.create_city(
        CityForm::new("Patópolis")
            .in_region(mg.id)
            .at(Point::new(-43.94, -19.92)?),
    )?;
    let hood = db.create_hood(HoodForm::new("Jd. Italia").in_city(a.id))?;
    println!("Nation {} ({}), regions {} and {}", br.name(), br.id, sp.name(), mg.name());
    println!("Cities: {} and {}", a.geo.slug, b.geo.slug);
    println!("Hood:   {}\n", hood.geo.slug);

    // Example 2: Inheritance and display helpers
    println!("--- Example 2: Inherited attributes ---");
    println!(
        "Phone of {}: {}",
        hood.name(),
        db.effective_phone(&hood).unwrap_or_default()
    );
    println!("Qualified: {}", db.fully_qualified_name(&b, ", "));
    println!();

    // Example 3: Search
    println!("--- Example 3: Prefix search ---");
    for city in db.search::<City>("pato", false) {
        println!("- {}", db.qualified_name(city, "/"));
    }
    for hit in db.smart_search("+55") {
        println!("smart hit {} (score {})", hit.item.name(), hit.score);
    }
    println!();

    // Example 4: Nearby
    println!("--- Example 4: Nearby ---");
    let origin = Point::parse("-46.6,-23.5")?;
    for (city, km) in db.nearby_with_distance(&origin, None) {
        println!("{:>8.1} km  {}", km, city.geo.slug);
    }
    println!();

    // Example 5: Validation errors
    println!("--- Example 5: Validation errors ---");
    let err = db
        .create_city(CityForm::new("Rosario").in_nation("AR").in_region(mg.id))
        .unwrap_err();
    if let Some(errors) = err.validation() {
        print_errors(errors);
    }

    println!("\nStats: {:?}", db.stats());
    Ok(())
}

fn print_errors(errors: &ValidationErrors) {
    for (field, messages) in errors.by_field() {
        for message in messages {
            println!("  {field}: {message}");
        }
    }
}
