//! geopolitical-cli — command-line interface for geopolitical-core
//!
//! Builds and queries a snapshot of the Nation → Region → City → Hood
//! hierarchy. Every mutation runs through the engine's validated write
//! pipeline and saves the snapshot afterwards.
//!
//! Usage examples
//! --------------
//!
//! - Create a small hierarchy
//!   $ geopolitical add-nation Brasil BR --phone 55
//!   $ geopolitical add-region BR "Minas Gerais" --abbr MG
//!   $ geopolitical add-city Patópolis --region minas-gerais --at=-43.9,-19.9
//!
//! - Query it
//!   $ geopolitical search city pato
//!   $ geopolitical lookup +55
//!   $ geopolitical nearby -- -43.9 -19.9 --limit 5
//!   $ geopolitical --json show city patopolis
//!
//! The snapshot defaults to `geopolitical.bin` in the core crate's data
//! directory; point elsewhere with `--store` or `GEOPOLITICAL_STORE`.
mod args;

use crate::args::{CliArgs, Commands};
use anyhow::{bail, Context};
use clap::Parser;
use geopolitical_core::prelude::*;
use geopolitical_core::{
    City, DefaultGeoDb, Document, EntityKind, Hood, Nation, Region, Zone,
};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<GeoError>().and_then(GeoError::validation) {
                Some(errors) => {
                    eprintln!("validation failed:");
                    for (field, messages) in errors.by_field() {
                        for message in messages {
                            eprintln!("  {field}: {message}");
                        }
                    }
                }
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: CliArgs) -> anyhow::Result<()> {
    let path = args.store.unwrap_or_else(|| {
        DefaultGeoDb::default_data_dir().join(DefaultGeoDb::default_dataset_filename())
    });
    tracing::debug!(path = %path.display(), "using snapshot");
    let mut db = DefaultGeoDb::load_or_default(&path)
        .with_context(|| format!("loading snapshot {}", path.display()))?;
    let out = Output { json: args.json };

    match args.command {
        Commands::Stats => {
            let stats = db.stats();
            if out.json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Database statistics:");
                println!("  Nations: {}", stats.nations);
                println!("  Regions: {}", stats.regions);
                println!("  Cities:  {}", stats.cities);
                println!("  Hoods:   {}", stats.hoods);
                println!("  Zones:   {} ({} members)", stats.zones, stats.members);
            }
        }

        Commands::Nations => {
            let nations = db.ordered::<Nation>();
            out.list(&nations, |n| {
                format!(
                    "{:<4} {}{}",
                    n.id,
                    n.geo.name,
                    n.geo.phone.as_deref().map(|p| format!(" (+{p})")).unwrap_or_default()
                )
            })?;
        }

        Commands::Regions { nation } => {
            let nation = db.find::<Nation>(&nation)?.id.clone();
            let regions = db.regions_of(&nation);
            out.list(&regions, |r| {
                format!("{:<6} {}", r.geo.abbr.as_deref().unwrap_or("-"), r.geo.name)
            })?;
        }

        Commands::Cities { by_population } => {
            let cities = if by_population {
                db.population_ordered()
            } else {
                db.ordered::<City>()
            };
            out.list(&cities, |c| {
                let population = c.geo.population.map(|p| p.to_string()).unwrap_or_default();
                format!("{:<40} {population:>10}", db.fully_qualified_name(c, ", "))
            })?;
        }

        Commands::Search { kind, query, exact } => match kind {
            EntityKind::Nation => out.list(&db.search::<Nation>(&query, exact), slug_line::<Nation>)?,
            EntityKind::Region => out.list(&db.search::<Region>(&query, exact), slug_line::<Region>)?,
            EntityKind::City => out.list(&db.search::<City>(&query, exact), slug_line::<City>)?,
            EntityKind::Hood => out.list(&db.search::<Hood>(&query, exact), slug_line::<Hood>)?,
            EntityKind::Zone => out.list(&db.search::<Zone>(&query, exact), |z| {
                format!("{:<30} {}", z.slug, z.name)
            })?,
            EntityKind::Member => bail!("members have no slug to search"),
        },

        Commands::Lookup { query } => {
            let hits = db.smart_search(&query);
            if out.json {
                let rows: Vec<_> = hits
                    .iter()
                    .map(|h| {
                        serde_json::json!({
                            "score": h.score,
                            "kind": h.item.kind(),
                            "slug": h.item.slug(),
                            "name": h.item.name(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if hits.is_empty() {
                println!("No match for: {query}");
            } else {
                for h in hits {
                    println!("{:>4} {:<7} {:<30} {}", h.score, h.item.kind(), h.item.slug(), h.item.name());
                }
            }
        }

        Commands::Nearby { lon, lat, limit } => {
            let origin = Point::new(lon, lat)?;
            let hits = db.nearby_with_distance(&origin, Some(limit));
            if out.json {
                let rows: Vec<_> = hits
                    .iter()
                    .map(|(c, km)| serde_json::json!({ "city": c, "distance_km": km }))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for (city, km) in hits {
                    println!("{km:>9.1} km  {}", db.qualified_name(city, ", "));
                }
            }
        }

        Commands::Show { kind, key } => match kind {
            EntityKind::Nation => out.show(&db, db.find::<Nation>(&key)?)?,
            EntityKind::Region => out.show(&db, db.find::<Region>(&key)?)?,
            EntityKind::City => {
                let city = db.find::<City>(&key)?;
                out.show(&db, city)?;
                if !out.json {
                    println!("qualified:  {}", db.fully_qualified_name(city, ", "));
                }
            }
            EntityKind::Hood => out.show(&db, db.find::<Hood>(&key)?)?,
            EntityKind::Zone => {
                let zone = db.find::<Zone>(&key)?;
                let members = db.members_of(zone.id);
                if out.json {
                    let value = serde_json::json!({ "zone": zone, "members": members });
                    println!("{}", serde_json::to_string_pretty(&value)?);
                } else {
                    println!("{} ({})", zone.name, zone.slug);
                    for m in members {
                        println!("  - {}", m.member);
                    }
                }
            }
            EntityKind::Member => bail!("show the zone instead"),
        },

        Commands::AddNation {
            name,
            abbr,
            code3,
            tld,
            currency,
            languages,
            geo,
        } => {
            let mut form = geo.apply(NationForm::new(name, abbr)).languages(languages);
            if let Some(code3) = code3 {
                form = form.code3(code3);
            }
            if let Some(tld) = tld {
                form = form.tld(tld);
            }
            if let Some(currency) = currency {
                form = form.currency(currency);
            }
            let nation = db.create_nation(form)?;
            save(&db, &path)?;
            out.created(&nation, &nation.geo.slug)?;
        }

        Commands::AddRegion {
            nation,
            name,
            abbr,
            timezone,
            geo,
        } => {
            let nation = db.find::<Nation>(&nation)?.id.clone();
            let mut form = geo.apply(RegionForm::new(name).in_nation(nation));
            if let Some(abbr) = abbr {
                form = form.abbr(abbr);
            }
            if let Some(timezone) = timezone {
                form = form.timezone(timezone);
            }
            let region = db.create_region(form)?;
            save(&db, &path)?;
            out.created(&region, &region.geo.slug)?;
        }

        Commands::AddCity {
            name,
            nation,
            region,
            abbr,
            area,
            at,
            geo,
        } => {
            let mut form = geo.apply(CityForm::new(name));
            if let Some(nation) = nation {
                form = form.in_nation(db.find::<Nation>(&nation)?.id.clone());
            }
            if let Some(region) = region {
                form = form.in_region(db.find::<Region>(&region)?.id);
            }
            if let Some(abbr) = abbr {
                form = form.abbr(abbr);
            }
            if let Some(area) = area {
                form = form.area(area);
            }
            if let Some(point) = at {
                form = form.at(point);
            }
            let city = db.create_city(form)?;
            save(&db, &path)?;
            out.created(&city, &city.geo.slug)?;
        }

        Commands::AddHood {
            city,
            name,
            rank,
            geo,
        } => {
            let city = db.find::<City>(&city)?.id;
            let mut form = geo.apply(HoodForm::new(name).in_city(city));
            if let Some(rank) = rank {
                form = form.rank(rank);
            }
            let hood = db.create_hood(form)?;
            save(&db, &path)?;
            out.created(&hood, &hood.geo.slug)?;
        }

        Commands::Delete { kind, key } => {
            let slug = match kind {
                EntityKind::Nation => {
                    let id = db.find::<Nation>(&key)?.id.clone();
                    db.delete_nation(&id)?.geo.slug
                }
                EntityKind::Region => {
                    let id = db.find::<Region>(&key)?.id;
                    db.delete_region(id)?.geo.slug
                }
                EntityKind::City => {
                    let id = db.find::<City>(&key)?.id;
                    db.delete_city(id)?.geo.slug
                }
                EntityKind::Hood => {
                    let id = db.find::<Hood>(&key)?.id;
                    db.delete_hood(id)?.geo.slug
                }
                EntityKind::Zone => {
                    let id = db.find::<Zone>(&key)?.id;
                    db.delete_zone(id)?.slug
                }
                EntityKind::Member => bail!("members are removed with their zone"),
            };
            save(&db, &path)?;
            println!("deleted {kind} {slug}");
        }
    }

    Ok(())
}

fn save(db: &DefaultGeoDb, path: &Path) -> anyhow::Result<()> {
    db.save_to_path(path)
        .with_context(|| format!("saving snapshot {}", path.display()))
}

fn slug_line<E: Geopolitical>(e: &E) -> String {
    format!("{:<30} {}", e.geo_slug(), e.name())
}

struct Output {
    json: bool,
}

impl Output {
    fn list<D: Document>(&self, items: &[&D], line: impl Fn(&D) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(items)?);
        } else if items.is_empty() {
            println!("(none)");
        } else {
            for item in items {
                println!("{}", line(item));
            }
        }
        Ok(())
    }

    fn show<E: Geopolitical>(&self, db: &DefaultGeoDb, e: &E) -> anyhow::Result<()> {
        let phone = db.effective_phone(e);
        let postal = db.effective_postal(e);
        if self.json {
            let value = serde_json::json!({
                "entity": e,
                "effective_phone": phone,
                "effective_postal": postal,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }
        println!("{} {} ({})", E::KIND, e.display_name(), e.geo_slug());
        if let Some(abbr) = e.abbr() {
            println!("abbr:       {abbr}");
        }
        if let Some(population) = e.population() {
            println!("population: {population}");
        }
        let inherited = |own: Option<&String>, value: Option<String>| match (own, value) {
            (Some(_), Some(v)) => v,
            (None, Some(v)) => format!("{v} (inherited)"),
            (_, None) => "-".to_string(),
        };
        println!("phone:      {}", inherited(e.geo().phone.as_ref(), phone));
        println!("postal:     {}", inherited(e.geo().postal.as_ref(), postal));
        Ok(())
    }

    fn created<D: Document>(&self, doc: &D, slug: &str) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(doc)?);
        } else {
            println!("created {} {slug}", D::KIND);
        }
        Ok(())
    }
}
