use clap::{ArgAction, Args, Parser, Subcommand};
use geopolitical_core::{EntityKind, GeoForm, Point};
use std::path::PathBuf;

/// CLI arguments for geopolitical-cli
#[derive(Debug, Parser)]
#[command(
    name = "geopolitical",
    version,
    about = "CLI for building and querying a geopolitical-core snapshot"
)]
pub struct CliArgs {
    /// Snapshot file (`.bin`, or `.json` with the json feature)
    #[arg(short = 's', long = "store", env = "GEOPOLITICAL_STORE", global = true)]
    pub store: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (-v info, -vv debug); overrides RUST_LOG
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the database contents
    Stats,

    /// List all nations
    Nations,

    /// List the regions of a nation
    Regions {
        /// Nation abbreviation or slug (e.g. BR)
        nation: String,
    },

    /// List all cities
    Cities {
        /// Largest population first instead of by name
        #[arg(long)]
        by_population: bool,
    },

    /// Slug search within one collection
    Search {
        /// nation, region, city, hood or zone
        kind: EntityKind,
        query: String,
        /// Only slugs equal to the encoded query
        #[arg(long)]
        exact: bool,
    },

    /// Ranked search across nations, regions, cities and hoods
    Lookup { query: String },

    /// Cities nearest to a point
    Nearby {
        #[arg(allow_negative_numbers = true)]
        lon: f64,
        #[arg(allow_negative_numbers = true)]
        lat: f64,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },

    /// Show one entity with its inherited attributes
    Show {
        kind: EntityKind,
        /// Slug or id
        key: String,
    },

    /// Create a nation
    AddNation {
        name: String,
        abbr: String,
        #[arg(long)]
        code3: Option<String>,
        #[arg(long)]
        tld: Option<String>,
        #[arg(long)]
        currency: Option<String>,
        /// Repeat for several; the first is the primary language
        #[arg(long = "language")]
        languages: Vec<String>,
        #[command(flatten)]
        geo: GeoFlags,
    },

    /// Create a region
    AddRegion {
        /// Nation abbreviation or slug
        nation: String,
        name: String,
        #[arg(long)]
        abbr: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
        #[command(flatten)]
        geo: GeoFlags,
    },

    /// Create a city
    AddCity {
        name: String,
        /// Nation abbreviation or slug; taken from the region when omitted
        #[arg(long)]
        nation: Option<String>,
        /// Region slug or id
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        abbr: Option<String>,
        /// Area in square kilometres
        #[arg(long)]
        area: Option<u64>,
        /// Location as "lon,lat"
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Option<Point>,
        #[command(flatten)]
        geo: GeoFlags,
    },

    /// Create a hood
    AddHood {
        /// City slug or id
        city: String,
        name: String,
        #[arg(long)]
        rank: Option<u32>,
        #[command(flatten)]
        geo: GeoFlags,
    },

    /// Delete an entity and everything it owns
    Delete { kind: EntityKind, key: String },
}

/// Attributes shared by every geopolitical entity.
#[derive(Debug, Args)]
pub struct GeoFlags {
    /// Explicit slug instead of one derived from the name
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub postal: Option<String>,
    #[arg(long)]
    pub code: Option<String>,
    #[arg(long)]
    pub population: Option<u64>,
}

impl GeoFlags {
    pub fn apply<F: GeoForm>(self, mut form: F) -> F {
        if let Some(slug) = self.slug {
            form = form.slug(slug);
        }
        if let Some(phone) = self.phone {
            form = form.phone(phone);
        }
        if let Some(postal) = self.postal {
            form = form.postal(postal);
        }
        if let Some(code) = self.code {
            form = form.code(code);
        }
        if let Some(population) = self.population {
            form = form.population(population);
        }
        form
    }
}

fn parse_point(s: &str) -> Result<Point, String> {
    Point::parse(s).map_err(|e| e.to_string())
}
