// crates/geopolitical-core/src/lib.rs

//! Consistency engine for a Nation → Region → City → Hood hierarchy with
//! free-form zones.
//!
//! ```rust
//! use geopolitical_core::prelude::*;
//!
//! let mut db = GeoDb::new();
//! let br = db.create_nation(NationForm::new("Brasil", "br").phone("55"))?;
//! let mg = db.create_region(RegionForm::new("minas gerais").in_nation(br.id.clone()).abbr("MG"))?;
//! let city = db.create_city(CityForm::new("Patópolis").in_region(mg.id))?;
//!
//! assert_eq!(br.id.as_str(), "BR");
//! assert_eq!(city.geo.slug, "patopolis");
//! assert_eq!(db.effective_phone(&city).as_deref(), Some("55"));
//! # Ok::<(), geopolitical_core::GeoError>(())
//! ```

pub mod common;
pub mod db;
pub mod error;
pub mod geo;
pub mod loader;
pub mod model;
pub mod search;
pub mod slug;
pub mod store;
pub mod text;
pub mod traits;

pub use crate::common::{
    CityId, DbStats, EntityKind, EntityRef, HoodId, MemberId, NationId, RegionId, ZoneId,
};
pub use crate::db::{DefaultGeoDb, GeoDb, Inherited};
pub use crate::error::{GeoError, Result, ValidationError, ValidationErrors};
pub use crate::geo::{GeoIndex, Point};
pub use crate::loader::SnapshotFormat;
pub use crate::model::{
    City, CityForm, GeoAttrs, GeoEntity, GeoForm, Hood, HoodForm, Member, Nation, NationForm,
    Region, RegionForm, Zone, ZoneForm,
};
pub use crate::search::{SmartHit, SmartItem};
pub use crate::store::{Collection, GeoStore, MemoryStore, Store};
pub use crate::traits::{Document, Geopolitical};

pub mod prelude {
    pub use crate::{
        CityForm, EntityRef, GeoDb, GeoError, GeoForm, Geopolitical, HoodForm, Inherited,
        NationForm, Point, RegionForm, Result, ZoneForm,
    };
}
