// crates/geopolitical-core/src/common.rs
//! Identifiers and small value types shared by every collection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple aggregate statistics for the database.
///
/// Returned by [`GeoDb::stats`](crate::GeoDb::stats); counts reflect the
/// store as it is right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub nations: usize,
    pub regions: usize,
    pub cities: usize,
    pub hoods: usize,
    pub zones: usize,
    pub members: usize,
}

macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(v: u32) -> Self {
                Self(v)
            }
        }
    };
}

surrogate_id!(
    /// Store-assigned key of a [`Region`](crate::Region).
    RegionId
);
surrogate_id!(
    /// Store-assigned key of a [`City`](crate::City).
    CityId
);
surrogate_id!(
    /// Store-assigned key of a [`Hood`](crate::Hood).
    HoodId
);
surrogate_id!(ZoneId);
surrogate_id!(MemberId);

/// A nation's primary key: its upper-cased abbreviation (e.g. `"BR"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NationId(String);

impl NationId {
    /// Builds the key from any casing of the abbreviation.
    pub fn new(abbr: &str) -> Self {
        Self(abbr.trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NationId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Every collection the engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Nation,
    Region,
    City,
    Hood,
    Zone,
    Member,
}

impl EntityKind {
    /// Depth in the geopolitical hierarchy (Nation = 0 .. Hood = 3).
    /// Zones and members sit outside the hierarchy.
    pub fn depth(self) -> Option<u8> {
        match self {
            EntityKind::Nation => Some(0),
            EntityKind::Region => Some(1),
            EntityKind::City => Some(2),
            EntityKind::Hood => Some(3),
            EntityKind::Zone | EntityKind::Member => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Nation => "nation",
            EntityKind::Region => "region",
            EntityKind::City => "city",
            EntityKind::Hood => "hood",
            EntityKind::Zone => "zone",
            EntityKind::Member => "member",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nation" | "nations" | "country" => Ok(EntityKind::Nation),
            "region" | "regions" | "state" | "province" => Ok(EntityKind::Region),
            "city" | "cities" => Ok(EntityKind::City),
            "hood" | "hoods" | "neighborhood" => Ok(EntityKind::Hood),
            "zone" | "zones" => Ok(EntityKind::Zone),
            "member" | "members" => Ok(EntityKind::Member),
            other => Err(format!("unknown entity kind: {other}")),
        }
    }
}

/// Typed reference to any geopolitical entity.
///
/// Used for parent walks and for zone memberships, so that resolving a
/// reference is an exhaustive match instead of a dynamic lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityRef {
    Nation(NationId),
    Region(RegionId),
    City(CityId),
    Hood(HoodId),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Nation(_) => EntityKind::Nation,
            EntityRef::Region(_) => EntityKind::Region,
            EntityRef::City(_) => EntityKind::City,
            EntityRef::Hood(_) => EntityKind::Hood,
        }
    }

    /// The id rendered as text (used in error keys).
    pub fn key(&self) -> String {
        match self {
            EntityRef::Nation(id) => id.to_string(),
            EntityRef::Region(id) => id.to_string(),
            EntityRef::City(id) => id.to_string(),
            EntityRef::Hood(id) => id.to_string(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nation_id_is_uppercased() {
        assert_eq!(NationId::new(" br ").as_str(), "BR");
        assert_eq!(NationId::from("us"), NationId::new("US"));
    }

    #[test]
    fn depth_follows_hierarchy() {
        assert_eq!(EntityKind::Nation.depth(), Some(0));
        assert_eq!(EntityKind::Hood.depth(), Some(3));
        assert_eq!(EntityKind::Zone.depth(), None);
    }

    #[test]
    fn kind_parses_aliases() {
        assert_eq!("Country".parse::<EntityKind>(), Ok(EntityKind::Nation));
        assert_eq!("cities".parse::<EntityKind>(), Ok(EntityKind::City));
        assert!("planet".parse::<EntityKind>().is_err());
    }
}
