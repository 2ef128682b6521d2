// crates/geopolitical-core/src/model/zone.rs
use crate::common::{EntityKind, EntityRef, MemberId, ZoneId};
use crate::traits::Document;
use serde::{Deserialize, Serialize};

/// A user-defined grouping of geopolitical entities.
///
/// Zones sit outside the hierarchy: nothing is inherited through them and
/// deleting a member's entity does not touch the zone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub name: String,
    pub slug: String,
    pub abbr: Option<String>,
    pub kind: Option<String>,
    pub info: Option<String>,
    pub active: bool,
}

impl Document for Zone {
    type Id = ZoneId;
    const KIND: EntityKind = EntityKind::Zone;

    fn id(&self) -> &ZoneId {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        Some(&self.slug)
    }

    fn sort_name(&self) -> &str {
        &self.name
    }
}

/// Join row between a zone and any geopolitical entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub zone: ZoneId,
    pub member: EntityRef,
}

impl Document for Member {
    type Id = MemberId;
    const KIND: EntityKind = EntityKind::Member;

    fn id(&self) -> &MemberId {
        &self.id
    }

    fn slug(&self) -> Option<&str> {
        None
    }

    fn sort_name(&self) -> &str {
        ""
    }
}

#[derive(Clone, Debug)]
pub struct ZoneForm {
    pub name: String,
    pub slug: Option<String>,
    pub abbr: Option<String>,
    pub kind: Option<String>,
    pub info: Option<String>,
    pub active: bool,
}

impl ZoneForm {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            abbr: None,
            kind: None,
            info: None,
            active: true,
        }
    }

    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    pub fn abbr(mut self, abbr: impl Into<String>) -> Self {
        self.abbr = Some(abbr.into());
        self
    }

    pub fn info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

impl From<&Zone> for ZoneForm {
    fn from(z: &Zone) -> Self {
        Self {
            name: z.name.clone(),
            slug: Some(z.slug.clone()),
            abbr: z.abbr.clone(),
            kind: z.kind.clone(),
            info: z.info.clone(),
            active: z.active,
        }
    }
}
