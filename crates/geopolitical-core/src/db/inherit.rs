// crates/geopolitical-core/src/db/inherit.rs
use super::GeoDb;
use crate::common::EntityRef;
use crate::model::GeoAttrs;
use crate::store::GeoStore;
use crate::traits::Geopolitical;

/// Fields whose empty value falls back to the parent's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inherited {
    Phone,
    Postal,
}

impl Inherited {
    fn own(self, geo: &GeoAttrs) -> Option<&str> {
        let value = match self {
            Inherited::Phone => geo.phone.as_deref(),
            Inherited::Postal => geo.postal.as_deref(),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl<S: GeoStore> GeoDb<S> {
    /// Effective value of `field` for `entity`: its own value when set,
    /// otherwise the first non-empty value walking Hood → City → Region →
    /// Nation. A missing ancestor ends the walk with `None`.
    ///
    /// Works on entities that are not stored yet; nothing is written back.
    pub fn effective<E: Geopolitical>(&self, entity: &E, field: Inherited) -> Option<String> {
        if let Some(v) = field.own(entity.geo()) {
            return Some(v.to_string());
        }
        let mut next = entity.parent();
        while let Some(r) = next {
            let (geo, parent) = self.lookup_ref(&r)?;
            if let Some(v) = field.own(geo) {
                return Some(v.to_string());
            }
            next = parent;
        }
        None
    }

    pub fn effective_phone<E: Geopolitical>(&self, entity: &E) -> Option<String> {
        self.effective(entity, Inherited::Phone)
    }

    pub fn effective_postal<E: Geopolitical>(&self, entity: &E) -> Option<String> {
        self.effective(entity, Inherited::Postal)
    }

    fn lookup_ref(&self, r: &EntityRef) -> Option<(&GeoAttrs, Option<EntityRef>)> {
        match r {
            EntityRef::Nation(id) => self.nation(id).ok().map(|n| (n.geo(), n.parent())),
            EntityRef::Region(id) => self.region(*id).ok().map(|e| (e.geo(), e.parent())),
            EntityRef::City(id) => self.city(*id).ok().map(|e| (e.geo(), e.parent())),
            EntityRef::Hood(id) => self.hood(*id).ok().map(|e| (e.geo(), e.parent())),
        }
    }
}
