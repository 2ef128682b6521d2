// crates/geopolitical-core/src/db/zones.rs
use super::write::{backstop, checked, slug_outcome};
use super::{by_name, GeoDb};
use crate::common::{EntityKind, EntityRef, MemberId, ZoneId};
use crate::error::{GeoError, Result, ValidationError, ValidationErrors};
use crate::model::attrs::non_blank;
use crate::model::{GeoEntity, Member, Zone, ZoneForm};
use crate::slug::{encode, resolve_slug};
use crate::store::GeoStore;
use crate::text::normalize_name;
use tracing::info;

impl<S: GeoStore> GeoDb<S> {
    pub fn create_zone(&mut self, form: ZoneForm) -> Result<Zone> {
        let id = ZoneId(self.col_mut::<Zone>().next_id());
        self.save_zone(id, None, form)
    }

    pub fn update_zone(&mut self, id: ZoneId, form: ZoneForm) -> Result<Zone> {
        let current = self.zone(id)?.clone();
        self.save_zone(id, Some(current), form)
    }

    fn save_zone(&mut self, id: ZoneId, current: Option<Zone>, form: ZoneForm) -> Result<Zone> {
        let mut errors = ValidationErrors::new();
        let name = normalize_name(&form.name);
        if name.is_empty() {
            errors.push(ValidationError::MissingRequiredField { field: "name" });
        }
        let requested = non_blank(form.slug);

        // Zones have no parent, so there is nothing to disambiguate with.
        let slug = match (&current, requested) {
            (Some(c), Some(r)) if encode(&r) == c.slug => c.slug.clone(),
            (Some(c), None) => c.slug.clone(),
            (_, requested) => {
                let base = requested.unwrap_or_else(|| name.clone());
                let taken = |s: &str| self.slug_taken::<Zone>(s, Some(&id));
                slug_outcome(resolve_slug(&base, taken, None), &mut errors)
            }
        };
        checked(EntityKind::Zone, errors)?;

        let zone = Zone {
            id,
            name,
            slug,
            abbr: non_blank(form.abbr),
            kind: non_blank(form.kind),
            info: non_blank(form.info),
            active: form.active,
        };
        let zone = if current.is_some() {
            self.col_mut::<Zone>().replace(zone)
        } else {
            self.col_mut::<Zone>().insert(zone)
        }
        .map_err(backstop)?;
        info!(id = %zone.id, slug = %zone.slug, "zone saved");
        Ok(zone)
    }

    /// Deletes a zone and all of its memberships. The member entities
    /// themselves are untouched.
    pub fn delete_zone(&mut self, id: ZoneId) -> Result<Zone> {
        self.zone(id)?;
        let members: Vec<MemberId> = self.members_of(id).iter().map(|m| m.id).collect();
        for (done, member) in members.iter().enumerate() {
            if let Err(source) = self.col_mut::<Member>().remove(member) {
                return Err(GeoError::CascadeIncomplete {
                    parent: format!("{}:{id}", EntityKind::Zone),
                    remaining: members[done..]
                        .iter()
                        .map(|m| format!("{}:{m}", EntityKind::Member))
                        .collect(),
                    source: Box::new(source),
                });
            }
        }
        let zone = self.col_mut::<Zone>().remove(&id)?;
        info!(id = %zone.id, slug = %zone.slug, members = members.len(), "zone deleted");
        Ok(zone)
    }

    pub fn active_zones(&self) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self
            .col::<Zone>()
            .all()
            .into_iter()
            .filter(|z| z.active)
            .collect();
        zones.sort_by(|a, b| by_name(*a, *b));
        zones
    }

    // -----------------------------------------------------------------------
    // MEMBERSHIP
    // -----------------------------------------------------------------------

    /// Adds `entity` to `zone`. Both must exist and an entity joins a given
    /// zone at most once.
    pub fn add_member(&mut self, zone: ZoneId, entity: EntityRef) -> Result<Member> {
        self.zone(zone)?;
        self.resolve(&entity)?;
        let already = self
            .members_of(zone)
            .iter()
            .any(|m| m.member == entity);
        if already {
            return Err(ValidationError::ScopedUniquenessViolation {
                field: "member",
                scope: "zone",
            }
            .into());
        }
        let member = Member {
            id: MemberId(self.col_mut::<Member>().next_id()),
            zone,
            member: entity,
        };
        let member = self.col_mut::<Member>().insert(member).map_err(backstop)?;
        info!(zone = %zone, member = %member.member, "member added");
        Ok(member)
    }

    pub fn remove_member(&mut self, id: MemberId) -> Result<Member> {
        let member = self.col_mut::<Member>().remove(&id)?;
        info!(zone = %member.zone, member = %member.member, "member removed");
        Ok(member)
    }

    pub fn members_of(&self, zone: ZoneId) -> Vec<&Member> {
        self.col::<Member>()
            .all()
            .into_iter()
            .filter(|m| m.zone == zone)
            .collect()
    }

    /// Zones the entity belongs to, sorted by name.
    pub fn zones_for(&self, entity: &EntityRef) -> Vec<&Zone> {
        let mut zones: Vec<&Zone> = self
            .col::<Member>()
            .all()
            .into_iter()
            .filter(|m| m.member == *entity)
            .filter_map(|m| self.get::<Zone>(&m.zone))
            .collect();
        zones.sort_by(|a, b| by_name(*a, *b));
        zones.dedup_by_key(|z| z.id);
        zones
    }

    /// The entity a membership points at. Fails with `NotFound` once the
    /// entity has been deleted.
    pub fn resolve_member(&self, member: &Member) -> Result<GeoEntity> {
        self.resolve(&member.member)
    }
}
