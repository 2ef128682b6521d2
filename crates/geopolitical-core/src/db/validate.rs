// crates/geopolitical-core/src/db/validate.rs
//! Write-time invariant checks. Every check pushes into the caller's
//! [`ValidationErrors`] instead of returning early.

use super::GeoDb;
use crate::common::EntityKind;
use crate::error::{ValidationError, ValidationErrors};
use crate::model::{City, GeoAttrs, Hood, Nation, Region};
use crate::store::GeoStore;
use crate::text::equals_folded;
use crate::traits::Geopolitical;

fn unique_within(field: &'static str, scope: &'static str) -> ValidationError {
    ValidationError::ScopedUniquenessViolation { field, scope }
}

fn same_code(a: &GeoAttrs, b: &GeoAttrs) -> bool {
    match (&a.code, &b.code) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

fn same_abbr(a: &GeoAttrs, b: &GeoAttrs) -> bool {
    match (&a.abbr, &b.abbr) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

impl<S: GeoStore> GeoDb<S> {
    fn check_name(&self, geo: &GeoAttrs, errors: &mut ValidationErrors) {
        if geo.name.trim().is_empty() {
            errors.push(ValidationError::MissingRequiredField { field: "name" });
        }
    }

    /// `creating` tells whether the nation's key must still be free.
    pub(super) fn validate_nation(&self, n: &Nation, creating: bool, errors: &mut ValidationErrors) {
        self.check_name(&n.geo, errors);
        if n.id.as_str().is_empty() {
            errors.push(ValidationError::MissingRequiredField { field: "abbr" });
        } else if creating && self.get::<Nation>(&n.id).is_some() {
            errors.push(unique_within("abbr", "collection"));
        }

        let code_taken = self
            .col::<Nation>()
            .all()
            .into_iter()
            .any(|o| o.id != n.id && same_code(&o.geo, &n.geo));
        if code_taken {
            errors.push(unique_within("code", "collection"));
        }

        if let Some(capital) = n.capital {
            match self.get::<City>(&capital) {
                None => errors.push(ValidationError::UnknownReference {
                    field: "capital",
                    kind: EntityKind::City,
                    key: capital.to_string(),
                }),
                Some(city) if city.nation != n.id => {
                    errors.push(ValidationError::HierarchyMismatch {
                        field: "capital",
                        detail: format!("city {} belongs to nation {}", city.geo.slug, city.nation),
                    })
                }
                Some(_) => {}
            }
        }
    }

    pub(super) fn validate_region(&self, r: &Region, errors: &mut ValidationErrors) {
        self.check_name(&r.geo, errors);
        if r.nation.as_str().is_empty() {
            errors.push(ValidationError::MissingRequiredField { field: "nation" });
        } else if self.get::<Nation>(&r.nation).is_none() {
            errors.push(ValidationError::UnknownReference {
                field: "nation",
                kind: EntityKind::Nation,
                key: r.nation.to_string(),
            });
        }

        let siblings: Vec<&Region> = self
            .regions_of(&r.nation)
            .into_iter()
            .filter(|o| o.id != r.id)
            .collect();
        if !r.geo.name.is_empty() && siblings.iter().any(|o| equals_folded(o.name(), r.name())) {
            errors.push(unique_within("name", "nation"));
        }
        if siblings.iter().any(|o| same_abbr(&o.geo, &r.geo)) {
            errors.push(unique_within("abbr", "nation"));
        }
        if siblings.iter().any(|o| same_code(&o.geo, &r.geo)) {
            errors.push(unique_within("code", "nation"));
        }

        if let Some(capital) = r.capital {
            match self.get::<City>(&capital) {
                None => errors.push(ValidationError::UnknownReference {
                    field: "capital",
                    kind: EntityKind::City,
                    key: capital.to_string(),
                }),
                Some(city) if city.region != Some(r.id) => {
                    errors.push(ValidationError::HierarchyMismatch {
                        field: "capital",
                        detail: format!("city {} is not in region {}", city.geo.slug, r.geo.slug),
                    })
                }
                Some(_) => {}
            }
        }
    }

    pub(super) fn validate_city(&self, c: &City, errors: &mut ValidationErrors) {
        self.check_name(&c.geo, errors);
        let nation_known = if c.nation.as_str().is_empty() {
            errors.push(ValidationError::MissingRequiredField { field: "nation" });
            false
        } else if self.get::<Nation>(&c.nation).is_none() {
            errors.push(ValidationError::UnknownReference {
                field: "nation",
                kind: EntityKind::Nation,
                key: c.nation.to_string(),
            });
            false
        } else {
            true
        };

        if let Some(region_id) = c.region {
            match self.get::<Region>(&region_id) {
                None => errors.push(ValidationError::UnknownReference {
                    field: "region",
                    kind: EntityKind::Region,
                    key: region_id.to_string(),
                }),
                Some(region) => {
                    if nation_known && region.nation != c.nation {
                        errors.push(ValidationError::HierarchyMismatch {
                            field: "region",
                            detail: format!(
                                "region {} belongs to nation {}, not {}",
                                region.geo.slug, region.nation, c.nation
                            ),
                        });
                    }
                    let siblings: Vec<&City> = self
                        .cities_of_region(region_id)
                        .into_iter()
                        .filter(|o| o.id != c.id)
                        .collect();
                    if !c.geo.name.is_empty()
                        && siblings.iter().any(|o| equals_folded(o.name(), c.name()))
                    {
                        errors.push(unique_within("name", "region"));
                    }
                    if siblings.iter().any(|o| same_code(&o.geo, &c.geo)) {
                        errors.push(unique_within("code", "region"));
                    }
                }
            }
        } else if nation_known {
            let clash = self
                .cities_of_nation(&c.nation)
                .into_iter()
                .filter(|o| o.id != c.id && o.region.is_none())
                .any(|o| same_code(&o.geo, &c.geo));
            if clash {
                errors.push(unique_within("code", "nation"));
            }
        }
    }

    pub(super) fn validate_hood(&self, h: &Hood, city_known: bool, errors: &mut ValidationErrors) {
        self.check_name(&h.geo, errors);
        if !city_known {
            return;
        }
        let siblings: Vec<&Hood> = self
            .hoods_of(h.city)
            .into_iter()
            .filter(|o| o.id != h.id)
            .collect();
        if !h.geo.name.is_empty() && siblings.iter().any(|o| equals_folded(o.name(), h.name())) {
            errors.push(unique_within("name", "city"));
        }
        if siblings.iter().any(|o| same_code(&o.geo, &h.geo)) {
            errors.push(unique_within("code", "city"));
        }
    }
}
