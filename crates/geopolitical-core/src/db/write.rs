// crates/geopolitical-core/src/db/write.rs
//! Create/update pipelines: normalize → defaults → slug → validate → commit.

use super::GeoDb;
use crate::common::{CityId, EntityKind, HoodId, NationId, RegionId};
use crate::error::{GeoError, Result, ValidationError, ValidationErrors};
use crate::geo::Point;
use crate::model::attrs::non_blank;
use crate::model::{City, CityForm, GeoAttrs, Hood, HoodForm, Nation, NationForm, Region, RegionForm};
use crate::slug::{encode, resolve_hood_slug, resolve_slug, strip_disambiguator, SlugConflict};
use crate::store::{GeoStore, Store};
use crate::traits::Document;
use tracing::{debug, info, warn};

/// Slug and disambiguator of the stored version of an entity being updated.
pub(super) struct Stored {
    pub slug: String,
    pub disambiguator: Option<String>,
}

pub(super) fn slug_outcome(result: std::result::Result<String, SlugConflict>, errors: &mut ValidationErrors) -> String {
    match result {
        Ok(slug) => slug,
        Err(SlugConflict::Empty) => {
            errors.push(ValidationError::MissingRequiredField { field: "slug" });
            String::new()
        }
        Err(SlugConflict::Duplicate(slug)) => {
            errors.push(ValidationError::DuplicateIdentity { slug: slug.clone() });
            slug
        }
    }
}

/// Ends the validation stage: `Err` with every finding, or `Ok`.
pub(super) fn checked(kind: EntityKind, errors: ValidationErrors) -> Result<()> {
    if errors.is_empty() {
        return Ok(());
    }
    warn!(%kind, errors = %errors, "write rejected");
    Err(GeoError::Invalid(errors))
}

/// A duplicate reported by the store itself (a concurrent writer won the
/// race) surfaces like any other uniqueness finding.
pub(super) fn backstop(err: GeoError) -> GeoError {
    match err {
        GeoError::DuplicateIdentity { kind, key } => {
            warn!(%kind, %key, "store rejected duplicate identity");
            GeoError::Invalid(ValidationError::DuplicateIdentity { slug: key }.into())
        }
        other => other,
    }
}

/// `slug` without its leading `prefix-`, when it has one.
fn without_prefix<'a>(slug: &'a str, prefix: &str) -> Option<&'a str> {
    slug.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .filter(|rest| !rest.is_empty())
}

fn check_point(point: Option<Point>) -> Result<()> {
    match point {
        Some(p) => Point::new(p.lon, p.lat).map(|_| ()),
        None => Ok(()),
    }
}

impl<S: GeoStore> GeoDb<S> {
    pub(super) fn slug_taken<D: Document>(&self, slug: &str, own: Option<&D::Id>) -> bool
    where
        S: Store<D>,
    {
        self.col::<D>()
            .find_by_slug(slug)
            .is_some_and(|d| Some(d.id()) != own)
    }

    /// Slug step for nations, regions and cities.
    ///
    /// New entities derive from the requested slug or the name. Stored
    /// entities keep their slug unless the caller asks for a different one,
    /// or unless the slug carries the old parent's disambiguator and the
    /// parent changed, in which case the stem is resolved again.
    pub(super) fn settle_slug<D: Document>(
        &self,
        own: Option<&D::Id>,
        geo: &GeoAttrs,
        previous: Option<&Stored>,
        disambiguator: Option<&str>,
        errors: &mut ValidationErrors,
    ) -> String
    where
        S: Store<D>,
    {
        let requested = geo.slug.as_str();
        let base = match previous {
            None if requested.is_empty() => geo.name.clone(),
            None => requested.to_string(),
            Some(prev) if !requested.is_empty() && encode(requested) != prev.slug => {
                requested.to_string()
            }
            Some(prev) if prev.disambiguator.as_deref() != disambiguator => {
                let stem = prev
                    .disambiguator
                    .as_deref()
                    .and_then(|old| strip_disambiguator(&prev.slug, old));
                match stem {
                    Some(stem) => {
                        debug!(kind = %D::KIND, slug = %prev.slug, %stem, "parent changed, re-resolving slug");
                        stem.to_string()
                    }
                    None => return prev.slug.clone(),
                }
            }
            Some(prev) => return prev.slug.clone(),
        };
        let taken = |s: &str| self.slug_taken::<D>(s, own);
        slug_outcome(resolve_slug(&base, taken, disambiguator), errors)
    }

    /// Slug step for hoods. The resolver always prefixes the city slug, so
    /// only the name part is worked out here: the name, a requested slug
    /// with any current city prefix removed, or, after a move to another
    /// city, the stored slug with the old city's prefix removed.
    fn settle_hood_slug(
        &self,
        own: Option<&HoodId>,
        geo: &GeoAttrs,
        previous: Option<(&str, &str)>,
        city_slug: &str,
        errors: &mut ValidationErrors,
    ) -> String {
        let requested = encode(&geo.slug);
        let requested_part = || {
            without_prefix(&requested, city_slug)
                .unwrap_or(requested.as_str())
                .to_string()
        };
        let name_part = match previous {
            None if requested.is_empty() => geo.name.clone(),
            None => requested_part(),
            Some((slug, _)) if !requested.is_empty() && requested != slug => requested_part(),
            Some((slug, old_city_slug)) if old_city_slug != city_slug => {
                without_prefix(slug, old_city_slug)
                    .unwrap_or(geo.name.as_str())
                    .to_string()
            }
            Some((slug, _)) => return slug.to_string(),
        };
        let taken = |s: &str| self.slug_taken::<Hood>(s, own);
        slug_outcome(resolve_hood_slug(city_slug, &name_part, taken), errors)
    }

    fn commit_insert<D: Document>(&mut self, doc: D) -> Result<D>
    where
        S: Store<D>,
    {
        self.col_mut::<D>().insert(doc).map_err(backstop)
    }

    fn commit_replace<D: Document>(&mut self, doc: D) -> Result<D>
    where
        S: Store<D>,
    {
        self.col_mut::<D>().replace(doc).map_err(backstop)
    }

    /// Disambiguator for a city: region abbr, else region name, else the
    /// nation abbr for cities without a region.
    fn city_disambiguator(&self, region: Option<RegionId>, nation: &NationId) -> Option<String> {
        match region {
            Some(id) => self.get::<Region>(&id).map(|r| {
                r.geo
                    .abbr
                    .clone()
                    .unwrap_or_else(|| r.geo.name.clone())
            }),
            None => Some(nation.to_string()).filter(|n| !n.is_empty()),
        }
    }

    // -----------------------------------------------------------------------
    // NATION
    // -----------------------------------------------------------------------

    fn build_nation(id: NationId, geo: GeoAttrs, form: NationForm) -> Nation {
        let abbr = Some(id.to_string()).filter(|a| !a.is_empty());
        Nation {
            id,
            geo: GeoAttrs { abbr, ..geo },
            code3: non_blank(form.code3).map(|c| c.to_uppercase()),
            tld: non_blank(form.tld),
            currency: non_blank(form.currency),
            languages: form
                .languages
                .into_iter()
                .filter_map(|l| non_blank(Some(l)))
                .collect(),
            capital: form.capital,
        }
    }

    pub fn create_nation(&mut self, form: NationForm) -> Result<Nation> {
        let mut errors = ValidationErrors::new();
        let geo = form.geo.clone().normalized();
        let id = NationId::new(geo.abbr.as_deref().unwrap_or_default());
        let mut nation = Self::build_nation(id, geo, form);

        nation.geo.slug = self.settle_slug::<Nation>(None, &nation.geo, None, None, &mut errors);
        self.validate_nation(&nation, true, &mut errors);
        checked(EntityKind::Nation, errors)?;

        let nation = self.commit_insert(nation)?;
        info!(id = %nation.id, slug = %nation.geo.slug, "nation created");
        Ok(nation)
    }

    /// Replaces the editable fields of a nation. Its abbreviation is its key
    /// and cannot change.
    pub fn update_nation(&mut self, id: &NationId, form: NationForm) -> Result<Nation> {
        let current = self.nation(id)?.clone();
        let mut errors = ValidationErrors::new();
        let geo = form.geo.clone().normalized();
        if geo
            .abbr
            .as_deref()
            .is_some_and(|a| NationId::new(a) != current.id)
        {
            errors.push(ValidationError::ImmutableField { field: "abbr" });
        }
        let mut nation = Self::build_nation(current.id.clone(), geo, form);

        let prev = Stored {
            slug: current.geo.slug.clone(),
            disambiguator: None,
        };
        nation.geo.slug =
            self.settle_slug::<Nation>(Some(&current.id), &nation.geo, Some(&prev), None, &mut errors);
        self.validate_nation(&nation, false, &mut errors);
        checked(EntityKind::Nation, errors)?;

        let nation = self.commit_replace(nation)?;
        info!(id = %nation.id, slug = %nation.geo.slug, "nation updated");
        Ok(nation)
    }

    // -----------------------------------------------------------------------
    // REGION
    // -----------------------------------------------------------------------

    pub fn create_region(&mut self, form: RegionForm) -> Result<Region> {
        let id = RegionId(self.col_mut::<Region>().next_id());
        self.save_region(id, None, form)
    }

    pub fn update_region(&mut self, id: RegionId, form: RegionForm) -> Result<Region> {
        let current = self.region(id)?.clone();
        self.save_region(id, Some(current), form)
    }

    fn save_region(&mut self, id: RegionId, current: Option<Region>, form: RegionForm) -> Result<Region> {
        let mut errors = ValidationErrors::new();
        let geo = form.geo.normalized();
        let mut region = Region {
            id,
            nation: form.nation.unwrap_or_else(|| NationId::new("")),
            geo,
            timezone: non_blank(form.timezone),
            capital: form.capital,
        };

        let disambiguator = Some(region.nation.to_string()).filter(|n| !n.is_empty());
        let prev = current.as_ref().map(|c| Stored {
            slug: c.geo.slug.clone(),
            disambiguator: Some(c.nation.to_string()),
        });
        region.geo.slug = self.settle_slug::<Region>(
            Some(&id),
            &region.geo,
            prev.as_ref(),
            disambiguator.as_deref(),
            &mut errors,
        );
        self.validate_region(&region, &mut errors);
        checked(EntityKind::Region, errors)?;

        let region = if current.is_some() {
            self.commit_replace(region)?
        } else {
            self.commit_insert(region)?
        };
        info!(id = %region.id, slug = %region.geo.slug, nation = %region.nation, "region saved");
        Ok(region)
    }

    // -----------------------------------------------------------------------
    // CITY
    // -----------------------------------------------------------------------

    pub fn create_city(&mut self, form: CityForm) -> Result<City> {
        check_point(form.point)?;
        let id = CityId(self.col_mut::<City>().next_id());
        self.save_city(id, None, form)
    }

    pub fn update_city(&mut self, id: CityId, form: CityForm) -> Result<City> {
        check_point(form.point)?;
        let current = self.city(id)?.clone();
        self.save_city(id, Some(current), form)
    }

    fn save_city(&mut self, id: CityId, current: Option<City>, form: CityForm) -> Result<City> {
        let mut errors = ValidationErrors::new();
        let geo = form.geo.normalized();
        let region = form.region.and_then(|r| self.get::<Region>(&r));

        // Defaults: nation from region, cached region abbreviation.
        let nation = form
            .nation
            .or_else(|| region.map(|r| r.nation.clone()))
            .unwrap_or_else(|| NationId::new(""));
        let region_abbr = match &current {
            Some(c) if c.region == form.region && c.region_abbr.is_some() => c.region_abbr.clone(),
            _ => region.and_then(|r| r.geo.abbr.clone()),
        };
        let mut city = City {
            id,
            nation,
            region: form.region,
            geo,
            area: form.area,
            point: form.point,
            region_abbr,
        };

        // The stored slug was built with the region abbreviation cached at
        // the time, which may since have changed on the region itself.
        let prev = current.as_ref().map(|c| Stored {
            slug: c.geo.slug.clone(),
            disambiguator: c
                .region
                .and(c.region_abbr.clone())
                .or_else(|| self.city_disambiguator(c.region, &c.nation)),
        });
        let disambiguator = match (&current, &prev) {
            (Some(c), Some(p)) if c.region == city.region && c.nation == city.nation => {
                p.disambiguator.clone()
            }
            _ => self.city_disambiguator(city.region, &city.nation),
        };
        city.geo.slug = self.settle_slug::<City>(
            Some(&id),
            &city.geo,
            prev.as_ref(),
            disambiguator.as_deref(),
            &mut errors,
        );
        self.validate_city(&city, &mut errors);
        checked(EntityKind::City, errors)?;

        let city = if current.is_some() {
            self.commit_replace(city)?
        } else {
            self.commit_insert(city)?
        };
        self.geo.set(city.id, city.point);
        info!(id = %city.id, slug = %city.geo.slug, nation = %city.nation, "city saved");
        Ok(city)
    }

    // -----------------------------------------------------------------------
    // HOOD
    // -----------------------------------------------------------------------

    pub fn create_hood(&mut self, form: HoodForm) -> Result<Hood> {
        let id = HoodId(self.col_mut::<Hood>().next_id());
        self.save_hood(id, None, form)
    }

    pub fn update_hood(&mut self, id: HoodId, form: HoodForm) -> Result<Hood> {
        let current = self.hood(id)?.clone();
        self.save_hood(id, Some(current), form)
    }

    fn save_hood(&mut self, id: HoodId, current: Option<Hood>, form: HoodForm) -> Result<Hood> {
        let mut errors = ValidationErrors::new();
        let geo = form.geo.normalized();
        let city = match form.city {
            None => {
                errors.push(ValidationError::MissingRequiredField { field: "city" });
                None
            }
            Some(city_id) => {
                let city = self.get::<City>(&city_id);
                if city.is_none() {
                    errors.push(ValidationError::UnknownReference {
                        field: "city",
                        kind: EntityKind::City,
                        key: city_id.to_string(),
                    });
                }
                city
            }
        };
        let mut hood = Hood {
            id,
            city: form.city.unwrap_or(CityId(0)),
            geo,
            rank: form.rank,
        };

        if let Some(city) = city {
            let old_city_slug = current.as_ref().map(|h| {
                self.get::<City>(&h.city)
                    .map(|c| c.geo.slug.clone())
                    .unwrap_or_default()
            });
            let previous = current
                .as_ref()
                .zip(old_city_slug.as_deref())
                .map(|(h, old)| (h.geo.slug.as_str(), old));
            hood.geo.slug = self.settle_hood_slug(Some(&id), &hood.geo, previous, &city.geo.slug, &mut errors);
        }
        self.validate_hood(&hood, city.is_some(), &mut errors);
        checked(EntityKind::Hood, errors)?;

        let hood = if current.is_some() {
            self.commit_replace(hood)?
        } else {
            self.commit_insert(hood)?
        };
        info!(id = %hood.id, slug = %hood.geo.slug, city = %hood.city, "hood saved");
        Ok(hood)
    }
}
