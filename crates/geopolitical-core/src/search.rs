// crates/geopolitical-core/src/search.rs
//! Read paths: slug search per collection, the unified smart search, phone
//! code lookup and nearest-city queries.

use crate::common::EntityKind;
use crate::db::GeoDb;
use crate::geo::{Point, EARTH_RADIUS_KM};
use crate::model::{City, Hood, Nation, Region};
use crate::slug::encode;
use crate::store::{GeoStore, Store};
use crate::traits::{Document, Geopolitical};

/// Result item of [`GeoDb::smart_search`] with relevance score and matched entity.
#[derive(Debug, Clone, Copy)]
pub struct SmartHit<'a> {
    pub score: i32,
    pub item: SmartItem<'a>,
}

/// Matched entity variant for [`GeoDb::smart_search`].
#[derive(Debug, Clone, Copy)]
pub enum SmartItem<'a> {
    Nation(&'a Nation),
    Region(&'a Region),
    City(&'a City),
    Hood(&'a Hood),
}

impl<'a> SmartItem<'a> {
    pub fn slug(&self) -> &'a str {
        match self {
            SmartItem::Nation(n) => &n.geo.slug,
            SmartItem::Region(r) => &r.geo.slug,
            SmartItem::City(c) => &c.geo.slug,
            SmartItem::Hood(h) => &h.geo.slug,
        }
    }

    pub fn name(&self) -> &'a str {
        match self {
            SmartItem::Nation(n) => &n.geo.name,
            SmartItem::Region(r) => &r.geo.name,
            SmartItem::City(c) => &c.geo.name,
            SmartItem::Hood(h) => &h.geo.name,
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            SmartItem::Nation(_) => EntityKind::Nation,
            SmartItem::Region(_) => EntityKind::Region,
            SmartItem::City(_) => EntityKind::City,
            SmartItem::Hood(_) => EntityKind::Hood,
        }
    }

    /// Hierarchy level, 0 for nations.
    pub fn depth(&self) -> u8 {
        self.kind().depth().unwrap_or(u8::MAX)
    }
}

impl<'a> SmartHit<'a> {
    #[inline]
    pub fn new(score: i32, item: SmartItem<'a>) -> Self {
        SmartHit { score, item }
    }

    /// Returns true if this hit refers to the nation with the given abbreviation.
    #[inline]
    pub fn is_nation_abbr(&self, abbr: &str) -> bool {
        match self.item {
            SmartItem::Nation(n) => n.abbr().eq_ignore_ascii_case(abbr.trim()),
            _ => false,
        }
    }

    /// True if this hit is a city called `name` in any of its languages.
    pub fn is_city_named(&self, name: &str) -> bool {
        match self.item {
            SmartItem::City(c) => c.is_named(name),
            _ => false,
        }
    }
}

const SCORE_ABBR: i32 = 100;
const SCORE_EXACT: i32 = 90;
const SCORE_PREFIX: i32 = 50;
const SCORE_PHONE: i32 = 20;

fn slug_score(slug: &str, q: &str) -> Option<i32> {
    if slug == q {
        Some(SCORE_EXACT)
    } else if slug.starts_with(q) {
        Some(SCORE_PREFIX)
    } else {
        None
    }
}

impl<S: GeoStore> GeoDb<S> {
    /// Slug search over one collection.
    ///
    /// The query is encoded like stored slugs. `exact` keeps slugs equal to
    /// it, otherwise every slug starting with it matches. Results are
    /// ordered by slug; a query that encodes to nothing matches nothing.
    ///
    /// ```rust
    /// use geopolitical_core::{GeoDb, Nation, NationForm};
    ///
    /// let mut db = GeoDb::new();
    /// db.create_nation(NationForm::new("United States", "US")).unwrap();
    /// db.create_nation(NationForm::new("United Kingdom", "GB")).unwrap();
    ///
    /// assert_eq!(db.search::<Nation>("United", false).len(), 2);
    /// assert_eq!(db.search::<Nation>("united-states", true).len(), 1);
    /// assert!(db.search::<Nation>("  ", false).is_empty());
    /// ```
    pub fn search<D: Document>(&self, query: &str, exact: bool) -> Vec<&D>
    where
        S: Store<D>,
    {
        let q = encode(query);
        if q.is_empty() {
            return Vec::new();
        }
        let col = self.col::<D>();
        if exact {
            // the store's index is unique, but the contract is "all matches"
            return col.find_by_slug(&q).into_iter().collect();
        }
        let mut out: Vec<&D> = col
            .all()
            .into_iter()
            .filter(|d| d.slug().is_some_and(|s| s.starts_with(&q)))
            .collect();
        out.sort_by(|a, b| a.slug().cmp(&b.slug()));
        out
    }

    /// Nations whose own phone code starts with `prefix` (a leading `+` and
    /// surrounding whitespace are ignored). Sorted by name.
    pub fn nations_by_phone_code(&self, prefix: &str) -> Vec<&Nation> {
        let prefix = prefix.trim().trim_start_matches('+');
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut out: Vec<&Nation> = self
            .col::<Nation>()
            .all()
            .into_iter()
            .filter(|n| {
                n.geo
                    .phone
                    .as_deref()
                    .is_some_and(|p| p.trim_start_matches('+').starts_with(prefix))
            })
            .collect();
        out.sort();
        out
    }

    /// Unified search across nations, regions, cities and hoods.
    ///
    /// Scoring: exact nation abbreviation first, then exact slug, then slug
    /// prefix, then nations matched by phone code. Equal scores order by
    /// hierarchy depth, then slug.
    pub fn smart_search(&self, query: &str) -> Vec<SmartHit<'_>> {
        let raw = query.trim();
        if raw.is_empty() {
            return Vec::new();
        }
        let q = encode(raw);
        let mut out: Vec<SmartHit<'_>> = Vec::new();

        for n in self.col::<Nation>().all() {
            if n.abbr().eq_ignore_ascii_case(raw) {
                out.push(SmartHit::new(SCORE_ABBR, SmartItem::Nation(n)));
            } else if let Some(score) = slug_score(&n.geo.slug, &q).filter(|_| !q.is_empty()) {
                out.push(SmartHit::new(score, SmartItem::Nation(n)));
            }
        }
        if !q.is_empty() {
            out.extend(self.scored::<Region>(&q, SmartItem::Region));
            out.extend(self.scored::<City>(&q, SmartItem::City));
            out.extend(self.scored::<Hood>(&q, SmartItem::Hood));
        }

        let phone = raw.trim_start_matches('+');
        if phone.chars().all(|c| c.is_ascii_digit()) {
            for n in self.nations_by_phone_code(phone) {
                if !out.iter().any(|h| matches!(h.item, SmartItem::Nation(o) if o.id == n.id)) {
                    out.push(SmartHit::new(SCORE_PHONE, SmartItem::Nation(n)));
                }
            }
        }

        out.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.item.depth().cmp(&b.item.depth()))
                .then_with(|| a.item.slug().cmp(b.item.slug()))
        });
        out
    }

    fn scored<'a, D: Geopolitical>(
        &'a self,
        q: &str,
        wrap: fn(&'a D) -> SmartItem<'a>,
    ) -> Vec<SmartHit<'a>>
    where
        S: Store<D>,
    {
        self.col::<D>()
            .all()
            .into_iter()
            .filter_map(|d| slug_score(d.geo_slug(), q).map(|score| SmartHit::new(score, wrap(d))))
            .collect()
    }

    /// Cities nearest to `point`, closest first; ties by slug. Cities without
    /// a point are never returned. `None` means no limit.
    pub fn nearby(&self, point: &Point, limit: Option<usize>) -> Vec<&City> {
        self.nearby_with_distance(point, limit)
            .into_iter()
            .map(|(city, _)| city)
            .collect()
    }

    /// Like [`nearby`](Self::nearby), paired with the great-circle distance
    /// in kilometres.
    pub fn nearby_with_distance(&self, point: &Point, limit: Option<usize>) -> Vec<(&City, f64)> {
        let mut hits: Vec<(&City, f64)> = self
            .geo
            .nearest(point, limit)
            .into_iter()
            .filter_map(|(id, d2)| self.get::<City>(&id).map(|c| (c, d2)))
            .collect();
        hits.sort_by(|(a, da), (b, db)| {
            da.total_cmp(db)
                .then_with(|| a.geo.slug.cmp(&b.geo.slug))
        });
        if let Some(limit) = limit {
            hits.truncate(limit);
        }
        hits.into_iter()
            .map(|(city, d2)| (city, chord_to_km(d2)))
            .collect()
    }
}

/// Squared chord between unit vectors to arc length on the earth.
fn chord_to_km(d2: f64) -> f64 {
    let chord = d2.max(0.0).sqrt().min(2.0);
    2.0 * (chord / 2.0).asin() * EARTH_RADIUS_KM
}
