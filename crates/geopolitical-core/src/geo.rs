// crates/geopolitical-core/src/geo.rs
//! City coordinates and the nearest-first spatial index.
//!
//! Points are stored in the R-tree as unit vectors on the sphere. Chord
//! length between two unit vectors grows monotonically with the
//! great-circle angle, so nearest-neighbor order in 3-D equals order by
//! great-circle distance without any planar approximation.

use crate::common::CityId;
use crate::error::{GeoError, Result};
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mean earth radius used for reported distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// A (longitude, latitude) pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lon: f64,
    pub lat: f64,
}

impl Point {
    /// Validated constructor; rejects non-finite or out-of-range values.
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        if !lon.is_finite() || !lat.is_finite() {
            return Err(GeoError::InvalidGeometry(format!(
                "coordinates must be finite, got ({lon}, {lat})"
            )));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GeoError::InvalidGeometry(format!(
                "longitude {lon} outside [-180, 180]"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidGeometry(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        Ok(Self { lon, lat })
    }

    /// Parses `"lon,lat"` (whitespace around either part is ignored).
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(',').map(str::trim);
        let (Some(lon), Some(lat), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(GeoError::InvalidGeometry(format!(
                "expected \"lon,lat\", got {text:?}"
            )));
        };
        let lon = lon
            .parse::<f64>()
            .map_err(|e| GeoError::InvalidGeometry(format!("longitude {lon:?}: {e}")))?;
        let lat = lat
            .parse::<f64>()
            .map_err(|e| GeoError::InvalidGeometry(format!("latitude {lat:?}: {e}")))?;
        Self::new(lon, lat)
    }

    pub(crate) fn unit_vector(&self) -> [f64; 3] {
        let (lon, lat) = (self.lon.to_radians(), self.lat.to_radians());
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }

    /// Great-circle distance (haversine).
    pub fn distance_km(&self, other: &Point) -> f64 {
        let (lat1, lat2) = (self.lat.to_radians(), other.lat.to_radians());
        let dlat = lat2 - lat1;
        let dlon = (other.lon - self.lon).to_radians();
        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_KM * a.sqrt().min(1.0).asin()
    }
}

type Entry = GeomWithData<[f64; 3], CityId>;

/// One point per city, answering nearest-first queries.
#[derive(Default)]
pub struct GeoIndex {
    tree: RTree<Entry>,
    points: HashMap<CityId, Point>,
}

impl std::fmt::Debug for GeoIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoIndex")
            .field("count", &self.points.len())
            .finish_non_exhaustive()
    }
}

impl GeoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-loads an index from `(city, point)` pairs.
    pub fn from_points(points: impl IntoIterator<Item = (CityId, Point)>) -> Self {
        let points: HashMap<CityId, Point> = points.into_iter().collect();
        let entries = points
            .iter()
            .map(|(id, p)| Entry::new(p.unit_vector(), *id))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, city: CityId) -> Option<Point> {
        self.points.get(&city).copied()
    }

    /// Sets, moves or clears (`None`) the point stored for `city`.
    pub fn set(&mut self, city: CityId, point: Option<Point>) {
        self.remove(city);
        if let Some(p) = point {
            self.tree.insert(Entry::new(p.unit_vector(), city));
            self.points.insert(city, p);
        }
    }

    pub fn remove(&mut self, city: CityId) {
        if let Some(old) = self.points.remove(&city) {
            self.tree.remove(&Entry::new(old.unit_vector(), city));
        }
    }

    /// Cities nearest to `point`, closest first, with their squared chord
    /// distance (an order key, not a physical distance).
    ///
    /// When `limit` cuts through a group of equidistant cities the whole
    /// group is returned, so callers can break ties deterministically
    /// before truncating.
    pub fn nearest(&self, point: &Point, limit: Option<usize>) -> Vec<(CityId, f64)> {
        let limit = limit.unwrap_or(usize::MAX);
        let mut out: Vec<(CityId, f64)> = Vec::new();
        if limit == 0 {
            return out;
        }
        for (entry, d2) in self
            .tree
            .nearest_neighbor_iter_with_distance_2(&point.unit_vector())
        {
            if out.len() >= limit && out.last().is_some_and(|(_, last)| d2 > *last) {
                break;
            }
            out.push((entry.data, d2));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lon: f64, lat: f64) -> Point {
        Point::new(lon, lat).unwrap()
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(Point::new(181.0, 0.0), Err(GeoError::InvalidGeometry(_))));
        assert!(matches!(Point::new(0.0, -90.5), Err(GeoError::InvalidGeometry(_))));
        assert!(matches!(Point::new(f64::NAN, 0.0), Err(GeoError::InvalidGeometry(_))));
    }

    #[test]
    fn parses_lon_lat_pairs() {
        assert_eq!(Point::parse(" -46.63, -23.55 ").unwrap(), pt(-46.63, -23.55));
        assert!(matches!(Point::parse("10"), Err(GeoError::InvalidGeometry(_))));
        assert!(matches!(Point::parse("1,2,3"), Err(GeoError::InvalidGeometry(_))));
        assert!(matches!(Point::parse("east,2"), Err(GeoError::InvalidGeometry(_))));
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Sao Paulo -> Rio de Janeiro, roughly 360 km
        let d = pt(-46.63, -23.55).distance_km(&pt(-43.17, -22.91));
        assert!((340.0..380.0).contains(&d), "got {d}");
        assert_eq!(pt(10.0, 10.0).distance_km(&pt(10.0, 10.0)), 0.0);
    }

    #[test]
    fn nearest_orders_by_distance() {
        let index = GeoIndex::from_points([
            (CityId(1), pt(10.0, 10.0)),
            (CityId(2), pt(20.0, 20.0)),
            (CityId(3), pt(30.0, 30.0)),
        ]);
        let ids: Vec<CityId> = index
            .nearest(&pt(12.0, 12.0), None)
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![CityId(1), CityId(2), CityId(3)]);

        let ids: Vec<CityId> = index
            .nearest(&pt(22.0, 22.0), Some(1))
            .into_iter()
            .map(|(id, _)| id)
            .collect();
        assert_eq!(ids, vec![CityId(2)]);
    }

    #[test]
    fn nearest_crosses_the_antimeridian() {
        let index = GeoIndex::from_points([
            (CityId(1), pt(179.5, 0.0)),
            (CityId(2), pt(170.0, 0.0)),
        ]);
        let first = index.nearest(&pt(-179.5, 0.0), Some(1));
        assert_eq!(first[0].0, CityId(1));
    }

    #[test]
    fn limit_keeps_equidistant_group() {
        let index = GeoIndex::from_points([
            (CityId(1), pt(5.0, 5.0)),
            (CityId(2), pt(5.0, 5.0)),
            (CityId(3), pt(40.0, 40.0)),
        ]);
        assert_eq!(index.nearest(&pt(5.0, 5.0), Some(1)).len(), 2);
        assert!(index.nearest(&pt(5.0, 5.0), Some(0)).is_empty());
    }

    #[test]
    fn set_moves_and_clears_points() {
        let mut index = GeoIndex::new();
        index.set(CityId(1), Some(pt(1.0, 1.0)));
        index.set(CityId(1), Some(pt(2.0, 2.0)));
        assert_eq!(index.len(), 1);
        assert_eq!(index.point(CityId(1)), Some(pt(2.0, 2.0)));
        index.set(CityId(1), None);
        assert!(index.is_empty());
        assert!(index.nearest(&pt(0.0, 0.0), None).is_empty());
    }
}
