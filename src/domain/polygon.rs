use geo::{Area, Intersects, LineString, Point, Polygon};
use serde::Serialize;

use super::{GeoPoint, TravelMode};
use crate::geometry::{Projector, haversine_m};

/// Boundary of the area reachable within a time budget.
///
/// The ring is either empty or holds at least three points. It is listed
/// counter-clockwise in (lat, lng) axis order and is closed implicitly
/// (the first point is not repeated).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReachabilityPolygon {
    ring: Vec<GeoPoint>,
    pub time_minutes: f64,
    pub travel_mode: TravelMode,
    pub distortion_factor: f64,
}

impl ReachabilityPolygon {
    /// Wrap a hull ring. Rings with fewer than three points collapse to empty.
    pub fn new(ring: Vec<GeoPoint>, time_minutes: f64, travel_mode: TravelMode) -> Self {
        let ring = if ring.len() < 3 { Vec::new() } else { ring };
        Self {
            ring,
            time_minutes,
            travel_mode,
            distortion_factor: travel_mode.distortion_factor(),
        }
    }

    pub fn empty(time_minutes: f64, travel_mode: TravelMode) -> Self {
        Self::new(Vec::new(), time_minutes, travel_mode)
    }

    pub fn ring(&self) -> &[GeoPoint] {
        &self.ring
    }

    /// No reachable area could be drawn
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    fn to_geo(&self) -> Polygon<f64> {
        let exterior: LineString<f64> = self.ring.iter().map(|&p| geo::Coord::from(p)).collect();
        Polygon::new(exterior, Vec::new())
    }

    /// True if the point is inside the polygon or on its boundary
    pub fn contains(&self, point: GeoPoint) -> bool {
        if self.is_empty() {
            return false;
        }
        let p: Point<f64> = geo::Coord::from(point).into();
        self.to_geo().intersects(&p)
    }

    /// Approximate enclosed area in square meters (planar, around the first vertex)
    pub fn area_m2(&self) -> f64 {
        let Some(&anchor) = self.ring.first() else {
            return 0.0;
        };
        let projector = Projector::new(anchor);
        let exterior: LineString<f64> = self
            .ring
            .iter()
            .map(|&p| {
                let (x, y) = projector.project(p);
                geo::coord! { x: x, y: y }
            })
            .collect();
        Polygon::new(exterior, Vec::new()).unsigned_area()
    }

    /// Largest great-circle distance from `origin` to any vertex, in meters
    pub fn max_distance_m(&self, origin: GeoPoint) -> f64 {
        self.ring
            .iter()
            .map(|&p| haversine_m(origin, p))
            .fold(0.0, f64::max)
    }
}
