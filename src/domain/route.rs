use serde::Serialize;

use super::{GeoPoint, TravelMode};

/// A single turn-by-turn instruction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// Instruction text as returned upstream (may contain HTML markup)
    pub instruction: String,
    pub distance_m: f64,
    pub duration_s: f64,
    pub position: GeoPoint,
}

/// A route from the origin to a chosen destination
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteInfo {
    pub path: Vec<GeoPoint>,
    pub distance_m: f64,
    pub duration_s: f64,
    pub travel_mode: TravelMode,
    pub steps: Vec<RouteStep>,
}

impl RouteInfo {
    pub fn duration_minutes(&self) -> f64 {
        self.duration_s / 60.0
    }
}
