use serde::{Deserialize, Serialize};

use super::GeoPoint;
use crate::geometry::haversine_m;

/// Point-of-interest categories the explorer searches for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PoiType {
    Cafe,
    Restaurant,
    Park,
    BikeRepair,
    Gym,
    Shop,
    Transit,
}

impl PoiType {
    /// Place type string used by the places search API
    pub fn place_type(self) -> &'static str {
        match self {
            PoiType::Cafe => "cafe",
            PoiType::Restaurant => "restaurant",
            PoiType::Park => "park",
            PoiType::BikeRepair => "bicycle_store",
            PoiType::Gym => "gym",
            PoiType::Shop => "store",
            PoiType::Transit => "transit_station",
        }
    }

    /// Reverse of [`PoiType::place_type`]; anything unrecognised is a shop
    pub fn from_place_type(tag: &str) -> PoiType {
        match tag {
            "cafe" => PoiType::Cafe,
            "restaurant" => PoiType::Restaurant,
            "park" => PoiType::Park,
            "bicycle_store" => PoiType::BikeRepair,
            "gym" => PoiType::Gym,
            "transit_station" => PoiType::Transit,
            _ => PoiType::Shop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Poi {
    pub id: String,
    pub position: GeoPoint,
    pub name: String,
    pub poi_type: PoiType,
    pub rating: Option<f64>,
    /// 0..=100, higher is closer to the search origin
    pub reachability_score: f64,
}

/// Closeness score: loses 10 points per kilometer, floored at zero
pub fn reachability_score(origin: GeoPoint, destination: GeoPoint) -> f64 {
    let km = haversine_m(origin, destination) / 1000.0;
    (100.0 - km * 10.0).max(0.0)
}
