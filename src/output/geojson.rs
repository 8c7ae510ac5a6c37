use anyhow::{Context, Result};
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::{GeoPoint, Poi, PoiType, ReachabilityPolygon, RouteInfo, RouteStep, TravelMode};

/// Everything handed to the rendering layer for one view
#[derive(Debug, Clone, Copy)]
pub struct MapLayers<'a> {
    pub origin: GeoPoint,
    pub polygon: &'a ReachabilityPolygon,
    pub route: Option<&'a RouteInfo>,
    pub pois: &'a [Poi],
}

/// Feature properties, tagged by layer under `kind`
#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum LayerProperties<'a> {
    Origin,
    Isochrone {
        time_minutes: f64,
        travel_mode: TravelMode,
        distortion_factor: f64,
        area_m2: f64,
    },
    Route {
        travel_mode: TravelMode,
        distance_m: f64,
        duration_s: f64,
        steps: &'a [RouteStep],
    },
    Poi {
        name: &'a str,
        poi_type: PoiType,
        rating: Option<f64>,
        reachability_score: f64,
    },
}

impl LayerProperties<'_> {
    fn into_object(self) -> Option<JsonObject> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

/// GeoJSON positions are `[lng, lat]`
fn position(p: GeoPoint) -> Vec<f64> {
    vec![p.lng, p.lat]
}

fn feature(value: Value, properties: LayerProperties<'_>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: properties.into_object(),
        foreign_members: None,
    }
}

/// Polygon feature, or `None` when nothing is reachable.
///
/// The hull ring is counter-clockwise in (lat, lng) order, i.e. clockwise
/// on the map, so it is reversed here to give the counter-clockwise
/// exterior ring GeoJSON expects, and closed by repeating the first point.
pub fn polygon_feature(polygon: &ReachabilityPolygon) -> Option<Feature> {
    let ring = polygon.ring();
    let first = *ring.first()?;

    let mut coords: Vec<Vec<f64>> = ring.iter().rev().map(|&p| position(p)).collect();
    coords.rotate_right(1);
    coords.push(position(first));

    Some(feature(
        Value::Polygon(vec![coords]),
        LayerProperties::Isochrone {
            time_minutes: polygon.time_minutes,
            travel_mode: polygon.travel_mode,
            distortion_factor: polygon.distortion_factor,
            area_m2: polygon.area_m2(),
        },
    ))
}

pub fn route_feature(route: &RouteInfo) -> Feature {
    feature(
        Value::LineString(route.path.iter().map(|&p| position(p)).collect()),
        LayerProperties::Route {
            travel_mode: route.travel_mode,
            distance_m: route.distance_m,
            duration_s: route.duration_s,
            steps: &route.steps,
        },
    )
}

pub fn poi_feature(poi: &Poi) -> Feature {
    let mut feature = feature(
        Value::Point(position(poi.position)),
        LayerProperties::Poi {
            name: &poi.name,
            poi_type: poi.poi_type,
            rating: poi.rating,
            reachability_score: poi.reachability_score,
        },
    );
    feature.id = Some(Id::String(poi.id.clone()));
    feature
}

pub fn to_feature_collection(layers: &MapLayers<'_>) -> FeatureCollection {
    let mut features = vec![feature(
        Value::Point(position(layers.origin)),
        LayerProperties::Origin,
    )];

    features.extend(polygon_feature(layers.polygon));
    features.extend(layers.route.map(route_feature));
    features.extend(layers.pois.iter().map(poi_feature));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Write a feature collection to disk, pretty-printed
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create GeoJSON file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, collection).context("Failed to serialize GeoJSON")?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    Ok(())
}
