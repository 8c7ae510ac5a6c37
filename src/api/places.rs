use log::{debug, warn};
use serde::Deserialize;

use super::client::{Envelope, GoogleMapsClient, LatLngField};
use super::oracle::OracleError;
use crate::domain::{GeoPoint, Poi, PoiType, reachability_score};

#[derive(Debug, Deserialize)]
pub(crate) struct NearbySearchResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    results: Vec<Place>,
}

#[derive(Debug, Deserialize)]
struct Place {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    geometry: PlaceGeometry,
}

#[derive(Debug, Deserialize)]
struct PlaceGeometry {
    location: LatLngField,
}

pub(crate) fn pois_from_response(
    response: NearbySearchResponse,
    center: GeoPoint,
    poi_type: PoiType,
) -> Result<Vec<Poi>, OracleError> {
    response.envelope.check(&["ZERO_RESULTS"])?;

    let pois = response
        .results
        .into_iter()
        .map(|place| {
            let position: GeoPoint = place.geometry.location.into();
            Poi {
                id: place
                    .place_id
                    .unwrap_or_else(|| format!("{}@{}", poi_type.place_type(), position)),
                position,
                name: place.name.unwrap_or_else(|| "Unknown".to_string()),
                poi_type,
                rating: place.rating,
                reachability_score: reachability_score(center, position),
            }
        })
        .collect();

    Ok(pois)
}

impl GoogleMapsClient {
    /// Nearby places of one type
    pub fn search_places(
        &self,
        center: GeoPoint,
        radius_m: u32,
        poi_type: PoiType,
    ) -> Result<Vec<Poi>, OracleError> {
        debug!(
            "nearby search: {} within {}m of {}",
            poi_type.place_type(),
            radius_m,
            center
        );

        let params = [
            ("location", center.to_string()),
            ("radius", radius_m.to_string()),
            ("type", poi_type.place_type().to_string()),
        ];
        let response: NearbySearchResponse = self.get_json("place/nearbysearch", &params)?;
        pois_from_response(response, center, poi_type)
    }

    /// Search every requested type. A failing type is logged and skipped.
    pub fn find_pois(&self, center: GeoPoint, radius_m: u32, types: &[PoiType]) -> Vec<Poi> {
        let mut pois = Vec::new();
        for &poi_type in types {
            match self.search_places(center, radius_m, poi_type) {
                Ok(found) => pois.extend(found),
                Err(e) => warn!("search for {} failed: {}", poi_type.place_type(), e),
            }
        }
        pois
    }
}
