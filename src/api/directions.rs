use log::debug;
use serde::Deserialize;

use super::client::{Envelope, GoogleMapsClient, LatLngField, ValueField};
use super::oracle::OracleError;
use super::polyline::decode_polyline;
use crate::domain::{GeoPoint, RouteInfo, RouteStep, TravelMode};

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    overview_polyline: EncodedPolyline,
    #[serde(default)]
    legs: Vec<Leg>,
}

#[derive(Debug, Deserialize)]
struct EncodedPolyline {
    points: String,
}

#[derive(Debug, Deserialize)]
struct Leg {
    #[serde(default)]
    distance: Option<ValueField>,
    #[serde(default)]
    duration: Option<ValueField>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default)]
    html_instructions: String,
    #[serde(default)]
    distance: Option<ValueField>,
    #[serde(default)]
    duration: Option<ValueField>,
    start_location: LatLngField,
}

fn value_or_zero(field: Option<ValueField>) -> f64 {
    field.map(|v| v.value).unwrap_or(0.0)
}

/// Build a [`RouteInfo`] from the first route and its first leg
pub(crate) fn route_from_response(
    response: DirectionsResponse,
    travel_mode: TravelMode,
) -> Result<RouteInfo, OracleError> {
    response.envelope.check(&[])?;

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| OracleError::Malformed("directions response has no routes".to_string()))?;
    let path = decode_polyline(&route.overview_polyline.points)?;
    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| OracleError::Malformed("route has no legs".to_string()))?;

    let steps = leg
        .steps
        .into_iter()
        .map(|step| RouteStep {
            instruction: step.html_instructions,
            distance_m: value_or_zero(step.distance),
            duration_s: value_or_zero(step.duration),
            position: step.start_location.into(),
        })
        .collect();

    Ok(RouteInfo {
        path,
        distance_m: value_or_zero(leg.distance),
        duration_s: value_or_zero(leg.duration),
        travel_mode,
        steps,
    })
}

impl GoogleMapsClient {
    /// Route between two points for the given travel mode
    pub fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
        mode: TravelMode,
    ) -> Result<RouteInfo, OracleError> {
        debug!("directions: {} -> {} ({})", origin, destination, mode);

        let params = [
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
            ("mode", mode.api_name().to_string()),
            ("avoid", mode.avoid_param().to_string()),
        ];
        let response: DirectionsResponse = self.get_json("directions", &params)?;
        route_from_response(response, mode)
    }
}
