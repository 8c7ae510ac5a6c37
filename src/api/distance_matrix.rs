use log::{debug, warn};
use serde::Deserialize;

use super::client::{Envelope, GoogleMapsClient, ValueField};
use super::oracle::{OracleError, TravelTimeOracle};
use crate::domain::{GeoPoint, TravelMode, TravelSample};

#[derive(Debug, Deserialize)]
pub(crate) struct DistanceMatrixResponse {
    #[serde(flatten)]
    envelope: Envelope,
    #[serde(default)]
    rows: Vec<Row>,
}

#[derive(Debug, Deserialize)]
struct Row {
    #[serde(default)]
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    #[serde(default)]
    duration: Option<ValueField>,
}

/// Turn a single-origin matrix response into one sample per destination.
///
/// Elements that are missing, not `OK`, or lack a duration become unknown
/// samples. Only a failed top-level status is an error.
pub(crate) fn samples_from_matrix(
    response: DistanceMatrixResponse,
    destinations: &[GeoPoint],
) -> Result<Vec<TravelSample>, OracleError> {
    response.envelope.check(&[])?;

    let elements = response
        .rows
        .into_iter()
        .next()
        .map(|row| row.elements)
        .unwrap_or_default();

    if elements.len() != destinations.len() {
        warn!(
            "distance matrix returned {} elements for {} destinations",
            elements.len(),
            destinations.len()
        );
    }

    let samples = destinations
        .iter()
        .enumerate()
        .map(|(i, &point)| match elements.get(i) {
            Some(MatrixElement {
                status,
                duration: Some(duration),
            }) if status == "OK" => TravelSample::ok(point, duration.value),
            _ => TravelSample::unknown(point),
        })
        .collect();

    Ok(samples)
}

fn join_points(points: &[GeoPoint]) -> String {
    points
        .iter()
        .map(GeoPoint::to_string)
        .collect::<Vec<_>>()
        .join("|")
}

impl TravelTimeOracle for GoogleMapsClient {
    fn travel_times(
        &self,
        origin: GeoPoint,
        destinations: &[GeoPoint],
        mode: TravelMode,
    ) -> Result<Vec<TravelSample>, OracleError> {
        if destinations.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            "distance matrix: {} destinations from {} ({})",
            destinations.len(),
            origin,
            mode
        );

        let params = [
            ("origins", origin.to_string()),
            ("destinations", join_points(destinations)),
            ("mode", mode.api_name().to_string()),
            ("units", "metric".to_string()),
            ("avoid", mode.avoid_param().to_string()),
        ];
        let response: DistanceMatrixResponse = self.get_json("distancematrix", &params)?;
        samples_from_matrix(response, destinations)
    }

    fn batch_limit(&self) -> usize {
        self.batch_limit
    }
}
