use thiserror::Error;

use crate::domain::{GeoPoint, TravelMode, TravelSample};

/// Destinations per call accepted by the distance-matrix endpoint
pub const DEFAULT_BATCH_LIMIT: usize = 25;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("no API key configured (set GOOGLE_MAPS_API_KEY or `api_key` in the config file)")]
    MissingApiKey,
    #[error("request to travel-time service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("travel-time service returned status {status}{}", detail(.message))]
    Status {
        status: String,
        message: Option<String>,
    },
    #[error("travel-time service returned a malformed response: {0}")]
    Malformed(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// External source of travel-time estimates from one origin to many destinations.
///
/// Implementations return one sample per destination, in order. Per-destination
/// failures are reported as [`TravelSample::unknown`]; an `Err` means the whole
/// call failed.
pub trait TravelTimeOracle: Sync {
    fn travel_times(
        &self,
        origin: GeoPoint,
        destinations: &[GeoPoint],
        mode: TravelMode,
    ) -> Result<Vec<TravelSample>, OracleError>;

    /// Maximum destinations accepted per call
    fn batch_limit(&self) -> usize {
        DEFAULT_BATCH_LIMIT
    }
}

impl<T: TravelTimeOracle + ?Sized> TravelTimeOracle for &T {
    fn travel_times(
        &self,
        origin: GeoPoint,
        destinations: &[GeoPoint],
        mode: TravelMode,
    ) -> Result<Vec<TravelSample>, OracleError> {
        (**self).travel_times(origin, destinations, mode)
    }

    fn batch_limit(&self) -> usize {
        (**self).batch_limit()
    }
}
