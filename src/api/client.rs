use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::oracle::OracleError;
use crate::config::MapsApiConfig;

pub(crate) const USER_AGENT: &str = concat!("isochrone-explorer/", env!("CARGO_PKG_VERSION"));

/// Handle to the web mapping services (distance matrix, directions, places).
///
/// Building one is the initialization step: it checks for an API key and
/// sets up the HTTP client once. Callers own it and pass it where needed.
#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    pub(crate) batch_limit: usize,
}

/// Status envelope shared by every endpoint
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Envelope {
    pub fn check(&self, also_ok: &[&str]) -> Result<(), OracleError> {
        if self.status == "OK" || also_ok.contains(&self.status.as_str()) {
            Ok(())
        } else {
            Err(OracleError::Status {
                status: self.status.clone(),
                message: self.error_message.clone(),
            })
        }
    }
}

/// `{ "value": ... }` wrapper used for distances and durations
#[derive(Debug, Deserialize, Clone, Copy)]
pub(crate) struct ValueField {
    pub value: f64,
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub(crate) struct LatLngField {
    pub lat: f64,
    pub lng: f64,
}

impl From<LatLngField> for crate::domain::GeoPoint {
    fn from(l: LatLngField) -> Self {
        crate::domain::GeoPoint::new(l.lat, l.lng)
    }
}

impl GoogleMapsClient {
    pub fn new(config: &MapsApiConfig) -> Result<Self, OracleError> {
        let api_key = config
            .resolve_api_key()
            .ok_or(OracleError::MissingApiKey)?;

        let http = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            batch_limit: config.batch_limit.max(1),
        })
    }

    /// GET `{base_url}/{endpoint}/json` with the API key appended
    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, OracleError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Status {
                status: format!("HTTP {}", status.as_u16()),
                message: status.canonical_reason().map(str::to_string),
            });
        }

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| OracleError::Malformed(e.to_string()))
    }
}
