use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::thread;
use std::time::Duration;

use super::client::USER_AGENT;
use crate::domain::GeoPoint;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
}

fn parse_first_result(results: Vec<NominatimResult>, query: &str) -> Result<GeoPoint> {
    let result = results
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Place not found: {}", query))?;

    let lat: f64 = result
        .lat
        .parse()
        .context("Failed to parse latitude from Nominatim response")?;
    let lng: f64 = result
        .lon
        .parse()
        .context("Failed to parse longitude from Nominatim response")?;

    Ok(GeoPoint::new(lat, lng))
}

/// Geocode a free-form place name to coordinates.
///
/// Uses the Nominatim API. Includes a 1 second delay for rate limiting
/// (Nominatim ToS).
///
/// # Arguments
/// * `query` - Place name (e.g., "Ferry Building, San Francisco")
/// * `timeout_secs` - HTTP timeout
pub fn geocode(query: &str, timeout_secs: u64) -> Result<GeoPoint> {
    // Rate limiting - Nominatim requires max 1 request per second
    thread::sleep(Duration::from_secs(1));

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(NOMINATIM_URL)
        .query(&[("q", query), ("format", "json"), ("limit", "1")])
        .send()
        .context("Failed to send request to Nominatim API")?;

    if !response.status().is_success() {
        bail!("Nominatim API returned error status: {}", response.status());
    }

    let results: Vec<NominatimResult> = response
        .json()
        .context("Failed to parse Nominatim JSON response")?;

    parse_first_result(results, query)
}
