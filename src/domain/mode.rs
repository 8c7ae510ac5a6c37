use serde::{Deserialize, Serialize};

/// Travel mode for an isochrone request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Walking,
    Bicycling,
    Running,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [
        TravelMode::Walking,
        TravelMode::Bicycling,
        TravelMode::Running,
    ];

    /// Rough average speed in meters per hour, used to size the sampling grid
    pub fn default_speed_m_per_hour(self) -> f64 {
        match self {
            TravelMode::Walking => 5_000.0,
            TravelMode::Running => 10_000.0,
            TravelMode::Bicycling => 15_000.0,
        }
    }

    /// Visual distortion hint handed to the renderer with the polygon
    pub fn distortion_factor(self) -> f64 {
        match self {
            TravelMode::Walking => 1.2,
            TravelMode::Bicycling => 0.8,
            TravelMode::Running => 1.0,
        }
    }

    /// Mode name understood by the routing APIs.
    ///
    /// There is no running mode upstream, so running is routed as walking.
    pub fn api_name(self) -> &'static str {
        match self {
            TravelMode::Walking | TravelMode::Running => "walking",
            TravelMode::Bicycling => "bicycling",
        }
    }

    pub fn avoids_highways(self) -> bool {
        matches!(self, TravelMode::Walking | TravelMode::Running)
    }

    /// Value for the `avoid` request parameter
    pub fn avoid_param(self) -> &'static str {
        if self.avoids_highways() {
            "tolls|highways"
        } else {
            "tolls"
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Running => "running",
        }
    }
}

impl std::fmt::Display for TravelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TravelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" => Ok(TravelMode::Walking),
            "bicycling" | "cycling" | "bike" => Ok(TravelMode::Bicycling),
            "running" | "run" => Ok(TravelMode::Running),
            other => Err(format!("unknown travel mode: {other}")),
        }
    }
}
