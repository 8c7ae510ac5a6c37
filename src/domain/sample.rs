use super::GeoPoint;

/// Oracle verdict for a single destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStatus {
    Ok,
    Unknown,
}

/// A candidate point paired with the oracle's travel-time estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelSample {
    pub point: GeoPoint,
    /// Estimated travel duration in seconds. Meaningless unless `status` is `Ok`.
    pub duration_secs: f64,
    pub status: SampleStatus,
}

impl TravelSample {
    pub fn ok(point: GeoPoint, duration_secs: f64) -> Self {
        Self {
            point,
            duration_secs,
            status: SampleStatus::Ok,
        }
    }

    pub fn unknown(point: GeoPoint) -> Self {
        Self {
            point,
            duration_secs: 0.0,
            status: SampleStatus::Unknown,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == SampleStatus::Ok && self.duration_secs.is_finite()
    }

    /// Same verdict, attached to a different point
    pub fn at(self, point: GeoPoint) -> Self {
        Self { point, ..self }
    }
}
