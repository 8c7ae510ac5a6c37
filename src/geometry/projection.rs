use crate::domain::GeoPoint;

/// Meters per degree of latitude in the planar approximation
pub const METERS_PER_DEGREE: f64 = 111_000.0;

/// Floor for cos(lat) so longitudes stay finite at the poles
const MIN_COS_LAT: f64 = 1e-9;

/// Wrap a longitude into [-180, 180]; in-range values pass through untouched
pub fn wrap_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Simple equirectangular projection from WGS84 to local meters
///
/// Uses approximation suitable for neighbourhood-scale areas:
/// - x = (lng - center_lng) * cos(center_lat) * 111000
/// - y = (lat - center_lat) * 111000
///
/// Good enough for drawing a reachability boundary a few km across;
/// not meant for precision routing.
#[derive(Debug, Clone)]
pub struct Projector {
    center: GeoPoint,
    cos_lat: f64,
}

impl Projector {
    /// Create a new projector centered at the given point
    pub fn new(center: GeoPoint) -> Self {
        Self {
            center,
            cos_lat: center.lat.to_radians().cos(),
        }
    }

    /// Project a point to local meters
    ///
    /// # Returns
    /// * (x, y) in meters east/north of the projection center
    pub fn project(&self, point: GeoPoint) -> (f64, f64) {
        let x = (point.lng - self.center.lng) * self.cos_lat * METERS_PER_DEGREE;
        let y = (point.lat - self.center.lat) * METERS_PER_DEGREE;
        (x, y)
    }

    /// Inverse of [`Projector::project`].
    ///
    /// Latitude is clamped to the poles and longitude wrapped into
    /// [-180, 180], so the result is always a valid coordinate even when
    /// the offset runs over a pole or the antimeridian.
    pub fn unproject(&self, x: f64, y: f64) -> GeoPoint {
        let lat = (self.center.lat + y / METERS_PER_DEGREE).clamp(-90.0, 90.0);
        let lng = self.center.lng + x / (METERS_PER_DEGREE * self.cos_lat.max(MIN_COS_LAT));
        GeoPoint::new(lat, wrap_longitude(lng))
    }
}
