use crate::domain::{GeoPoint, TravelSample};

/// Points the oracle reached within `max_minutes`.
///
/// Samples with an unknown status are dropped as unreachable rather than
/// failing the computation. Output follows input order, but nothing
/// downstream relies on that.
pub fn filter_reachable(samples: &[TravelSample], max_minutes: f64) -> Vec<GeoPoint> {
    samples
        .iter()
        .filter(|s| s.is_ok() && s.duration_secs / 60.0 <= max_minutes)
        .map(|s| s.point)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_only_ok_samples_within_budget() {
        let a = GeoPoint::new(37.78, -122.42);
        let b = GeoPoint::new(37.77, -122.41);
        let samples = vec![
            TravelSample::ok(a, 600.0),
            TravelSample::unknown(GeoPoint::new(37.76, -122.40)),
            TravelSample::ok(GeoPoint::new(37.79, -122.43), 960.0),
            TravelSample::ok(b, 900.0),
            TravelSample::unknown(GeoPoint::new(37.75, -122.39)),
        ];

        let reachable = filter_reachable(&samples, 15.0);
        assert_eq!(reachable, vec![a, b]);
    }

    #[test]
    fn test_non_finite_duration_is_unreachable() {
        let samples = vec![TravelSample::ok(GeoPoint::new(0.0, 0.0), f64::NAN)];
        assert!(filter_reachable(&samples, 15.0).is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_reachable(&[], 10.0).is_empty());
    }
}
