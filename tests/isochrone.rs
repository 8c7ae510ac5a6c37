use std::sync::Mutex;

use isochrone_explorer::api::{OracleError, TravelTimeOracle};
use isochrone_explorer::domain::{GeoPoint, TravelMode, TravelSample};
use isochrone_explorer::geometry::{convex_hull, haversine_m};
use isochrone_explorer::isochrone::{
    EstimatorConfig, IsochroneEstimator, IsochroneRequest, IsochroneSession, Outcome,
};
use isochrone_explorer::output::{MapLayers, to_feature_collection, write_geojson};

const SF: GeoPoint = GeoPoint::new(37.7749, -122.4194);

/// Answers "ok" for anything within `radius_m` of the origin, "unknown" beyond
struct DiskOracle {
    radius_m: f64,
    speed_m_per_hour: f64,
    modes_seen: Mutex<Vec<TravelMode>>,
}

impl DiskOracle {
    fn new(radius_m: f64) -> Self {
        Self {
            radius_m,
            speed_m_per_hour: 5_000.0,
            modes_seen: Mutex::new(Vec::new()),
        }
    }
}

impl TravelTimeOracle for DiskOracle {
    fn travel_times(
        &self,
        origin: GeoPoint,
        destinations: &[GeoPoint],
        mode: TravelMode,
    ) -> Result<Vec<TravelSample>, OracleError> {
        self.modes_seen.lock().unwrap().push(mode);
        Ok(destinations
            .iter()
            .map(|&d| {
                let meters = haversine_m(origin, d);
                if meters <= self.radius_m {
                    TravelSample::ok(d, meters / self.speed_m_per_hour * 3600.0)
                } else {
                    TravelSample::unknown(d)
                }
            })
            .collect())
    }
}

#[test]
fn walking_fifteen_minutes_stays_inside_one_kilometer() {
    let estimator = IsochroneEstimator::new(DiskOracle::new(1000.0), EstimatorConfig::default());
    let request = IsochroneRequest::new(SF, TravelMode::Walking, 15.0);

    let polygon = estimator.estimate(&request).unwrap();

    assert!(polygon.len() >= 3);
    for &p in polygon.ring() {
        assert!(haversine_m(SF, p) <= 1050.0, "{p} is too far from origin");
    }
    // Grid spacing is 125m, so the hull should reach well past 800m
    assert!(polygon.max_distance_m(SF) > 800.0);
    assert!(polygon.contains(SF));

    let modes = estimator.oracle().modes_seen.lock().unwrap();
    assert_eq!(modes.len(), 16);
    assert!(modes.iter().all(|&m| m == TravelMode::Walking));
}

#[test]
fn hull_is_deterministic_across_concurrency_settings() {
    let request = IsochroneRequest::new(SF, TravelMode::Running, 12.0);

    let sequential = IsochroneEstimator::new(
        DiskOracle::new(1500.0),
        EstimatorConfig {
            max_concurrent_batches: 1,
            ..EstimatorConfig::default()
        },
    );
    let parallel = IsochroneEstimator::new(
        DiskOracle::new(1500.0),
        EstimatorConfig {
            max_concurrent_batches: 16,
            batch_size: 7,
            ..EstimatorConfig::default()
        },
    );

    assert_eq!(
        sequential.estimate(&request).unwrap(),
        parallel.estimate(&request).unwrap()
    );
}

#[test]
fn hull_of_polygon_ring_is_itself() {
    let estimator = IsochroneEstimator::new(DiskOracle::new(2000.0), EstimatorConfig::default());
    let polygon = estimator
        .estimate(&IsochroneRequest::new(SF, TravelMode::Bicycling, 10.0))
        .unwrap();

    assert_eq!(convex_hull(polygon.ring()), polygon.ring());
    assert_eq!(polygon.distortion_factor, 0.8);
}

#[test]
fn session_result_written_as_geojson() {
    let estimator = IsochroneEstimator::new(DiskOracle::new(1000.0), EstimatorConfig::default());
    let session = IsochroneSession::new();

    let outcome = session
        .run(&estimator, &IsochroneRequest::new(SF, TravelMode::Walking, 15.0))
        .unwrap();
    let Outcome::Completed(polygon) = outcome else {
        panic!("computation should not be superseded");
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("walk.geojson");
    let layers = MapLayers {
        origin: SF,
        polygon: &polygon,
        route: None,
        pois: &[],
    };
    write_geojson(&path, &to_feature_collection(&layers)).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let ring = value["features"][1]["geometry"]["coordinates"][0]
        .as_array()
        .unwrap();
    assert_eq!(ring.len(), polygon.len() + 1);
    assert_eq!(value["features"][1]["properties"]["time_minutes"], 15.0);
}
