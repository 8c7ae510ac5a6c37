//! Square lattice of candidate destinations around an origin.

use super::Projector;
use crate::domain::GeoPoint;

/// Candidate points plus the lattice parameters they were built from
#[derive(Debug, Clone)]
pub struct SamplingGrid {
    pub points: Vec<GeoPoint>,
    /// Points per side
    pub size: usize,
    /// Estimated reachable radius in meters (lattice half-width)
    pub radius_m: f64,
    /// Distance between neighbouring lattice points in meters
    pub spacing_m: f64,
}

/// Distance covered in `max_minutes` at `speed_m_per_hour`
pub fn estimate_radius_m(max_minutes: f64, speed_m_per_hour: f64) -> f64 {
    (max_minutes / 60.0) * speed_m_per_hour
}

/// Build a `size` x `size` lattice around `origin`.
///
/// Spacing is `2 * radius / size`. Offsets run from `-size/2` to
/// `size/2 - 1` steps along each axis, so for even sizes the origin itself
/// is a lattice point. Rows are latitude, columns longitude.
pub fn generate_grid(
    origin: GeoPoint,
    max_minutes: f64,
    speed_m_per_hour: f64,
    size: usize,
) -> SamplingGrid {
    let radius_m = estimate_radius_m(max_minutes, speed_m_per_hour);
    if size == 0 {
        return SamplingGrid {
            points: Vec::new(),
            size,
            radius_m,
            spacing_m: 0.0,
        };
    }

    let spacing_m = radius_m * 2.0 / size as f64;
    let half = size as f64 / 2.0;
    let projector = Projector::new(origin);

    let mut points = Vec::with_capacity(size * size);
    for i in 0..size {
        let north = (i as f64 - half) * spacing_m;
        for j in 0..size {
            let east = (j as f64 - half) * spacing_m;
            points.push(projector.unproject(east, north));
        }
    }

    SamplingGrid {
        points,
        size,
        radius_m,
        spacing_m,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TravelMode;

    const SF: GeoPoint = GeoPoint::new(37.7749, -122.4194);

    #[test]
    fn test_grid_has_size_squared_points() {
        for mode in TravelMode::ALL {
            for size in [1, 5, 20, 21] {
                let grid = generate_grid(SF, 15.0, mode.default_speed_m_per_hour(), size);
                assert_eq!(grid.points.len(), size * size);
            }
        }
    }

    #[test]
    fn test_walking_fifteen_minutes() {
        let grid = generate_grid(SF, 15.0, 5_000.0, 20);
        assert!((grid.radius_m - 1250.0).abs() < 1e-9);
        assert!((grid.spacing_m - 125.0).abs() < 1e-9);
        assert!(grid.points.contains(&SF));
    }

    #[test]
    fn test_halving_budget_shrinks_spacing() {
        let full = generate_grid(SF, 30.0, 5_000.0, 20);
        let half = generate_grid(SF, 15.0, 5_000.0, 20);
        assert!(half.spacing_m < full.spacing_m);
        assert!((half.spacing_m * 2.0 - full.spacing_m).abs() < 1e-9);
    }

    #[test]
    fn test_grid_stays_within_radius_box() {
        let grid = generate_grid(SF, 20.0, 15_000.0, 20);
        let projector = Projector::new(SF);
        for p in &grid.points {
            let (x, y) = projector.project(*p);
            assert!(x.abs() <= grid.radius_m + 1e-6);
            assert!(y.abs() <= grid.radius_m + 1e-6);
        }
    }

    #[test]
    fn test_faster_mode_spans_wider() {
        let walk = generate_grid(SF, 15.0, TravelMode::Walking.default_speed_m_per_hour(), 20);
        let bike = generate_grid(SF, 15.0, TravelMode::Bicycling.default_speed_m_per_hour(), 20);
        assert!(bike.spacing_m > walk.spacing_m);
    }

    #[test]
    fn test_grid_at_pole_is_valid() {
        for origin in [GeoPoint::new(90.0, 0.0), GeoPoint::new(-89.999, 45.0)] {
            let grid = generate_grid(origin, 15.0, 5_000.0, 20);
            assert_eq!(grid.points.len(), 400);
            for p in &grid.points {
                assert!(p.is_valid(), "{p} out of range near {origin}");
            }
        }
    }

    #[test]
    fn test_grid_across_antimeridian_is_valid() {
        let origin = GeoPoint::new(0.0, 179.995);
        let grid = generate_grid(origin, 15.0, 5_000.0, 20);
        assert!(grid.points.iter().all(GeoPoint::is_valid));
        // Columns east of the line come back on the negative side
        assert!(grid.points.iter().any(|p| p.lng < -179.9));
        assert!(grid.points.contains(&origin));
    }

    #[test]
    fn test_empty_grid() {
        let grid = generate_grid(SF, 15.0, 5_000.0, 0);
        assert!(grid.points.is_empty());
    }
}
