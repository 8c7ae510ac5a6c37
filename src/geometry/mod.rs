pub mod distance;
pub mod grid;
pub mod hull;
pub mod projection;

pub use distance::haversine_m;
pub use grid::{SamplingGrid, estimate_radius_m, generate_grid};
pub use hull::{convex_hull, cross};
pub use projection::{METERS_PER_DEGREE, Projector, wrap_longitude};
