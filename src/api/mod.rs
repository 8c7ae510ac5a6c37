pub mod client;
pub mod directions;
pub mod distance_matrix;
pub mod nominatim;
pub mod oracle;
pub mod places;
pub mod polyline;

pub use client::GoogleMapsClient;
pub use nominatim::geocode;
pub use oracle::{DEFAULT_BATCH_LIMIT, OracleError, TravelTimeOracle};
pub use polyline::decode_polyline;
