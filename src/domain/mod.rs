pub mod mode;
pub mod poi;
pub mod point;
pub mod polygon;
pub mod route;
pub mod sample;

pub use mode::TravelMode;
pub use poi::{Poi, PoiType, reachability_score};
pub use point::GeoPoint;
pub use polygon::ReachabilityPolygon;
pub use route::{RouteInfo, RouteStep};
pub use sample::{SampleStatus, TravelSample};
