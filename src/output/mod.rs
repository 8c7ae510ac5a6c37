pub mod geojson;

pub use geojson::{MapLayers, to_feature_collection, write_geojson};
