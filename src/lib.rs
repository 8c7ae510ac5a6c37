//! isochrone-explorer - Estimate reachability polygons from a travel-time oracle

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod isochrone;
pub mod output;
