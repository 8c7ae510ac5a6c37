//! Reachability estimation: sample a grid, ask the oracle, keep what is
//! reachable, wrap it in a hull.

pub mod estimator;
pub mod filter;
pub mod session;

use thiserror::Error;

use crate::api::OracleError;

pub use estimator::{EstimatorConfig, IsochroneEstimator, IsochroneRequest};
pub use filter::filter_reachable;
pub use session::{IsochroneSession, Outcome, Ticket};

#[derive(Debug, Error)]
pub enum IsochroneError {
    #[error("invalid isochrone request: {0}")]
    InvalidRequest(String),
    #[error("travel-time oracle failed on batch {batch}")]
    Oracle {
        batch: usize,
        #[source]
        source: OracleError,
    },
}
