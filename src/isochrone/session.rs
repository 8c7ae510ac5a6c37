use log::debug;
use std::sync::{Mutex, PoisonError};

use super::IsochroneError;
use super::estimator::{IsochroneEstimator, IsochroneRequest};
use crate::api::TravelTimeOracle;
use crate::domain::ReachabilityPolygon;

/// Identifies one computation within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Result of a computation as seen by the session
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(ReachabilityPolygon),
    /// A newer computation started (or the caller cancelled) before this one
    /// finished; its result was discarded.
    Superseded,
}

#[derive(Debug, Default)]
struct SessionState {
    generation: u64,
    latest: Option<ReachabilityPolygon>,
}

/// Caller-owned record of the current computation and its last result.
///
/// Starting a computation supersedes every earlier one. Results from
/// superseded computations never touch the stored polygon.
#[derive(Debug, Default)]
pub struct IsochroneSession {
    state: Mutex<SessionState>,
}

impl IsochroneSession {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a computation, superseding any in flight
    pub fn begin(&self) -> Ticket {
        let mut state = self.state();
        state.generation += 1;
        Ticket(state.generation)
    }

    /// Abandon whatever is in flight without starting anything new
    pub fn cancel(&self) {
        self.state().generation += 1;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.state().generation == ticket.0
    }

    /// Store `polygon` if `ticket` is still the current computation
    pub fn publish(&self, ticket: Ticket, polygon: ReachabilityPolygon) -> Outcome {
        let mut state = self.state();
        if state.generation != ticket.0 {
            debug!(
                "discarding result of computation {} (current is {})",
                ticket.0, state.generation
            );
            return Outcome::Superseded;
        }
        state.latest = Some(polygon.clone());
        Outcome::Completed(polygon)
    }

    /// Last polygon published by a current computation
    pub fn latest(&self) -> Option<ReachabilityPolygon> {
        self.state().latest.clone()
    }

    /// Run one computation under a fresh ticket.
    ///
    /// Errors from a computation that has since been superseded are
    /// swallowed the same way its results would be.
    pub fn run<O: TravelTimeOracle>(
        &self,
        estimator: &IsochroneEstimator<O>,
        request: &IsochroneRequest,
    ) -> Result<Outcome, IsochroneError> {
        let ticket = self.begin();
        match estimator.estimate(request) {
            Ok(polygon) => Ok(self.publish(ticket, polygon)),
            Err(_) if !self.is_current(ticket) => Ok(Outcome::Superseded),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OracleError;
    use crate::domain::{GeoPoint, TravelMode, TravelSample};
    use crate::isochrone::EstimatorConfig;
    use std::sync::atomic::{AtomicBool, Ordering};

    const SF: GeoPoint = GeoPoint::new(37.7749, -122.4194);

    /// Everything reachable in a minute; optionally starts a new
    /// computation on the session mid-flight
    struct InterruptingOracle<'a> {
        session: &'a IsochroneSession,
        interrupt: AtomicBool,
        fail: bool,
    }

    impl TravelTimeOracle for InterruptingOracle<'_> {
        fn travel_times(
            &self,
            _origin: GeoPoint,
            destinations: &[GeoPoint],
            _mode: TravelMode,
        ) -> Result<Vec<TravelSample>, OracleError> {
            if self.interrupt.swap(false, Ordering::SeqCst) {
                self.session.begin();
            }
            if self.fail {
                return Err(OracleError::Malformed("boom".to_string()));
            }
            Ok(destinations
                .iter()
                .map(|&d| TravelSample::ok(d, 60.0))
                .collect())
        }
    }

    fn request() -> IsochroneRequest {
        IsochroneRequest::new(SF, TravelMode::Walking, 10.0)
    }

    fn estimator(session: &IsochroneSession, interrupt: bool, fail: bool) -> IsochroneEstimator<InterruptingOracle<'_>> {
        let oracle = InterruptingOracle {
            session,
            interrupt: AtomicBool::new(interrupt),
            fail,
        };
        IsochroneEstimator::new(oracle, EstimatorConfig::default())
    }

    #[test]
    fn test_completed_run_is_published() {
        let session = IsochroneSession::new();
        let outcome = session.run(&estimator(&session, false, false), &request()).unwrap();

        let Outcome::Completed(polygon) = outcome else {
            panic!("expected a completed computation");
        };
        assert_eq!(session.latest(), Some(polygon));
    }

    #[test]
    fn test_superseded_run_is_discarded() {
        let session = IsochroneSession::new();
        let first = session.run(&estimator(&session, false, false), &request()).unwrap();
        assert!(matches!(first, Outcome::Completed(_)));
        let before = session.latest();

        let second = session.run(&estimator(&session, true, false), &request()).unwrap();
        assert_eq!(second, Outcome::Superseded);
        assert_eq!(session.latest(), before);
    }

    #[test]
    fn test_superseded_failure_is_not_reported() {
        let session = IsochroneSession::new();
        let outcome = session.run(&estimator(&session, true, true), &request()).unwrap();
        assert_eq!(outcome, Outcome::Superseded);
        assert!(session.latest().is_none());
    }

    #[test]
    fn test_current_failure_is_reported() {
        let session = IsochroneSession::new();
        let result = session.run(&estimator(&session, false, true), &request());
        assert!(matches!(result, Err(IsochroneError::Oracle { batch: 0, .. })));
    }

    #[test]
    fn test_cancel_invalidates_ticket() {
        let session = IsochroneSession::new();
        let ticket = session.begin();
        session.cancel();
        assert!(!session.is_current(ticket));

        let polygon = ReachabilityPolygon::empty(10.0, TravelMode::Walking);
        assert_eq!(session.publish(ticket, polygon), Outcome::Superseded);
        assert!(session.latest().is_none());
    }
}
