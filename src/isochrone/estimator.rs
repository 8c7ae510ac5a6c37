use log::{debug, info, warn};
use std::thread;

use super::IsochroneError;
use super::filter::filter_reachable;
use crate::api::{DEFAULT_BATCH_LIMIT, TravelTimeOracle};
use crate::config::{FileConfig, SpeedConfig, defaults};
use crate::domain::{GeoPoint, ReachabilityPolygon, TravelMode, TravelSample};
use crate::geometry::{SamplingGrid, convex_hull, generate_grid};

/// Tuning for one estimator
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Lattice points per side
    pub grid_size: usize,
    /// Destinations per oracle call, further capped by the oracle's own limit
    pub batch_size: usize,
    /// Oracle calls in flight at once
    pub max_concurrent_batches: usize,
    pub speeds: SpeedConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            grid_size: defaults::GRID_SIZE,
            batch_size: DEFAULT_BATCH_LIMIT,
            max_concurrent_batches: defaults::MAX_CONCURRENT_BATCHES,
            speeds: SpeedConfig::default(),
        }
    }
}

impl From<&FileConfig> for EstimatorConfig {
    fn from(config: &FileConfig) -> Self {
        Self {
            grid_size: config.grid_size,
            batch_size: config
                .maps
                .as_ref()
                .map(|m| m.batch_limit)
                .unwrap_or(DEFAULT_BATCH_LIMIT),
            max_concurrent_batches: config.max_concurrent_batches,
            speeds: config.speeds,
        }
    }
}

/// What to compute: who starts where, how, and for how long
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsochroneRequest {
    pub origin: GeoPoint,
    pub travel_mode: TravelMode,
    pub max_minutes: f64,
}

impl IsochroneRequest {
    pub fn new(origin: GeoPoint, travel_mode: TravelMode, max_minutes: f64) -> Self {
        Self {
            origin,
            travel_mode,
            max_minutes,
        }
    }
}

/// Grid, oracle, filter, hull.
pub struct IsochroneEstimator<O> {
    oracle: O,
    config: EstimatorConfig,
}

impl<O: TravelTimeOracle> IsochroneEstimator<O> {
    pub fn new(oracle: O, config: EstimatorConfig) -> Self {
        Self { oracle, config }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Effective destinations per oracle call
    pub fn batch_size(&self) -> usize {
        self.config.batch_size.min(self.oracle.batch_limit()).max(1)
    }

    fn validate(&self, request: &IsochroneRequest) -> Result<(), IsochroneError> {
        if !request.origin.is_valid() {
            return Err(IsochroneError::InvalidRequest(format!(
                "origin {} is not a valid coordinate",
                request.origin
            )));
        }
        if !request.max_minutes.is_finite() || request.max_minutes <= 0.0 {
            return Err(IsochroneError::InvalidRequest(format!(
                "time budget must be a positive number of minutes, got {}",
                request.max_minutes
            )));
        }
        let speed = self.config.speeds.speed_for(request.travel_mode);
        if !speed.is_finite() || speed <= 0.0 {
            return Err(IsochroneError::InvalidRequest(format!(
                "{} speed must be a positive number of meters per hour, got {}",
                request.travel_mode, speed
            )));
        }
        if self.config.grid_size == 0 {
            return Err(IsochroneError::InvalidRequest(
                "grid size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Candidate lattice for a request
    pub fn sampling_grid(&self, request: &IsochroneRequest) -> SamplingGrid {
        generate_grid(
            request.origin,
            request.max_minutes,
            self.config.speeds.speed_for(request.travel_mode),
            self.config.grid_size,
        )
    }

    /// Compute the reachability polygon for one request.
    ///
    /// Either every batch answers and a (possibly empty) polygon comes back,
    /// or the first failed batch's error is returned. No partial hulls.
    pub fn estimate(&self, request: &IsochroneRequest) -> Result<ReachabilityPolygon, IsochroneError> {
        self.validate(request)?;

        let grid = self.sampling_grid(request);
        debug!(
            "sampling {} points, radius {:.0}m, spacing {:.1}m",
            grid.points.len(),
            grid.radius_m,
            grid.spacing_m
        );

        let samples = self.collect_samples(request.origin, request.travel_mode, &grid.points)?;
        let reachable = filter_reachable(&samples, request.max_minutes);
        let ring = convex_hull(&reachable);
        let polygon = ReachabilityPolygon::new(ring, request.max_minutes, request.travel_mode);

        info!(
            "{} of {} candidates reachable within {} min ({}), boundary has {} points",
            reachable.len(),
            samples.len(),
            request.max_minutes,
            request.travel_mode,
            polygon.len()
        );
        Ok(polygon)
    }

    /// Query the oracle batch by batch, keeping at most
    /// `max_concurrent_batches` calls in flight.
    pub fn collect_samples(
        &self,
        origin: GeoPoint,
        mode: TravelMode,
        points: &[GeoPoint],
    ) -> Result<Vec<TravelSample>, IsochroneError> {
        let batches: Vec<&[GeoPoint]> = points.chunks(self.batch_size()).collect();
        let wave_size = self.config.max_concurrent_batches.max(1);
        let mut samples = Vec::with_capacity(points.len());

        for (wave_index, wave) in batches.chunks(wave_size).enumerate() {
            let first_batch = wave_index * wave_size;
            debug!(
                "dispatching batches {}..{} of {}",
                first_batch,
                first_batch + wave.len(),
                batches.len()
            );

            let results: Vec<_> = thread::scope(|scope| {
                let handles: Vec<_> = wave
                    .iter()
                    .map(|&batch| {
                        scope.spawn(move || self.oracle.travel_times(origin, batch, mode))
                    })
                    .collect();
                handles
                    .into_iter()
                    .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                    .collect()
            });

            for (offset, (batch, result)) in wave.iter().zip(results).enumerate() {
                let batch_samples = result.map_err(|source| IsochroneError::Oracle {
                    batch: first_batch + offset,
                    source,
                })?;
                samples.extend(align_samples(batch, batch_samples));
            }
        }

        Ok(samples)
    }
}

/// Pair each candidate with its sample by position; missing answers are unknown
fn align_samples(batch: &[GeoPoint], answers: Vec<TravelSample>) -> Vec<TravelSample> {
    if answers.len() != batch.len() {
        warn!(
            "oracle answered {} of {} destinations; treating the rest as unknown",
            answers.len().min(batch.len()),
            batch.len()
        );
    }
    batch
        .iter()
        .enumerate()
        .map(|(i, &point)| match answers.get(i) {
            Some(answer) => answer.at(point),
            None => TravelSample::unknown(point),
        })
        .collect()
}
