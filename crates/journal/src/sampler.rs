use std::fmt;

use itertools::Itertools as _;
use model::{path::Path, EntryId};
use services::{ApiError, ElevationService};
use tokio_util::sync::CancellationToken;
use utility::{geo::Coordinate, serde::round_to};

/// Spacing of elevation samples along a path, in meters.
pub const SAMPLE_STEP_M: f64 = 100.0;

/// Densifies a path so elevation is sampled at least every `step_m` meters.
///
/// Every segment contributes its start vertex followed by `floor(d / step_m)`
/// points spaced `step_m` apart; the last vertex closes the list. Segments
/// of zero length only contribute their start vertex.
pub fn resample(path: &Path, step_m: f64) -> Vec<Coordinate> {
    let points = path.points();
    let Some(last) = points.last() else {
        return Vec::new();
    };
    let mut samples = Vec::with_capacity(points.len());
    for (a, b) in points.iter().tuple_windows() {
        samples.push(*a);
        let distance = a.distance_m(b);
        let steps = (distance / step_m).floor() as usize;
        samples.extend((1..=steps).map(|step| a.interpolate(b, step as f64 * step_m / distance)));
    }
    samples.push(*last);
    samples
}

/// Running distance in kilometers at each sample, starting at zero.
pub fn cumulative_km(samples: &[Coordinate]) -> Vec<f64> {
    let mut total = 0.0;
    let mut distances = Vec::with_capacity(samples.len());
    distances.extend(samples.first().map(|_| 0.0));
    for (a, b) in samples.iter().tuple_windows() {
        total += a.distance_km(b);
        distances.push(total);
    }
    distances
}

/// `(distance km, elevation m)` pairs for the profile chart. `None` when the
/// samples do not belong to these points.
pub fn profile_series(samples: &[Coordinate], elevations: &[f64]) -> Option<Vec<(f64, f64)>> {
    if samples.len() != elevations.len() {
        return None;
    }
    Some(
        cumulative_km(samples)
            .into_iter()
            .map(|distance| round_to(distance, 1))
            .zip(elevations.iter().copied())
            .collect(),
    )
}

/// What an elevation request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationTarget {
    /// The walk currently being drawn.
    Draft,
    Walk(EntryId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One elevation lookup, ready to be executed off the session.
#[derive(Debug)]
pub struct SampleJob {
    pub generation: Generation,
    pub target: ElevationTarget,
    pub points: Vec<Coordinate>,
    cancel: CancellationToken,
}

impl SampleJob {
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the lookup. Yields `None` when the job was canceled first.
    pub async fn run(&self, service: &dyn ElevationService) -> Option<Result<Vec<f64>, ApiError>> {
        if self.cancel.is_cancelled() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = service.elevations(&self.points) => Some(result),
        }
    }
}

/// An answer that may be written into the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub target: ElevationTarget,
    pub expected_len: usize,
}

#[derive(Debug)]
struct InFlight {
    generation: Generation,
    target: ElevationTarget,
    expected_len: usize,
    cancel: CancellationToken,
}

/// Keeps at most one elevation request in flight. A new request cancels the
/// previous one, and answers are only accepted for the latest generation.
#[derive(Debug, Default)]
pub struct ElevationSampler {
    issued: u64,
    in_flight: Option<InFlight>,
}

impl ElevationSampler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self, target: ElevationTarget, path: &Path) -> SampleJob {
        self.cancel();
        self.issued += 1;
        let generation = Generation(self.issued);
        let points = resample(path, SAMPLE_STEP_M);
        let cancel = CancellationToken::new();
        log::debug!(
            "requesting {} elevation samples for {target:?} ({generation})",
            points.len()
        );
        self.in_flight = Some(InFlight {
            generation,
            target,
            expected_len: points.len(),
            cancel: cancel.clone(),
        });
        SampleJob {
            generation,
            target,
            points,
            cancel,
        }
    }

    /// Cancels whatever is in flight.
    pub fn cancel(&mut self) -> Option<ElevationTarget> {
        let in_flight = self.in_flight.take()?;
        in_flight.cancel.cancel();
        log::debug!(
            "canceled elevation request {} for {:?}",
            in_flight.generation,
            in_flight.target
        );
        Some(in_flight.target)
    }

    /// Cancels the request in flight only if it belongs to `target`.
    pub fn cancel_for(&mut self, target: ElevationTarget) -> bool {
        match &self.in_flight {
            Some(in_flight) if in_flight.target == target => self.cancel().is_some(),
            _ => false,
        }
    }

    /// Settles the request of `generation`. Answers for superseded or
    /// canceled requests yield `None` and must be dropped.
    pub fn complete(&mut self, generation: Generation) -> Option<Accepted> {
        match &self.in_flight {
            Some(in_flight) if in_flight.generation == generation => {
                let in_flight = self.in_flight.take()?;
                Some(Accepted {
                    target: in_flight.target,
                    expected_len: in_flight.expected_len,
                })
            }
            _ => None,
        }
    }

    pub fn in_flight(&self) -> Option<(Generation, ElevationTarget)> {
        self.in_flight
            .as_ref()
            .map(|in_flight| (in_flight.generation, in_flight.target))
    }
}
