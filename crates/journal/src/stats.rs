use itertools::Itertools as _;
use model::{path::Path, walk::Walk};
use serde::Serialize;
use utility::serde::round_to;

/// Walking pace the duration estimate assumes.
pub const PACE_KM_PER_HOUR: f64 = 3.0;

/// Figures shown for a route. Distance always matches the current geometry;
/// the elevation figures come from the last sampling and may lag behind
/// while `elevation_fresh` is false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub distance_km: f64,
    pub estimated_duration_minutes: u32,
    pub ascent_m: f64,
    pub descent_m: f64,
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub elevation_fresh: bool,
}

impl RouteStats {
    pub fn of_path(path: &Path, elevation: Option<&[f64]>) -> Self {
        let distance_km = path.length_km();
        let (ascent_m, descent_m) = elevation.map(ascent_descent).unwrap_or_default();
        let samples = elevation.unwrap_or_default();
        Self {
            distance_km: round_to(distance_km, 2),
            estimated_duration_minutes: estimated_minutes(distance_km),
            ascent_m,
            descent_m,
            min_elevation: samples.iter().copied().reduce(f64::min),
            max_elevation: samples.iter().copied().reduce(f64::max),
            elevation_fresh: elevation.is_some(),
        }
    }

    /// Uses the walk's cached samples even when stale, flagging them as such.
    pub fn of_walk(walk: &Walk) -> Self {
        Self {
            elevation_fresh: walk.fresh_elevation().is_some(),
            ..Self::of_path(&walk.path, walk.elevation.as_deref())
        }
    }

    pub fn distance_label(&self) -> String {
        format!("{:.2} km", self.distance_km)
    }

    pub fn duration_label(&self) -> String {
        let minutes = self.estimated_duration_minutes;
        if minutes < 60 {
            format!("{minutes} min")
        } else {
            format!("{} h {:02} min", minutes / 60, minutes % 60)
        }
    }
}

pub fn estimated_minutes(distance_km: f64) -> u32 {
    (distance_km / PACE_KM_PER_HOUR * 60.0).round() as u32
}

/// Total climb and total drop between consecutive samples.
pub fn ascent_descent(samples: &[f64]) -> (f64, f64) {
    samples
        .iter()
        .tuple_windows()
        .fold((0.0, 0.0), |(ascent, descent), (a, b)| {
            let delta = b - a;
            if delta > 0.0 {
                (ascent + delta, descent)
            } else {
                (ascent, descent - delta)
            }
        })
}
