use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};
use utility::{geo::Coordinate, serde::round_to};

use crate::{color::Color, path::Path, EntryId};

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Walk {
    pub id: EntryId,
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(default)]
    pub rating: u8,
    pub path: Path,
    /// Cached path length, rounded to two decimals. Older journals stored
    /// this as a string.
    #[serde(rename = "dist", default)]
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    pub distance_km: f64,
    #[serde(default)]
    pub color: Color,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// One sample per resampled point of `path`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<Vec<f64>>,
    /// Set when `path` changed after `elevation` was sampled.
    #[serde(default)]
    pub elevation_stale: bool,
}

impl Walk {
    /// First point of the path, used to place the walk in listings.
    pub fn start(&self) -> Option<Coordinate> {
        self.path.first()
    }

    pub fn refresh_distance(&mut self) {
        self.distance_km = round_to(self.path.length_km(), 2);
    }

    /// Marks the cached samples as no longer matching the path.
    pub fn invalidate_elevation(&mut self) {
        self.elevation_stale = self.elevation.is_some();
    }

    pub fn store_elevation(&mut self, samples: Vec<f64>) {
        self.elevation = Some(samples);
        self.elevation_stale = false;
    }

    pub fn fresh_elevation(&self) -> Option<&[f64]> {
        if self.elevation_stale {
            return None;
        }
        self.elevation.as_deref()
    }
}
