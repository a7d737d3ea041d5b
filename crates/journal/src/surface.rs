use model::{color::Color, path::Path, EntryId};
use utility::geo::{BoundingRegion, Coordinate};

use crate::editor::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerId {
    Entry(EntryId),
    /// The walk being drawn.
    Draft,
}

/// Whatever draws the map. The session only pushes state into it.
pub trait MapSurface: Send {
    fn render_marker(&mut self, layer: LayerId, at: Coordinate, color: Color);
    fn render_polyline(&mut self, layer: LayerId, path: &Path, color: Color);
    /// Replaces all edit handles. An empty slice removes them.
    fn render_handles(&mut self, handles: &[Handle]);
    fn fit_view(&mut self, region: BoundingRegion);
    fn remove_layer(&mut self, layer: LayerId);
}

/// Draws the elevation profile of the selected walk.
pub trait ChartSurface: Send {
    /// `(distance km, elevation m)` pairs.
    fn render_series(&mut self, series: &[(f64, f64)]);
    fn destroy(&mut self);
}

/// Headless sessions draw nothing.
impl MapSurface for () {
    fn render_marker(&mut self, _: LayerId, _: Coordinate, _: Color) {}
    fn render_polyline(&mut self, _: LayerId, _: &Path, _: Color) {}
    fn render_handles(&mut self, _: &[Handle]) {}
    fn fit_view(&mut self, _: BoundingRegion) {}
    fn remove_layer(&mut self, _: LayerId) {}
}

impl ChartSurface for () {
    fn render_series(&mut self, _: &[(f64, f64)]) {}
    fn destroy(&mut self) {}
}
