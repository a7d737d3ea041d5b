use journal::{
    editor::Handle,
    surface::{ChartSurface, LayerId, MapSurface},
};
use model::{color::Color, path::Path};
use utility::geo::{BoundingRegion, Coordinate};

/// Prints where the view would move. Layers are not drawn.
pub struct ConsoleMap;

impl MapSurface for ConsoleMap {
    fn render_marker(&mut self, _: LayerId, _: Coordinate, _: Color) {}
    fn render_polyline(&mut self, _: LayerId, _: &Path, _: Color) {}
    fn render_handles(&mut self, _: &[Handle]) {}

    fn fit_view(&mut self, region: BoundingRegion) {
        let center = region.center();
        println!(
            "view: {:.5},{:.5} (from {:.5},{:.5} to {:.5},{:.5})",
            center.latitude,
            center.longitude,
            region.south_west.latitude,
            region.south_west.longitude,
            region.north_east.latitude,
            region.north_east.longitude
        );
    }

    fn remove_layer(&mut self, _: LayerId) {}
}

/// Prints the elevation profile as a table with a bar per sample.
pub struct TextChart;

const BAR_WIDTH: f64 = 40.0;

impl ChartSurface for TextChart {
    fn render_series(&mut self, series: &[(f64, f64)]) {
        let lowest = series.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
        let highest = series
            .iter()
            .map(|(_, y)| *y)
            .fold(f64::NEG_INFINITY, f64::max);
        let span = (highest - lowest).max(1.0);
        for (distance, elevation) in series {
            let bar = ((elevation - lowest) / span * BAR_WIDTH).round() as usize;
            println!("{distance:>6.1} km {elevation:>7.1} m |{}", "#".repeat(bar));
        }
    }

    fn destroy(&mut self) {}
}
