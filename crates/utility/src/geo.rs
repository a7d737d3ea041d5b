use serde::{Deserialize, Serialize};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// A point on the earth surface in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        haversine_distance(
            self.latitude,
            self.longitude,
            other.latitude,
            other.longitude,
        )
    }

    pub fn distance_m(&self, other: &Coordinate) -> f64 {
        self.distance_km(other) * 1000.0
    }

    /// Linear interpolation of latitude and longitude. `fraction` 0 yields
    /// `self`, 1 yields `other`.
    pub fn interpolate(&self, other: &Coordinate, fraction: f64) -> Coordinate {
        Coordinate::new(
            self.latitude + (other.latitude - self.latitude) * fraction,
            self.longitude + (other.longitude - self.longitude) * fraction,
        )
    }

    pub fn midpoint(&self, other: &Coordinate) -> Coordinate {
        Coordinate::new(
            (self.latitude + other.latitude) / 2.0,
            (self.longitude + other.longitude) / 2.0,
        )
    }
}

/// Axis aligned region in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl BoundingRegion {
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut region = BoundingRegion {
            south_west: *first,
            north_east: *first,
        };
        for point in points {
            region.south_west.latitude = region.south_west.latitude.min(point.latitude);
            region.south_west.longitude =
                region.south_west.longitude.min(point.longitude);
            region.north_east.latitude = region.north_east.latitude.max(point.latitude);
            region.north_east.longitude =
                region.north_east.longitude.max(point.longitude);
        }
        Some(region)
    }

    /// Region spanning `radius_km` around `center` in every direction.
    pub fn around(center: Coordinate, radius_km: f64) -> Self {
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(center.latitude, center.longitude, radius_km);
        Self {
            south_west: Coordinate::new(min_lat, min_lon),
            north_east: Coordinate::new(max_lat, max_lon),
        }
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        (self.south_west.latitude..=self.north_east.latitude).contains(&point.latitude)
            && (self.south_west.longitude..=self.north_east.longitude)
                .contains(&point.longitude)
    }

    pub fn center(&self) -> Coordinate {
        self.south_west.midpoint(&self.north_east)
    }
}

pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> ((f64, f64), (f64, f64)) {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);

    let min_lat = lat_rad - radius_km / EARTH_RADIUS_KM;
    let max_lat = lat_rad + radius_km / EARTH_RADIUS_KM;

    // longitude bounds widen with latitude
    let min_lon = lon_rad - radius_km / (EARTH_RADIUS_KM * lat_rad.cos());
    let max_lon = lon_rad + radius_km / (EARTH_RADIUS_KM * lat_rad.cos());

    (
        (to_degrees(min_lat), to_degrees(min_lon)),
        (to_degrees(max_lat), to_degrees(max_lon)),
    )
}

/// Haversine distance in kilometers.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Sum of great-circle distances between consecutive points, in kilometers.
pub fn polyline_length_km(points: &[Coordinate]) -> f64 {
    use itertools::Itertools as _;

    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.distance_km(b))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(1.0, 0.0);
        assert!((a.distance_km(&b) - 111.195).abs() < 0.01);
        assert_eq!(a.distance_km(&a), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let london = Coordinate::new(51.505, -0.09);
        let paris = Coordinate::new(48.8566, 2.3522);
        let there = london.distance_km(&paris);
        let back = paris.distance_km(&london);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 343.0).abs() < 5.0);
    }

    #[test]
    fn midpoint_is_arithmetic() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(11.0, 22.0);
        assert_eq!(a.midpoint(&b), Coordinate::new(10.5, 21.0));
        assert_eq!(a.interpolate(&b, 0.25), Coordinate::new(10.25, 20.5));
    }

    #[test]
    fn bounding_region_covers_all_points() {
        let points = [
            Coordinate::new(1.0, 5.0),
            Coordinate::new(-2.0, 7.0),
            Coordinate::new(0.5, 4.0),
        ];
        let region = BoundingRegion::from_points(&points).unwrap();
        assert_eq!(region.south_west, Coordinate::new(-2.0, 4.0));
        assert_eq!(region.north_east, Coordinate::new(1.0, 7.0));
        assert!(points.iter().all(|point| region.contains(point)));
        assert!(BoundingRegion::from_points(&[]).is_none());
    }

    #[test]
    fn region_around_point_contains_it() {
        let center = Coordinate::new(54.32, 10.13);
        let region = BoundingRegion::around(center, 1.0);
        assert!(region.contains(&center));
        let half_height = region.north_east.latitude - center.latitude;
        assert!((half_height - 0.008993).abs() < 1e-5);
    }

    #[test]
    fn polyline_length_sums_segments() {
        let points = [
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.0, 1.0),
            Coordinate::new(1.0, 1.0),
        ];
        let expected = points[0].distance_km(&points[1]) + points[1].distance_km(&points[2]);
        assert!((polyline_length_km(&points) - expected).abs() < 1e-9);
        assert_eq!(polyline_length_km(&points[..1]), 0.0);
    }
}
