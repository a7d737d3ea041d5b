use serde::{Deserialize, Serialize};
use utility::geo::{polyline_length_km, BoundingRegion, Coordinate};

/// Ordered coordinates of a route.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    #[serde(with = "utility::serde::lat_lng_pairs")]
    points: Vec<Coordinate>,
}

/// A route must keep at least its two endpoints.
pub const MIN_COMPLETE_POINTS: usize = 2;

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A path with fewer than two points can not be turned into a walk.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= MIN_COMPLETE_POINTS
    }

    pub fn get(&self, index: usize) -> Option<Coordinate> {
        self.points.get(index).copied()
    }

    pub fn first(&self) -> Option<Coordinate> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Coordinate> {
        self.points.last().copied()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    pub fn is_endpoint(&self, index: usize) -> bool {
        index == 0 || Some(index) == self.last_index()
    }

    pub fn append(&mut self, point: Coordinate) {
        self.points.push(point);
    }

    /// Inserts before `index`. `index == len()` appends.
    pub fn insert_at(&mut self, index: usize, point: Coordinate) -> bool {
        if index > self.points.len() {
            return false;
        }
        self.points.insert(index, point);
        true
    }

    pub fn replace_at(&mut self, index: usize, point: Coordinate) -> bool {
        match self.points.get_mut(index) {
            Some(slot) => {
                *slot = point;
                true
            }
            None => false,
        }
    }

    /// Removes a vertex unless that would leave fewer than two points.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if self.points.len() <= MIN_COMPLETE_POINTS || index >= self.points.len() {
            return false;
        }
        self.points.remove(index);
        true
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Midpoint of the segment between vertex `segment` and `segment + 1`.
    pub fn midpoint(&self, segment: usize) -> Option<Coordinate> {
        let a = self.points.get(segment)?;
        let b = self.points.get(segment + 1)?;
        Some(a.midpoint(b))
    }

    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    pub fn length_km(&self) -> f64 {
        polyline_length_km(&self.points)
    }

    pub fn length_m(&self) -> f64 {
        self.length_km() * 1000.0
    }

    pub fn bounding_region(&self) -> Option<BoundingRegion> {
        BoundingRegion::from_points(&self.points)
    }
}

impl From<Vec<Coordinate>> for Path {
    fn from(points: Vec<Coordinate>) -> Self {
        Self { points }
    }
}

impl FromIterator<Coordinate> for Path {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Path {
        Path::from(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(0.01, 0.0),
            Coordinate::new(0.01, 0.01),
        ])
    }

    #[test]
    fn length_is_sum_of_segments() {
        let path = triangle();
        let points = path.points();
        let expected =
            points[0].distance_m(&points[1]) + points[1].distance_m(&points[2]);
        assert!((path.length_m() - expected).abs() < 1e-6);
        assert!(path.length_m() >= 0.0);
        assert_eq!(Path::new().length_m(), 0.0);
    }

    #[test]
    fn remove_keeps_two_points() {
        let mut path = triangle();
        assert!(path.remove_at(1));
        assert_eq!(path.len(), 2);
        let before = path.clone();
        assert!(!path.remove_at(0));
        assert!(!path.remove_at(1));
        assert_eq!(path, before);
    }

    #[test]
    fn out_of_range_edits_are_rejected() {
        let mut path = triangle();
        assert!(!path.remove_at(7));
        assert!(!path.replace_at(3, Coordinate::new(1.0, 1.0)));
        assert!(!path.insert_at(4, Coordinate::new(1.0, 1.0)));
        assert!(path.insert_at(3, Coordinate::new(1.0, 1.0)));
        assert_eq!(path.last(), Some(Coordinate::new(1.0, 1.0)));
    }

    #[test]
    fn midpoints_and_endpoints() {
        let path = triangle();
        assert_eq!(path.midpoint(0), Some(Coordinate::new(0.005, 0.0)));
        assert_eq!(path.midpoint(2), None);
        assert_eq!(path.segment_count(), 2);
        assert!(path.is_endpoint(0));
        assert!(!path.is_endpoint(1));
        assert!(path.is_endpoint(2));
    }

    #[test]
    fn completeness() {
        let mut path = Path::new();
        assert!(!path.is_complete());
        path.append(Coordinate::new(1.0, 1.0));
        assert!(!path.is_complete());
        path.append(Coordinate::new(1.0, 2.0));
        assert!(path.is_complete());
    }

    #[test]
    fn bounding_region_of_path() {
        let region = triangle().bounding_region().unwrap();
        assert_eq!(region.north_east, Coordinate::new(0.01, 0.01));
        assert!(Path::new().bounding_region().is_none());
    }
}
