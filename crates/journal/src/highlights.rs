use std::{fmt, str::FromStr};

use model::{catalog::Catalog, color::Color, Entry, EntryId, EntryKind, WithDistance};
use serde::Serialize;
use utility::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Pin,
    Walk,
}

impl TypeFilter {
    pub fn admits(&self, kind: EntryKind) -> bool {
        matches!(
            (self, kind),
            (TypeFilter::All, _)
                | (TypeFilter::Pin, EntryKind::Pin)
                | (TypeFilter::Walk, EntryKind::Walk)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Rating,
    Distance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption(String);

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown option '{}'", self.0)
    }
}

impl std::error::Error for UnknownOption {}

impl FromStr for TypeFilter {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "pin" | "pins" => Ok(TypeFilter::Pin),
            "walk" | "walks" => Ok(TypeFilter::Walk),
            _ => Err(UnknownOption(s.to_owned())),
        }
    }
}

impl FromStr for SortKey {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rating" => Ok(SortKey::Rating),
            "distance" => Ok(SortKey::Distance),
            _ => Err(UnknownOption(s.to_owned())),
        }
    }
}

/// Listing row for one catalog entry.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub rating: u8,
    pub color: Color,
    pub photo: Option<String>,
    /// The pin itself, or the start of the walk.
    pub coordinate: Option<Coordinate>,
}

impl From<&Entry> for Highlight {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id(),
            kind: entry.kind(),
            name: entry.name().to_owned(),
            rating: entry.rating(),
            color: entry.color(),
            photo: entry.photo().map(str::to_owned),
            coordinate: entry.coordinate(),
        }
    }
}

/// Filters and orders the catalog for listing.
///
/// Rating order is descending and keeps catalog order among equal ratings.
/// Distance order is ascending; entries without a known distance sort as
/// if they were at the origin.
pub fn rank(
    catalog: &Catalog,
    filter: TypeFilter,
    sort: SortKey,
    origin: Option<Coordinate>,
) -> Vec<WithDistance<Highlight>> {
    let mut ranked: Vec<WithDistance<Highlight>> = catalog
        .entries()
        .filter(|entry| filter.admits(entry.kind()))
        .map(|entry| {
            let highlight = Highlight::from(&entry);
            let distance_km = origin
                .zip(highlight.coordinate)
                .map(|(origin, at)| origin.distance_km(&at));
            WithDistance::new(distance_km, highlight)
        })
        .collect();

    match sort {
        SortKey::Rating => ranked.sort_by(|a, b| b.content.rating.cmp(&a.content.rating)),
        SortKey::Distance => ranked.sort_by(|a, b| {
            a.distance_km
                .unwrap_or(0.0)
                .total_cmp(&b.distance_km.unwrap_or(0.0))
        }),
    }
    ranked
}

/// "350 m" below one kilometer, "2.4 km" above.
pub fn distance_label(distance_km: f64) -> String {
    if distance_km < 1.0 {
        format!("{:.0} m", distance_km * 1000.0)
    } else {
        format!("{distance_km:.1} km")
    }
}

#[cfg(test)]
mod tests {
    use model::{path::Path, pin::Pin, walk::Walk};
    use utility::id::Id;

    use super::*;

    fn pin(id: i64, rating: u8, lat: f64, lng: f64) -> Pin {
        Pin {
            id: Id::new(id),
            name: format!("pin {id}"),
            description: String::new(),
            rating,
            coordinate: Coordinate::new(lat, lng),
            color: Color::default(),
            photo: None,
        }
    }

    fn walk(id: i64, rating: u8, points: Vec<Coordinate>) -> Walk {
        Walk {
            id: Id::new(id),
            name: format!("walk {id}"),
            description: String::new(),
            rating,
            path: Path::from(points),
            distance_km: 0.0,
            color: Color::Green,
            photo: None,
            elevation: None,
            elevation_stale: false,
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            pins: vec![pin(1, 1, 0.0, 0.03), pin(2, 5, 0.0, 0.01), pin(3, 3, 0.0, 0.02)],
            walks: vec![walk(
                4,
                3,
                vec![Coordinate::new(0.0, 0.005), Coordinate::new(0.0, 0.5)],
            )],
            ..Default::default()
        }
    }

    fn ids(ranked: &[WithDistance<Highlight>]) -> Vec<i64> {
        ranked.iter().map(|entry| entry.content.id.raw()).collect()
    }

    #[test]
    fn rating_order_is_descending_and_stable() {
        let ranked = rank(&catalog(), TypeFilter::All, SortKey::Rating, None);
        assert_eq!(ids(&ranked), vec![2, 3, 4, 1]);
        assert!(ranked.iter().all(|entry| entry.distance_km.is_none()));
    }

    #[test]
    fn distance_order_is_ascending() {
        let origin = Coordinate::new(0.0, 0.0);
        let ranked = rank(&catalog(), TypeFilter::All, SortKey::Distance, Some(origin));
        assert_eq!(ids(&ranked), vec![4, 2, 3, 1]);
        let distances: Vec<f64> = ranked.iter().filter_map(|entry| entry.distance_km).collect();
        assert_eq!(distances.len(), 4);
        assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn filter_by_type() {
        let pins = rank(&catalog(), TypeFilter::Pin, SortKey::Rating, None);
        assert_eq!(ids(&pins), vec![2, 3, 1]);
        let walks = rank(&catalog(), TypeFilter::Walk, SortKey::Rating, None);
        assert_eq!(ids(&walks), vec![4]);
        assert_eq!(walks[0].content.kind, EntryKind::Walk);
        assert_eq!(walks[0].content.coordinate, Some(Coordinate::new(0.0, 0.005)));
    }

    #[test]
    fn unknown_distance_sorts_first() {
        let mut catalog = catalog();
        catalog.walks.push(walk(5, 0, Vec::new()));
        let ranked = rank(
            &catalog,
            TypeFilter::All,
            SortKey::Distance,
            Some(Coordinate::new(0.0, 0.0)),
        );
        assert_eq!(ranked[0].content.id.raw(), 5);
        assert_eq!(ranked[0].distance_km, None);
    }

    #[test]
    fn empty_catalog_ranks_nothing() {
        assert!(rank(&Catalog::default(), TypeFilter::All, SortKey::Distance, None).is_empty());
    }

    #[test]
    fn options_parse_from_text() {
        assert_eq!("walks".parse::<TypeFilter>(), Ok(TypeFilter::Walk));
        assert_eq!("Distance".parse::<SortKey>(), Ok(SortKey::Distance));
        assert!("elevation".parse::<SortKey>().is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(distance_label(0.35), "350 m");
        assert_eq!(distance_label(2.44), "2.4 km");
    }

    #[test]
    fn rows_serialize_flat() {
        let ranked = rank(
            &catalog(),
            TypeFilter::Walk,
            SortKey::Distance,
            Some(Coordinate::new(0.0, 0.0)),
        );
        let json = serde_json::to_value(&ranked[0]).unwrap();
        assert_eq!(json["type"], "WALK");
        assert_eq!(json["id"], 4);
        assert!(json["distanceKm"].as_f64().is_some());
        assert!(json.get("photo").is_none());
    }
}
