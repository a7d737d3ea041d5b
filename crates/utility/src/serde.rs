/// Serializes a list of coordinates as `[[lat, lng], ...]`, the compact form
/// used for walk paths in the stored journal.
pub mod lat_lng_pairs {
    use serde::{
        de::Error as DeError, ser::SerializeSeq, Deserialize, Deserializer,
        Serializer,
    };

    use crate::geo::Coordinate;

    pub fn serialize<S>(points: &[Coordinate], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(points.len()))?;
        for point in points {
            seq.serialize_element(&[point.latitude, point.longitude])?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Coordinate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pairs = Vec::<Vec<f64>>::deserialize(deserializer)?;
        pairs
            .into_iter()
            .map(|pair| match pair.as_slice() {
                [latitude, longitude] => Ok(Coordinate::new(*latitude, *longitude)),
                other => Err(D::Error::invalid_length(
                    other.len(),
                    &"Expected [latitude, longitude]",
                )),
            })
            .collect()
    }
}

/// Rounds to a fixed number of decimals, the precision values are stored and
/// displayed with.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
