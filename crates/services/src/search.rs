use async_trait::async_trait;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use utility::geo::Coordinate;

use crate::{client::ApiClient, ApiError};

/// Free text place search. Candidates come best match first.
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, text: &str) -> Result<Vec<Coordinate>, ApiError>;
}

#[serde_as]
#[derive(Debug, Deserialize)]
struct Place {
    #[serde_as(as = "DisplayFromStr")]
    lat: f64,
    #[serde_as(as = "DisplayFromStr")]
    lon: f64,
}

impl From<Place> for Coordinate {
    fn from(place: Place) -> Self {
        Coordinate::new(place.lat, place.lon)
    }
}

pub struct Nominatim {
    client: ApiClient,
    base_url: String,
}

impl Nominatim {
    pub fn new<S: Into<String>>(client: ApiClient, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl PlaceSearch for Nominatim {
    async fn search(&self, text: &str) -> Result<Vec<Coordinate>, ApiError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let places: Vec<Place> = self
            .client
            .get(
                &url,
                &[("format", "json".to_owned()), ("q", text.to_owned())],
            )
            .await?;
        Ok(places.into_iter().map(Coordinate::from).collect())
    }
}
