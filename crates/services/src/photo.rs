use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use utility::geo::Coordinate;

use crate::{client::ApiClient, ApiError};

/// Search radius around the coordinate, in meters.
pub const GEOSEARCH_RADIUS_M: u32 = 500;

/// Finds a representative picture near a coordinate. Finding nothing is not
/// an error.
#[async_trait]
pub trait PhotoService: Send + Sync {
    async fn photo_near(&self, at: Coordinate) -> Result<Option<String>, ApiError>;
}

#[derive(Debug, Deserialize)]
struct GeoSearchHit {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct GeoSearchQuery {
    #[serde(default)]
    geosearch: Vec<GeoSearchHit>,
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    query: Option<GeoSearchQuery>,
}

#[derive(Debug, Deserialize)]
struct Original {
    source: String,
}

#[derive(Debug, Deserialize)]
struct Page {
    original: Option<Original>,
}

#[derive(Debug, Default, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: HashMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct PageImagesResponse {
    #[serde(default)]
    query: Option<PagesQuery>,
}

fn first_title(response: GeoSearchResponse) -> Option<String> {
    response
        .query?
        .geosearch
        .into_iter()
        .next()
        .map(|hit| hit.title)
}

fn original_source(response: PageImagesResponse) -> Option<String> {
    response
        .query?
        .pages
        .into_values()
        .find_map(|page| page.original)
        .map(|original| original.source)
}

/// Looks up the nearest Wikipedia article and takes its lead image.
pub struct WikipediaPhotos {
    client: ApiClient,
    api_url: String,
}

impl WikipediaPhotos {
    pub fn new<S: Into<String>>(client: ApiClient, api_url: S) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }
}

#[async_trait]
impl PhotoService for WikipediaPhotos {
    async fn photo_near(&self, at: Coordinate) -> Result<Option<String>, ApiError> {
        let search: GeoSearchResponse = self
            .client
            .get(
                &self.api_url,
                &[
                    ("action", "query".to_owned()),
                    ("list", "geosearch".to_owned()),
                    ("gsradius", GEOSEARCH_RADIUS_M.to_string()),
                    ("gscoord", format!("{}|{}", at.latitude, at.longitude)),
                    ("format", "json".to_owned()),
                    ("origin", "*".to_owned()),
                ],
            )
            .await?;
        let Some(title) = first_title(search) else {
            return Ok(None);
        };

        let images: PageImagesResponse = self
            .client
            .get(
                &self.api_url,
                &[
                    ("action", "query".to_owned()),
                    ("prop", "pageimages".to_owned()),
                    ("format", "json".to_owned()),
                    ("piprop", "original".to_owned()),
                    ("titles", title),
                    ("origin", "*".to_owned()),
                ],
            )
            .await?;
        Ok(original_source(images))
    }
}
