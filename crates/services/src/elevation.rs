use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utility::geo::Coordinate;

use crate::{client::ApiClient, ApiError};

/// Answers one elevation in meters per requested point, in request order.
#[async_trait]
pub trait ElevationService: Send + Sync {
    async fn elevations(&self, points: &[Coordinate]) -> Result<Vec<f64>, ApiError>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Location {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Serialize)]
struct LookupRequest {
    locations: Vec<Location>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: f64,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    results: Vec<LookupResult>,
}

fn parse_lookup(requested: usize, response: LookupResponse) -> Result<Vec<f64>, ApiError> {
    if response.results.len() != requested {
        return Err(ApiError::LengthMismatch {
            requested,
            received: response.results.len(),
        });
    }
    Ok(response
        .results
        .into_iter()
        .map(|result| result.elevation)
        .collect())
}

/// Client for an Open-Elevation compatible `api/v1/lookup` endpoint.
pub struct OpenElevation {
    client: ApiClient,
    base_url: String,
}

impl OpenElevation {
    pub fn new<S: Into<String>>(client: ApiClient, base_url: S) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ElevationService for OpenElevation {
    async fn elevations(&self, points: &[Coordinate]) -> Result<Vec<f64>, ApiError> {
        if points.is_empty() {
            return Ok(Vec::new());
        }
        let request = LookupRequest {
            locations: points
                .iter()
                .map(|point| Location {
                    latitude: point.latitude,
                    longitude: point.longitude,
                })
                .collect(),
        };
        let url = format!("{}/api/v1/lookup", self.base_url.trim_end_matches('/'));
        let response: LookupResponse = self.client.post(&url, &request).await?;
        parse_lookup(points.len(), response)
    }
}
