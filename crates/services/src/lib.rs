use std::error;
use std::fmt;
use std::sync::Arc;

pub mod client;
pub mod elevation;
pub mod photo;
pub mod search;

pub use client::{ApiClient, Endpoints};
pub use elevation::{ElevationService, OpenElevation};
pub use photo::{PhotoService, WikipediaPhotos};
pub use search::{Nominatim, PlaceSearch};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    /// The service answered with a different number of values than asked for.
    LengthMismatch {
        requested: usize,
        received: usize,
    },
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response({}) {}", status_code, url),
            },
            ApiError::LengthMismatch {
                requested,
                received,
            } => write!(
                f,
                "Requested {} values but received {}.",
                requested, received
            ),
            ApiError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}
