use std::env;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::ApiError;

pub const OPEN_ELEVATION_URL: &str = "https://api.open-elevation.com";
pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_USER_AGENT: &str =
    concat!("geojournal/", env!("CARGO_PKG_VERSION"));

/// Where the lookup services live and how to reach them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoints {
    pub elevation_url: String,
    pub photo_url: String,
    pub search_url: String,
    pub user_agent: String,
    pub proxy: Option<String>,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            elevation_url: OPEN_ELEVATION_URL.to_owned(),
            photo_url: WIKIPEDIA_API_URL.to_owned(),
            search_url: NOMINATIM_URL.to_owned(),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            proxy: None,
        }
    }
}

impl Endpoints {
    /// Reads `GEOJOURNAL_*` variables, falling back to the public services.
    pub fn env() -> Self {
        let defaults = Self::default();
        Self {
            elevation_url: env::var("GEOJOURNAL_ELEVATION_URL")
                .unwrap_or(defaults.elevation_url),
            photo_url: env::var("GEOJOURNAL_PHOTO_URL").unwrap_or(defaults.photo_url),
            search_url: env::var("GEOJOURNAL_SEARCH_URL").unwrap_or(defaults.search_url),
            user_agent: env::var("GEOJOURNAL_USER_AGENT").unwrap_or(defaults.user_agent),
            proxy: env::var("GEOJOURNAL_PROXY").ok(),
        }
    }
}

/// Thin wrapper around one shared `reqwest::Client`.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(endpoints: &Endpoints) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(endpoints.user_agent.as_str());
        if let Some(proxy_url) = &endpoints.proxy {
            log::info!("Using proxy '{proxy_url}' for lookups.");
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        log::debug!("Requesting '{url}'.");
        let response = self.http.get(url).query(query).send().await?;
        Self::parse(url, response).await
    }

    pub async fn post<B, T>(&self, url: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("Posting to '{url}'.");
        let response = self.http.post(url).json(body).send().await?;
        Self::parse(url, response).await
    }

    async fn parse<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        match response.status() {
            reqwest::StatusCode::OK => {
                let text = response.text().await?;
                Ok(serde_json::from_str(&text)?)
            }
            other => Err(ApiError::InvalidResponse {
                status_code: other,
                url: url.to_owned(),
                response: response.text().await.ok(),
            }),
        }
    }
}
