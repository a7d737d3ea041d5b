use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};
use services::Endpoints;

pub const DEFAULT_STORE_PATH: &str = "geojournal_v11.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalConfig {
    pub store_path: PathBuf,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            store_path: DEFAULT_STORE_PATH.into(),
            endpoints: Endpoints::default(),
        }
    }
}

impl JournalConfig {
    /// `GEOJOURNAL_STORE` names the journal file; endpoints come from
    /// `Endpoints::env`.
    pub fn from_env() -> Self {
        Self {
            store_path: env::var_os("GEOJOURNAL_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|| DEFAULT_STORE_PATH.into()),
            endpoints: Endpoints::env(),
        }
    }
}
