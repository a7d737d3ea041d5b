use serde::{Deserialize, Serialize};
use utility::geo::Coordinate;

use crate::{color::Color, EntryId};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub id: EntryId,
    pub name: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(default)]
    pub rating: u8,
    #[serde(flatten)]
    pub coordinate: Coordinate,
    #[serde(default)]
    pub color: Color,
    pub photo: Option<String>,
}
