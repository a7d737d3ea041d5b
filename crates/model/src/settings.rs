use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapStyle {
    #[default]
    Voyager,
    Dark,
    Sat,
    Topo,
    Transit,
}

impl MapStyle {
    pub fn tile_url(&self) -> &'static str {
        match self {
            MapStyle::Voyager => {
                "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png"
            }
            MapStyle::Dark => "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
            MapStyle::Sat => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            MapStyle::Topo => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            MapStyle::Transit => "https://tile.memomaps.de/tilegen/{z}/{x}/{y}.png",
        }
    }
}
