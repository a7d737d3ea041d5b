use serde::Serialize;
use utility::{
    geo::Coordinate,
    id::{HasId, Id},
};

pub mod catalog;
pub mod color;
pub mod path;
pub mod pin;
pub mod settings;
pub mod walk;

use color::Color;
use pin::Pin;
use walk::Walk;

pub const MAX_RATING: u8 = 5;

pub type EntryId = Id<Entry>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    Pin,
    Walk,
}

/// A catalog entry of either kind. Pins and walks share one id space.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Pin(Pin),
    Walk(Walk),
}

impl HasId for Entry {
    type IdType = i64;
}

impl Entry {
    pub fn id(&self) -> EntryId {
        match self {
            Entry::Pin(pin) => pin.id,
            Entry::Walk(walk) => walk.id,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Pin(_) => EntryKind::Pin,
            Entry::Walk(_) => EntryKind::Walk,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Pin(pin) => &pin.name,
            Entry::Walk(walk) => &walk.name,
        }
    }

    pub fn rating(&self) -> u8 {
        match self {
            Entry::Pin(pin) => pin.rating,
            Entry::Walk(walk) => walk.rating,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Entry::Pin(pin) => pin.color,
            Entry::Walk(walk) => walk.color,
        }
    }

    pub fn photo(&self) -> Option<&str> {
        match self {
            Entry::Pin(pin) => pin.photo.as_deref(),
            Entry::Walk(walk) => walk.photo.as_deref(),
        }
    }

    /// Where the entry sits on the map: the pin itself or the start of a walk.
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Entry::Pin(pin) => Some(pin.coordinate),
            Entry::Walk(walk) => walk.start(),
        }
    }
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: Option<f64>,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: Option<f64>, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }
}
