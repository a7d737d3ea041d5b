use serde::{Deserialize, Serialize};

use crate::{
    color::Color,
    pin::Pin,
    settings::{MapStyle, Theme},
    walk::Walk,
    Entry, EntryId, MAX_RATING,
};

/// Everything the user recorded, stored as one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default)]
    pub pins: Vec<Pin>,
    #[serde(default)]
    pub walks: Vec<Walk>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub map_style: MapStyle,
    #[serde(default)]
    pub is_mobile: bool,
}

/// Metadata change for a pin or walk. Unset fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rating: Option<u8>,
    pub color: Option<Color>,
    pub photo: Option<String>,
}

impl EntryPatch {
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn photo<S: Into<String>>(mut self, photo: S) -> Self {
        self.photo = Some(photo.into());
        self
    }

    fn apply(
        self,
        name: &mut String,
        description: &mut String,
        rating: &mut u8,
        color: &mut Color,
        photo: &mut Option<String>,
    ) {
        if let Some(value) = self.name {
            *name = value;
        }
        if let Some(value) = self.description {
            *description = value;
        }
        if let Some(value) = self.rating {
            *rating = value.min(MAX_RATING);
        }
        if let Some(value) = self.color {
            *color = value;
        }
        if let Some(value) = self.photo {
            *photo = Some(value);
        }
    }
}

impl Catalog {
    pub fn contains(&self, id: EntryId) -> bool {
        self.pin(id).is_some() || self.walk(id).is_some()
    }

    /// Adds an entry. An entry whose id is already taken is refused.
    pub fn add(&mut self, entry: Entry) -> bool {
        if self.contains(entry.id()) {
            return false;
        }
        match entry {
            Entry::Pin(pin) => self.pins.push(pin),
            Entry::Walk(walk) => self.walks.push(walk),
        }
        true
    }

    pub fn remove(&mut self, id: EntryId) -> Option<Entry> {
        if let Some(index) = self.pins.iter().position(|pin| pin.id == id) {
            return Some(Entry::Pin(self.pins.remove(index)));
        }
        if let Some(index) = self.walks.iter().position(|walk| walk.id == id) {
            return Some(Entry::Walk(self.walks.remove(index)));
        }
        None
    }

    pub fn update(&mut self, id: EntryId, patch: EntryPatch) -> bool {
        if let Some(pin) = self.pin_mut(id) {
            patch.apply(
                &mut pin.name,
                &mut pin.description,
                &mut pin.rating,
                &mut pin.color,
                &mut pin.photo,
            );
            return true;
        }
        if let Some(walk) = self.walk_mut(id) {
            patch.apply(
                &mut walk.name,
                &mut walk.description,
                &mut walk.rating,
                &mut walk.color,
                &mut walk.photo,
            );
            return true;
        }
        false
    }

    pub fn get(&self, id: EntryId) -> Option<Entry> {
        self.pin(id)
            .cloned()
            .map(Entry::Pin)
            .or_else(|| self.walk(id).cloned().map(Entry::Walk))
    }

    pub fn pin(&self, id: EntryId) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.id == id)
    }

    pub fn pin_mut(&mut self, id: EntryId) -> Option<&mut Pin> {
        self.pins.iter_mut().find(|pin| pin.id == id)
    }

    pub fn walk(&self, id: EntryId) -> Option<&Walk> {
        self.walks.iter().find(|walk| walk.id == id)
    }

    pub fn walk_mut(&mut self, id: EntryId) -> Option<&mut Walk> {
        self.walks.iter_mut().find(|walk| walk.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = EntryId> + '_ {
        self.pins
            .iter()
            .map(|pin| pin.id)
            .chain(self.walks.iter().map(|walk| walk.id))
    }

    pub fn entries(&self) -> impl Iterator<Item = Entry> + '_ {
        self.pins
            .iter()
            .cloned()
            .map(Entry::Pin)
            .chain(self.walks.iter().cloned().map(Entry::Walk))
    }

    pub fn len(&self) -> usize {
        self.pins.len() + self.walks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
