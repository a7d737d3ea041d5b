use model::{
    catalog::{Catalog, EntryPatch},
    color::Color,
    path::Path,
    pin::Pin,
    settings::{MapStyle, Theme},
    walk::Walk,
    Entry, EntryId, WithDistance,
};
use services::ApiError;
use utility::{
    geo::{BoundingRegion, Coordinate},
    id::IdClock,
};

use crate::{
    editor::{EditOutcome, Handle, HandleRef, VertexEditor},
    highlights::{self, Highlight, SortKey, TypeFilter},
    sampler::{self, ElevationSampler, ElevationTarget, Generation, SampleJob, SAMPLE_STEP_M},
    stats::RouteStats,
    surface::{ChartSurface, LayerId, MapSurface},
};

/// Name given to entries confirmed without one.
pub const DEFAULT_NAME: &str = "Untitled";

/// Radius of the view fitted around a single coordinate, in kilometers.
pub const FOCUS_RADIUS_KM: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Explore,
    AddPin,
    DrawWalk,
}

/// Form contents when confirming a new pin or walk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryDraft {
    pub name: String,
    pub description: String,
    pub rating: u8,
    pub color: Color,
}

#[derive(Debug)]
pub enum Event {
    SetMode(Mode),
    MapClicked(Coordinate),
    Confirm(EntryDraft),
    Select(EntryId),
    /// Navigation back from the detail view.
    Deselect,
    SetEditing(bool),
    HandlePressed(HandleRef),
    PointerMoved(Coordinate),
    PointerReleased,
    HandleClicked(HandleRef),
    /// Metadata change of the active selection.
    Edit(EntryPatch),
    Delete(EntryId),
    SetFilter(TypeFilter),
    SetSort(SortKey),
    PositionChanged(Coordinate),
    SetTheme(Theme),
    SetMapStyle(MapStyle),
    OpenProfile,
    CloseProfile,
    Search(String),
    ElevationResolved {
        generation: Generation,
        result: Result<Vec<f64>, ApiError>,
    },
    PhotoResolved {
        id: EntryId,
        photo: Option<String>,
    },
    PlaceFound(Vec<Coordinate>),
}

/// Work the session hands to its runtime.
#[derive(Debug)]
pub enum Effect {
    Persist,
    SampleElevation(SampleJob),
    LookupPhoto { id: EntryId, at: Coordinate },
    SearchPlace(String),
}

/// State of one journal session. Events go in, effects come out; the
/// session itself never waits on anything.
pub struct Session {
    catalog: Catalog,
    mode: Mode,
    draft: Path,
    draft_elevation: Option<Vec<f64>>,
    pending_pin: Option<Coordinate>,
    active: Option<EntryId>,
    editor: VertexEditor,
    sampler: ElevationSampler,
    filter: TypeFilter,
    sort: SortKey,
    user_position: Option<Coordinate>,
    profile_open: bool,
    searching: bool,
    last_place: Option<Coordinate>,
    stats: Option<RouteStats>,
    highlights: Vec<WithDistance<Highlight>>,
    ids: IdClock,
    map: Box<dyn MapSurface>,
    chart: Box<dyn ChartSurface>,
}

impl Session {
    pub fn new(catalog: Catalog, map: Box<dyn MapSurface>, chart: Box<dyn ChartSurface>) -> Self {
        let mut ids = IdClock::new();
        catalog.ids().for_each(|id| ids.observe(id.raw()));
        let mut session = Self {
            catalog,
            mode: Mode::default(),
            draft: Path::new(),
            draft_elevation: None,
            pending_pin: None,
            active: None,
            editor: VertexEditor::new(),
            sampler: ElevationSampler::new(),
            filter: TypeFilter::default(),
            sort: SortKey::default(),
            user_position: None,
            profile_open: false,
            searching: false,
            last_place: None,
            stats: None,
            highlights: Vec::new(),
            ids,
            map,
            chart,
        };
        session.render_catalog();
        session.refresh_highlights();
        session
    }

    /// A session that draws nothing.
    pub fn headless(catalog: Catalog) -> Self {
        Self::new(catalog, Box::new(()), Box::new(()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn draft(&self) -> &Path {
        &self.draft
    }

    pub fn pending_pin(&self) -> Option<Coordinate> {
        self.pending_pin
    }

    pub fn active(&self) -> Option<EntryId> {
        self.active
    }

    pub fn active_walk(&self) -> Option<&Walk> {
        self.catalog.walk(self.active?)
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_enabled()
    }

    pub fn handles(&self) -> &[Handle] {
        self.editor.handles()
    }

    pub fn stats(&self) -> Option<RouteStats> {
        self.stats
    }

    pub fn highlights(&self) -> &[WithDistance<Highlight>] {
        &self.highlights
    }

    pub fn user_position(&self) -> Option<Coordinate> {
        self.user_position
    }

    pub fn is_profile_open(&self) -> bool {
        self.profile_open
    }

    /// A place search was handed out and has not come back yet.
    pub fn is_searching(&self) -> bool {
        self.searching
    }

    /// First candidate of the latest place search that came back.
    pub fn last_place(&self) -> Option<Coordinate> {
        self.last_place
    }

    pub fn pending_elevation(&self) -> Option<(Generation, ElevationTarget)> {
        self.sampler.in_flight()
    }

    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        log::trace!("handling {event:?}");
        match event {
            Event::SetMode(mode) => self.set_mode(mode),
            Event::MapClicked(at) => self.map_clicked(at),
            Event::Confirm(draft) => self.confirm(draft),
            Event::Select(id) => self.select(id),
            Event::Deselect => self.set_mode(Mode::Explore),
            Event::SetEditing(on) => self.set_editing(on),
            Event::HandlePressed(handle) => {
                self.edit_active_path(|editor, path| editor.press(handle, path))
            }
            Event::PointerMoved(at) => self.edit_active_path(|editor, path| editor.drag_to(at, path)),
            Event::PointerReleased => self.edit_active_path(VertexEditor::release),
            Event::HandleClicked(handle) => {
                self.edit_active_path(|editor, path| editor.click_handle(handle, path))
            }
            Event::Edit(patch) => self.edit_metadata(patch),
            Event::Delete(id) => self.delete(id),
            Event::SetFilter(filter) => {
                self.filter = filter;
                self.refresh_highlights();
                Vec::new()
            }
            Event::SetSort(sort) => {
                self.sort = sort;
                self.refresh_highlights();
                Vec::new()
            }
            Event::PositionChanged(at) => {
                self.user_position = Some(at);
                self.refresh_highlights();
                Vec::new()
            }
            Event::SetTheme(theme) => {
                self.catalog.theme = theme;
                vec![Effect::Persist]
            }
            Event::SetMapStyle(style) => {
                self.catalog.map_style = style;
                vec![Effect::Persist]
            }
            Event::OpenProfile => {
                self.profile_open = true;
                self.render_profile();
                Vec::new()
            }
            Event::CloseProfile => {
                self.close_profile();
                Vec::new()
            }
            Event::Search(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Vec::new();
                }
                self.searching = true;
                vec![Effect::SearchPlace(text.to_owned())]
            }
            Event::ElevationResolved { generation, result } => {
                self.elevation_resolved(generation, result)
            }
            Event::PhotoResolved { id, photo } => self.photo_resolved(id, photo),
            Event::PlaceFound(candidates) => {
                self.searching = false;
                self.last_place = candidates.first().copied();
                if let Some(first) = candidates.first() {
                    self.map
                        .fit_view(BoundingRegion::around(*first, FOCUS_RADIUS_KM));
                }
                Vec::new()
            }
        }
    }

    fn set_mode(&mut self, mode: Mode) -> Vec<Effect> {
        self.leave_detail();
        if mode != Mode::DrawWalk || self.mode != Mode::DrawWalk {
            self.discard_draft();
        }
        if mode != Mode::AddPin {
            self.pending_pin = None;
        }
        self.mode = mode;
        if mode == Mode::DrawWalk {
            self.stats = Some(self.draft_stats());
        }
        Vec::new()
    }

    fn map_clicked(&mut self, at: Coordinate) -> Vec<Effect> {
        if self.editor.is_enabled() {
            return self.edit_active_path(|editor, path| editor.click_map(at, path));
        }
        match self.mode {
            Mode::Explore => Vec::new(),
            Mode::AddPin => {
                self.pending_pin = Some(at);
                Vec::new()
            }
            Mode::DrawWalk => {
                self.draft.append(at);
                self.draft_elevation = None;
                self.map
                    .render_polyline(LayerId::Draft, &self.draft, Color::default());
                self.stats = Some(self.draft_stats());
                let job = self.sampler.request(ElevationTarget::Draft, &self.draft);
                vec![Effect::SampleElevation(job)]
            }
        }
    }

    fn confirm(&mut self, draft: EntryDraft) -> Vec<Effect> {
        let name = match draft.name.trim() {
            "" => DEFAULT_NAME.to_owned(),
            name => name.to_owned(),
        };
        let rating = draft.rating.min(model::MAX_RATING);
        let (id, at) = match self.mode {
            Mode::Explore => return Vec::new(),
            Mode::AddPin => {
                let Some(at) = self.pending_pin.take() else {
                    return Vec::new();
                };
                let pin = Pin {
                    id: self.ids.next_id(),
                    name,
                    description: draft.description,
                    rating,
                    coordinate: at,
                    color: draft.color,
                    photo: None,
                };
                self.map.render_marker(LayerId::Entry(pin.id), at, pin.color);
                let id = pin.id;
                self.catalog.add(Entry::Pin(pin));
                (id, at)
            }
            Mode::DrawWalk => {
                let Some(at) = self.draft.first().filter(|_| self.draft.is_complete()) else {
                    return Vec::new();
                };
                self.sampler.cancel_for(ElevationTarget::Draft);
                self.map.remove_layer(LayerId::Draft);
                let mut walk = Walk {
                    id: self.ids.next_id(),
                    name,
                    description: draft.description,
                    rating,
                    path: std::mem::take(&mut self.draft),
                    distance_km: 0.0,
                    color: draft.color,
                    photo: None,
                    elevation: self.draft_elevation.take(),
                    elevation_stale: false,
                };
                walk.refresh_distance();
                self.map
                    .render_polyline(LayerId::Entry(walk.id), &walk.path, walk.color);
                let id = walk.id;
                self.catalog.add(Entry::Walk(walk));
                (id, at)
            }
        };
        log::info!("added {id} to the journal");
        self.set_mode(Mode::Explore);
        self.refresh_highlights();
        vec![Effect::Persist, Effect::LookupPhoto { id, at }]
    }

    fn select(&mut self, id: EntryId) -> Vec<Effect> {
        let Some(entry) = self.catalog.get(id) else {
            return Vec::new();
        };
        self.leave_detail();
        self.active = Some(id);
        match entry {
            Entry::Pin(pin) => {
                self.map
                    .fit_view(BoundingRegion::around(pin.coordinate, FOCUS_RADIUS_KM));
                Vec::new()
            }
            Entry::Walk(walk) => {
                if let Some(region) = walk.path.bounding_region() {
                    self.map.fit_view(region);
                }
                self.stats = Some(RouteStats::of_walk(&walk));
                let job = self.sampler.request(ElevationTarget::Walk(id), &walk.path);
                vec![Effect::SampleElevation(job)]
            }
        }
    }

    fn set_editing(&mut self, on: bool) -> Vec<Effect> {
        let Some(walk) = self.active.and_then(|id| self.catalog.walk(id)) else {
            return Vec::new();
        };
        if on {
            self.editor.enable(&walk.path);
            self.map.render_handles(self.editor.handles());
            return Vec::new();
        }
        let effects = if self.editor.is_dragging() {
            self.edit_active_path(VertexEditor::finish_drag)
        } else {
            Vec::new()
        };
        self.editor.disable();
        self.map.render_handles(&[]);
        effects
    }

    fn edit_active_path<F>(&mut self, edit: F) -> Vec<Effect>
    where
        F: FnOnce(&mut VertexEditor, &mut Path) -> EditOutcome,
    {
        if !self.editor.is_enabled() {
            return Vec::new();
        }
        let Some(id) = self.active else {
            return Vec::new();
        };
        let Some(walk) = self.catalog.walk_mut(id) else {
            return Vec::new();
        };
        let outcome = edit(&mut self.editor, &mut walk.path);
        if !outcome.changed_geometry() {
            return Vec::new();
        }

        walk.refresh_distance();
        walk.invalidate_elevation();
        // samples taken for the old shape must not land on the new one
        self.sampler.cancel_for(ElevationTarget::Walk(id));
        self.map
            .render_polyline(LayerId::Entry(id), &walk.path, walk.color);
        self.stats = Some(RouteStats::of_walk(walk));
        match outcome {
            EditOutcome::Unchanged | EditOutcome::Moved => Vec::new(),
            EditOutcome::Inserted => {
                self.map.render_handles(self.editor.handles());
                Vec::new()
            }
            EditOutcome::Committed => {
                self.map.render_handles(self.editor.handles());
                let job = self.sampler.request(ElevationTarget::Walk(id), &walk.path);
                vec![Effect::Persist, Effect::SampleElevation(job)]
            }
        }
    }

    fn edit_metadata(&mut self, patch: EntryPatch) -> Vec<Effect> {
        let Some(id) = self.active else {
            return Vec::new();
        };
        let recolor = patch.color.is_some();
        if !self.catalog.update(id, patch) {
            return Vec::new();
        }
        if recolor {
            self.render_entry(id);
        }
        self.refresh_highlights();
        vec![Effect::Persist]
    }

    fn delete(&mut self, id: EntryId) -> Vec<Effect> {
        if self.catalog.remove(id).is_none() {
            return Vec::new();
        }
        self.map.remove_layer(LayerId::Entry(id));
        self.sampler.cancel_for(ElevationTarget::Walk(id));
        if self.active == Some(id) {
            self.leave_detail();
        }
        log::info!("removed {id} from the journal");
        self.refresh_highlights();
        vec![Effect::Persist]
    }

    fn elevation_resolved(
        &mut self,
        generation: Generation,
        result: Result<Vec<f64>, ApiError>,
    ) -> Vec<Effect> {
        let Some(accepted) = self.sampler.complete(generation) else {
            log::debug!("dropping superseded elevation answer {generation}");
            return Vec::new();
        };
        let samples = match result {
            Ok(samples) => samples,
            Err(why) => {
                log::debug!("elevation lookup failed: {why}");
                return Vec::new();
            }
        };
        if samples.len() != accepted.expected_len {
            log::debug!(
                "expected {} elevation samples, got {}",
                accepted.expected_len,
                samples.len()
            );
            return Vec::new();
        }

        match accepted.target {
            ElevationTarget::Draft => {
                if self.mode != Mode::DrawWalk {
                    return Vec::new();
                }
                self.stats = Some(RouteStats::of_path(&self.draft, Some(samples.as_slice())));
                self.draft_elevation = Some(samples);
                Vec::new()
            }
            ElevationTarget::Walk(id) => {
                if self.active != Some(id) {
                    return Vec::new();
                }
                let Some(walk) = self.catalog.walk_mut(id) else {
                    return Vec::new();
                };
                walk.store_elevation(samples);
                self.stats = Some(RouteStats::of_walk(walk));
                self.render_profile();
                vec![Effect::Persist]
            }
        }
    }

    fn photo_resolved(&mut self, id: EntryId, photo: Option<String>) -> Vec<Effect> {
        let Some(photo) = photo else {
            return Vec::new();
        };
        match self.catalog.get(id) {
            Some(entry) if entry.photo().is_none() => {
                self.catalog.update(id, EntryPatch::default().photo(photo));
                self.refresh_highlights();
                vec![Effect::Persist]
            }
            _ => Vec::new(),
        }
    }

    /// Clears everything tied to the detail view of the active selection.
    fn leave_detail(&mut self) {
        self.active = None;
        if self.editor.is_enabled() {
            self.editor.disable();
            self.map.render_handles(&[]);
        }
        self.close_profile();
        self.sampler.cancel();
        self.stats = None;
    }

    fn discard_draft(&mut self) {
        if !self.draft.is_empty() {
            self.map.remove_layer(LayerId::Draft);
        }
        self.draft.clear();
        self.draft_elevation = None;
    }

    fn draft_stats(&self) -> RouteStats {
        RouteStats::of_path(&self.draft, self.draft_elevation.as_deref())
    }

    fn close_profile(&mut self) {
        if self.profile_open {
            self.chart.destroy();
            self.profile_open = false;
        }
    }

    /// Charts the active walk when the profile is open and the samples match
    /// the current path.
    fn render_profile(&mut self) {
        if !self.profile_open {
            return;
        }
        let Some(walk) = self.active.and_then(|id| self.catalog.walk(id)) else {
            return;
        };
        let Some(elevation) = walk.fresh_elevation() else {
            return;
        };
        let samples = sampler::resample(&walk.path, SAMPLE_STEP_M);
        if let Some(series) = sampler::profile_series(&samples, elevation) {
            self.chart.render_series(&series);
        }
    }

    fn render_entry(&mut self, id: EntryId) {
        if let Some(pin) = self.catalog.pin(id) {
            self.map
                .render_marker(LayerId::Entry(id), pin.coordinate, pin.color);
        } else if let Some(walk) = self.catalog.walk(id) {
            self.map
                .render_polyline(LayerId::Entry(id), &walk.path, walk.color);
        }
    }

    fn render_catalog(&mut self) {
        for pin in &self.catalog.pins {
            self.map
                .render_marker(LayerId::Entry(pin.id), pin.coordinate, pin.color);
        }
        for walk in &self.catalog.walks {
            self.map
                .render_polyline(LayerId::Entry(walk.id), &walk.path, walk.color);
        }
    }

    fn refresh_highlights(&mut self) {
        self.highlights =
            highlights::rank(&self.catalog, self.filter, self.sort, self.user_position);
    }
}
