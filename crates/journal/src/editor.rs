use model::path::Path;
use serde::Serialize;
use utility::geo::Coordinate;

/// Addresses a draggable handle: a vertex by its index, or a midpoint by
/// the index of the segment it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "lowercase")]
pub enum HandleRef {
    Vertex(usize),
    Midpoint(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Handle {
    pub handle: HandleRef,
    pub position: Coordinate,
    /// Endpoints are drawn distinctly and can not be deleted by a click.
    pub endpoint: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingVertex { index: usize, moved: bool },
    /// The midpoint was already turned into the vertex at `index`.
    DraggingMidpoint { index: usize, moved: bool },
}

/// What an editor event did to the path, and what the caller has to follow
/// up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Unchanged,
    /// A vertex moved during a drag. Distance changes, handles and
    /// elevation wait for the release.
    Moved,
    /// A vertex was inserted at drag start. Handles were rebuilt.
    Inserted,
    /// The edit is done. Handles were rebuilt and elevation has to be
    /// sampled again.
    Committed,
}

impl EditOutcome {
    pub fn changed_geometry(&self) -> bool {
        !matches!(self, EditOutcome::Unchanged)
    }
}

/// Turns pointer events into edits of one path.
#[derive(Debug, Default)]
pub struct VertexEditor {
    enabled: bool,
    drag: DragState,
    handles: Vec<Handle>,
}

impl VertexEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_dragging(&self) -> bool {
        self.drag != DragState::Idle
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    pub fn enable(&mut self, path: &Path) {
        self.enabled = true;
        self.drag = DragState::Idle;
        self.rebuild(path);
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        self.drag = DragState::Idle;
        self.handles.clear();
    }

    /// One handle per vertex plus one per segment midpoint.
    pub fn rebuild(&mut self, path: &Path) {
        self.handles.clear();
        if !self.enabled {
            return;
        }
        let vertices = path.points().iter().enumerate().map(|(index, position)| Handle {
            handle: HandleRef::Vertex(index),
            position: *position,
            endpoint: path.is_endpoint(index),
        });
        let midpoints = (0..path.segment_count()).filter_map(|segment| {
            path.midpoint(segment).map(|position| Handle {
                handle: HandleRef::Midpoint(segment),
                position,
                endpoint: false,
            })
        });
        self.handles.extend(vertices.chain(midpoints));
    }

    /// Pointer went down on a handle. Pressing a midpoint inserts a vertex
    /// right away and keeps dragging it.
    pub fn press(&mut self, handle: HandleRef, path: &mut Path) -> EditOutcome {
        if !self.enabled || self.is_dragging() {
            return EditOutcome::Unchanged;
        }
        match handle {
            HandleRef::Vertex(index) => {
                if index < path.len() {
                    self.drag = DragState::DraggingVertex {
                        index,
                        moved: false,
                    };
                }
                EditOutcome::Unchanged
            }
            HandleRef::Midpoint(segment) => {
                let Some(midpoint) = path.midpoint(segment) else {
                    return EditOutcome::Unchanged;
                };
                let index = segment + 1;
                if !path.insert_at(index, midpoint) {
                    return EditOutcome::Unchanged;
                }
                self.drag = DragState::DraggingMidpoint {
                    index,
                    moved: false,
                };
                self.rebuild(path);
                EditOutcome::Inserted
            }
        }
    }

    pub fn drag_to(&mut self, point: Coordinate, path: &mut Path) -> EditOutcome {
        let (DragState::DraggingVertex { index, moved } | DragState::DraggingMidpoint { index, moved }) =
            &mut self.drag
        else {
            return EditOutcome::Unchanged;
        };
        if !path.replace_at(*index, point) {
            return EditOutcome::Unchanged;
        }
        *moved = true;
        EditOutcome::Moved
    }

    /// Pointer went up. A vertex released without moving counts as a click
    /// on it and deletes it unless it is an endpoint.
    pub fn release(&mut self, path: &mut Path) -> EditOutcome {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => EditOutcome::Unchanged,
            DragState::DraggingVertex { moved: true, .. } | DragState::DraggingMidpoint { .. } => {
                self.rebuild(path);
                EditOutcome::Committed
            }
            DragState::DraggingVertex {
                index,
                moved: false,
            } => {
                if path.is_endpoint(index) || !path.remove_at(index) {
                    return EditOutcome::Unchanged;
                }
                self.rebuild(path);
                EditOutcome::Committed
            }
        }
    }

    /// Ends a drag that was interrupted without a release. Moved vertices
    /// and inserted midpoints are committed, a bare press is dropped.
    pub fn finish_drag(&mut self, path: &mut Path) -> EditOutcome {
        match self.drag {
            DragState::DraggingVertex { moved: false, .. } => {
                self.drag = DragState::Idle;
                EditOutcome::Unchanged
            }
            _ => self.release(path),
        }
    }

    pub fn click_handle(&mut self, handle: HandleRef, path: &mut Path) -> EditOutcome {
        let pressed = self.press(handle, path);
        match self.release(path) {
            EditOutcome::Unchanged => pressed,
            released => released,
        }
    }

    /// A click on the map while editing extends the path.
    pub fn click_map(&mut self, point: Coordinate, path: &mut Path) -> EditOutcome {
        if !self.enabled || self.is_dragging() {
            return EditOutcome::Unchanged;
        }
        path.append(point);
        self.rebuild(path);
        EditOutcome::Committed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(points: &[(f64, f64)]) -> Path {
        points
            .iter()
            .map(|(lat, lng)| Coordinate::new(*lat, *lng))
            .collect()
    }

    fn editing(path: &Path) -> VertexEditor {
        let mut editor = VertexEditor::new();
        editor.enable(path);
        editor
    }

    #[test]
    fn handles_cover_vertices_and_midpoints() {
        let path = path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let editor = editing(&path);
        assert_eq!(editor.handles().len(), 5);
        let endpoints: Vec<HandleRef> = editor
            .handles()
            .iter()
            .filter(|handle| handle.endpoint)
            .map(|handle| handle.handle)
            .collect();
        assert_eq!(endpoints, vec![HandleRef::Vertex(0), HandleRef::Vertex(2)]);
        let midpoint = editor
            .handles()
            .iter()
            .find(|handle| handle.handle == HandleRef::Midpoint(0))
            .unwrap();
        assert_eq!(midpoint.position, Coordinate::new(0.0, 0.5));
    }

    #[test]
    fn dragging_a_midpoint_inserts_a_vertex() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0)]);
        let mut editor = editing(&path);

        assert_eq!(editor.press(HandleRef::Midpoint(0), &mut path), EditOutcome::Inserted);
        assert_eq!(path.len(), 3);
        assert_eq!(path.get(1), Some(Coordinate::new(0.0, 0.5)));

        let target = Coordinate::new(0.2, 0.5);
        assert_eq!(editor.drag_to(target, &mut path), EditOutcome::Moved);
        assert_eq!(path.get(1), Some(target));
        assert_eq!(editor.release(&mut path), EditOutcome::Committed);
        assert_eq!(editor.handles().len(), 5);
        assert_eq!(editor.drag_state(), DragState::Idle);
    }

    #[test]
    fn releasing_a_moved_vertex_commits() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let mut editor = editing(&path);
        editor.press(HandleRef::Vertex(2), &mut path);
        editor.drag_to(Coordinate::new(2.0, 1.0), &mut path);
        assert_eq!(editor.release(&mut path), EditOutcome::Committed);
        assert_eq!(path.len(), 3);
        assert_eq!(path.last(), Some(Coordinate::new(2.0, 1.0)));
    }

    #[test]
    fn clicking_an_interior_vertex_deletes_it() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let mut editor = editing(&path);
        assert_eq!(
            editor.click_handle(HandleRef::Vertex(1), &mut path),
            EditOutcome::Committed
        );
        assert_eq!(path.points(), &[Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]);
        assert_eq!(editor.handles().len(), 3);
    }

    #[test]
    fn endpoints_survive_clicks() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let mut editor = editing(&path);
        assert_eq!(
            editor.click_handle(HandleRef::Vertex(0), &mut path),
            EditOutcome::Unchanged
        );
        assert_eq!(
            editor.click_handle(HandleRef::Vertex(2), &mut path),
            EditOutcome::Unchanged
        );
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn two_point_path_keeps_its_shape() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0)]);
        let mut editor = editing(&path);
        let before = path.clone();
        for index in 0..2 {
            assert_eq!(
                editor.click_handle(HandleRef::Vertex(index), &mut path),
                EditOutcome::Unchanged
            );
        }
        assert_eq!(path, before);
        assert_eq!(editor.handles().len(), 3);
    }

    #[test]
    fn map_click_appends_while_enabled() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0)]);
        let mut editor = VertexEditor::new();
        assert_eq!(
            editor.click_map(Coordinate::new(1.0, 1.0), &mut path),
            EditOutcome::Unchanged
        );
        assert_eq!(path.len(), 2);

        editor.enable(&path);
        assert_eq!(
            editor.click_map(Coordinate::new(1.0, 1.0), &mut path),
            EditOutcome::Committed
        );
        assert_eq!(path.len(), 3);
        assert_eq!(editor.handles().len(), 5);
    }

    #[test]
    fn interrupted_press_keeps_the_vertex() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0)]);
        let mut editor = editing(&path);
        editor.press(HandleRef::Vertex(1), &mut path);
        assert_eq!(editor.finish_drag(&mut path), EditOutcome::Unchanged);
        assert_eq!(path.len(), 3);
        assert_eq!(editor.drag_state(), DragState::Idle);

        editor.press(HandleRef::Vertex(1), &mut path);
        editor.drag_to(Coordinate::new(0.5, 1.0), &mut path);
        assert_eq!(editor.finish_drag(&mut path), EditOutcome::Committed);
        assert_eq!(path.get(1), Some(Coordinate::new(0.5, 1.0)));

        editor.press(HandleRef::Midpoint(0), &mut path);
        assert_eq!(editor.finish_drag(&mut path), EditOutcome::Committed);
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn disabling_clears_handles_and_drag() {
        let mut path = path(&[(0.0, 0.0), (0.0, 1.0)]);
        let mut editor = editing(&path);
        editor.press(HandleRef::Vertex(0), &mut path);
        editor.disable();
        assert!(editor.handles().is_empty());
        assert!(!editor.is_dragging());
        assert_eq!(
            editor.drag_to(Coordinate::new(5.0, 5.0), &mut path),
            EditOutcome::Unchanged
        );
        assert_eq!(
            editor.press(HandleRef::Midpoint(0), &mut path),
            EditOutcome::Unchanged
        );
        assert_eq!(path.len(), 2);
    }
}
