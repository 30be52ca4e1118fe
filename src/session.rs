//! Editing session: the entry point the UI layer talks to.
//!
//! An [`EditorSession`] owns the annotation store, the undo history and the
//! current pointer gesture for one image. UI callbacks map one-to-one onto
//! its methods, and every visible change is reported back as a
//! [`SessionEvent`] that the caller drains with [`EditorSession::take_events`].

use std::io::{Read, Write};

use crate::annotation::{Annotation, AnnotationId, AnnotationStore};
use crate::config::{EditorConfig, Rgb};
use crate::error::EditorError;
use crate::event::SessionEvent;
use crate::format::{self, AnnotationRecord, FormatError};
use crate::geometry::{BoundingBox, Coord, Point};
use crate::interaction::{DragState, ReleaseOutcome};
use crate::undo::{Command, UndoConfig, UndoStack};

/// Pixel dimensions of the loaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Annotation editing state for a single image.
#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    /// Canvas pixels per image pixel.
    scale: f64,
    image: Option<ImageSize>,
    store: AnnotationStore,
    history: UndoStack,
    drag: DragState,
    /// Events not yet collected by the UI.
    events: Vec<SessionEvent>,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        let history = UndoStack::with_config(UndoConfig {
            max_history: config.max_history,
        });
        Self {
            config,
            scale: 1.0,
            image: None,
            store: AnnotationStore::new(),
            history,
            drag: DragState::Idle,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn image_size(&self) -> Option<ImageSize> {
        self.image
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// All annotations in store order.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Drain pending events in the order they were emitted.
    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Image lifecycle
    // ========================================================================

    /// Reset everything for a freshly loaded image.
    pub fn on_image_loaded(&mut self, width: u32, height: u32) {
        log::info!("Image loaded ({}x{}), resetting annotations", width, height);
        self.image = Some(ImageSize { width, height });
        self.scale = 1.0;
        self.store.clear();
        self.history.clear();
        self.drag.cancel();
        self.emit_view_changed();
        self.emit_annotations_changed();
    }

    // ========================================================================
    // Pointer gestures
    // ========================================================================

    /// Convert canvas coordinates to image coordinates at the current scale.
    pub fn to_image_point(&self, x: f64, y: f64) -> Point {
        Point::new((x / self.scale).trunc() as Coord, (y / self.scale).trunc() as Coord)
    }

    /// Button pressed at canvas position `(x, y)`.
    pub fn on_pointer_press(&mut self, x: f64, y: f64) {
        if self.image.is_none() {
            return;
        }
        let point = self.to_image_point(x, y);
        self.drag.press(&self.store, point);
        self.emit_preview();
    }

    /// Pointer moved with the button held.
    pub fn on_pointer_drag(&mut self, x: f64, y: f64) {
        if self.image.is_none() || !self.drag.is_drawing() {
            return;
        }
        let point = self.to_image_point(x, y);
        self.drag.drag(point);
        self.emit_preview();
    }

    /// Button released. Commits the gesture if it is valid.
    pub fn on_pointer_release(&mut self, x: f64, y: f64) -> ReleaseOutcome {
        if self.image.is_none() || !self.drag.is_drawing() {
            return ReleaseOutcome::Idle;
        }
        let point = self.to_image_point(x, y);
        let outcome = self.drag.release(&mut self.store, &mut self.history, point);
        self.emit_preview();
        if outcome.is_commit() {
            self.emit_annotations_changed();
        }
        outcome
    }

    // ========================================================================
    // List-driven edits
    // ========================================================================

    /// Rename an annotation, keeping its box.
    pub fn set_name(&mut self, id: AnnotationId, name: impl Into<String>) -> Result<(), EditorError> {
        let bbox = self.find(id)?.bbox;
        self.update_annotation(id, name, bbox)
    }

    /// Move or resize an annotation, keeping its name.
    pub fn set_box(&mut self, id: AnnotationId, bbox: BoundingBox) -> Result<(), EditorError> {
        let name = self.find(id)?.name.clone();
        self.update_annotation(id, name, bbox)
    }

    /// Replace name and box together. The box is normalized and must not
    /// overlap another annotation.
    pub fn update_annotation(
        &mut self,
        id: AnnotationId,
        name: impl Into<String>,
        bbox: BoundingBox,
    ) -> Result<(), EditorError> {
        let previous = self.find(id)?.clone();
        if let Err(e) = self.store.update_by_id(id, name, bbox) {
            log::debug!("Edit of annotation {} rejected: {}", id, e);
            return Err(e);
        }
        self.history.push(Command::EditAnnotation { previous });
        self.emit_annotations_changed();
        Ok(())
    }

    /// Delete an annotation. Later annotations move down one id.
    pub fn delete_annotation(&mut self, id: AnnotationId) -> Result<Annotation, EditorError> {
        let removed = self.store.remove_by_id(id)?;
        self.cancel_gesture();
        self.history.push(Command::RemoveAnnotation {
            annotation: removed.clone(),
        });
        self.emit_annotations_changed();
        Ok(removed)
    }

    /// Report the details of an annotation picked in the list view.
    pub fn select(&mut self, id: AnnotationId) -> Result<Annotation, EditorError> {
        let ann = self.find(id)?.clone();
        self.events.push(SessionEvent::SelectionDetail {
            id: ann.id,
            name: ann.name.clone(),
            bbox: ann.bbox,
        });
        Ok(ann)
    }

    // ========================================================================
    // History
    // ========================================================================

    /// Undo the last edit. Returns false if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let changed = self.history.undo(&mut self.store);
        if changed {
            self.emit_annotations_changed();
        }
        changed
    }

    /// Redo the last undone edit. Returns false if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let changed = self.history.redo(&mut self.store);
        if changed {
            self.emit_annotations_changed();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ========================================================================
    // View
    // ========================================================================

    /// Zoom by one step: in for a positive `delta`, out otherwise.
    pub fn zoom(&mut self, delta: f64) {
        let scale = if delta > 0.0 {
            self.scale * self.config.zoom_step
        } else {
            self.scale / self.config.zoom_step
        };
        self.scale = self.config.clamp_scale(scale);
        log::debug!("Zoom {:.3}", self.scale);
        self.emit_view_changed();
    }

    pub fn set_number_color(&mut self, color: Rgb) {
        self.config.number_color = color;
        self.emit_view_changed();
    }

    pub fn set_square_color(&mut self, color: Rgb) {
        self.config.square_color = color;
        self.emit_view_changed();
    }

    // ========================================================================
    // Import/Export
    // ========================================================================

    /// Snapshot the store as flat records.
    pub fn export_records(&self) -> Vec<AnnotationRecord> {
        format::records_from_store(&self.store)
    }

    /// Replace the store with `records`, appended in order.
    ///
    /// Ids are re-derived from row order. Either every record is applied or,
    /// on error, nothing changes. History is cleared on success.
    pub fn import_records(&mut self, records: Vec<AnnotationRecord>) -> Result<usize, EditorError> {
        let mut boxes = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let bbox = record.bbox().normalized();
            if bbox.is_empty() {
                return Err(FormatError::EmptyBox { row: index + 1 }.into());
            }
            boxes.push(bbox);
        }

        self.store.clear();
        self.history.clear();
        self.cancel_gesture();
        for (record, bbox) in records.into_iter().zip(boxes) {
            let stored_id = record.id;
            let id = self.store.append(record.name, bbox);
            if id != stored_id {
                log::warn!("Imported row with id {} renumbered to {}", stored_id, id);
            }
        }

        let count = self.store.len();
        log::info!("Imported {} annotations", count);
        self.emit_annotations_changed();
        Ok(count)
    }

    /// Parse raw rows (header first) and import them.
    pub fn import_rows<S: AsRef<str>>(&mut self, rows: &[Vec<S>]) -> Result<usize, EditorError> {
        let records = format::parse_rows(rows)?;
        self.import_records(records)
    }

    /// Write the store as CSV.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<(), EditorError> {
        format::write_records(&self.export_records(), writer)?;
        Ok(())
    }

    /// Replace the store with CSV content.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> Result<usize, EditorError> {
        let records = format::read_records(reader)?;
        self.import_records(records)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn find(&self, id: AnnotationId) -> Result<&Annotation, EditorError> {
        self.store.find_by_id(id).ok_or(EditorError::NotFound(id))
    }

    /// Drop an in-progress gesture whose ids may be invalidated by a
    /// structural change.
    fn cancel_gesture(&mut self) {
        if self.drag.is_drawing() {
            self.drag.cancel();
            self.emit_preview();
        }
    }

    fn emit_annotations_changed(&mut self) {
        self.events.push(SessionEvent::AnnotationsChanged {
            annotations: self.store.annotations().to_vec(),
        });
    }

    fn emit_preview(&mut self) {
        self.events.push(SessionEvent::PreviewChanged {
            preview: self.drag.preview(),
            hidden: self.drag.hidden_id(),
        });
    }

    fn emit_view_changed(&mut self) {
        self.events.push(SessionEvent::ViewChanged {
            scale: self.scale,
            number_color: self.config.number_color,
            square_color: self.config.square_color,
        });
    }
}

// ============================================================================
// Tests
// ============================================================================
