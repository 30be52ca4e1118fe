//! Annotation data model and storage.
//!
//! This module provides the core types for labelled regions:
//! - [`Annotation`]: a named box with a positional identifier
//! - [`AnnotationStore`]: the ordered collection that owns the identifiers
//!
//! Identifiers are positional. The annotation at index `i` always has id
//! `i + 1`, so removing or inserting an annotation renumbers everything
//! after it. Every mutation ends with an explicit renumbering pass.

use serde::{Deserialize, Serialize};

use crate::error::EditorError;
use crate::geometry::BoundingBox;

/// Positional identifier of an annotation (1-based).
pub type AnnotationId = u32;

// ============================================================================
// Annotation
// ============================================================================

/// A single labelled region on an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Position-derived identifier, `index + 1` in the store.
    pub id: AnnotationId,
    /// User-supplied label, empty for freshly drawn boxes.
    #[serde(default)]
    pub name: String,
    /// Box in image coordinates.
    pub bbox: BoundingBox,
}

impl Annotation {
    pub fn new(id: AnnotationId, name: impl Into<String>, bbox: BoundingBox) -> Self {
        Self {
            id,
            name: name.into(),
            bbox,
        }
    }
}

// ============================================================================
// Annotation Store
// ============================================================================

/// Ordered storage for the annotations of the current image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationStore {
    /// Annotations in draw order.
    annotations: Vec<Annotation>,
    /// Id the next appended annotation receives. Always `len() + 1`.
    next_id: AnnotationId,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
            next_id: 1,
        }
    }

    /// Get the number of annotations.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if there are no annotations.
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Id the next appended annotation will receive.
    pub fn next_id(&self) -> AnnotationId {
        self.next_id
    }

    /// All annotations in store order.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Iterate over annotations in store order.
    pub fn iter(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter()
    }

    /// Index of the annotation with the given id.
    pub fn position_of(&self, id: AnnotationId) -> Option<usize> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.annotations
            .get(index)
            .filter(|ann| ann.id == id)
            .map(|_| index)
    }

    /// Get an annotation by id.
    pub fn find_by_id(&self, id: AnnotationId) -> Option<&Annotation> {
        self.position_of(id).map(|index| &self.annotations[index])
    }

    /// Append a new annotation at the end and return its id.
    pub fn append(&mut self, name: impl Into<String>, bbox: BoundingBox) -> AnnotationId {
        let id = self.next_id;
        self.annotations.push(Annotation::new(id, name, bbox));
        self.next_id += 1;
        log::debug!("Appended annotation {} at {}", id, bbox);
        id
    }

    /// Insert an annotation at `position`.
    ///
    /// The inserted annotation takes id `position + 1` and every annotation
    /// after it shifts up by one. Used when replaying history, where the
    /// recorded id already equals the original position.
    pub fn insert_at(
        &mut self,
        position: usize,
        mut annotation: Annotation,
    ) -> Result<(), EditorError> {
        if position > self.annotations.len() {
            return Err(EditorError::NotFound(annotation.id));
        }
        let id = id_for(position);
        if annotation.id != id {
            log::warn!(
                "Inserting annotation {} at position {}, renumbering to {}",
                annotation.id,
                position,
                id
            );
            annotation.id = id;
        }
        self.annotations.insert(position, annotation);
        self.renumber_from(position + 1);
        log::debug!("Inserted annotation {}", id);
        Ok(())
    }

    /// Re-insert an annotation at the position its id names.
    pub fn restore(&mut self, annotation: Annotation) -> Result<(), EditorError> {
        let position = usize::try_from(annotation.id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .ok_or(EditorError::NotFound(annotation.id))?;
        self.insert_at(position, annotation)
    }

    /// Remove an annotation by id.
    ///
    /// Every annotation after it moves down one id.
    pub fn remove_by_id(&mut self, id: AnnotationId) -> Result<Annotation, EditorError> {
        let position = self.position_of(id).ok_or(EditorError::NotFound(id))?;
        let removed = self.annotations.remove(position);
        self.renumber_from(position);
        log::debug!("Removed annotation {}", id);
        Ok(removed)
    }

    /// Change the name and box of an existing annotation.
    ///
    /// The box is normalized first and must not be empty or overlap any other
    /// annotation. An unchanged box skips the overlap check, so boxes that
    /// came in overlapping from an import can still be renamed. Returns the
    /// previous name and box.
    pub fn update_by_id(
        &mut self,
        id: AnnotationId,
        name: impl Into<String>,
        bbox: BoundingBox,
    ) -> Result<(String, BoundingBox), EditorError> {
        let current = self.find_by_id(id).ok_or(EditorError::NotFound(id))?.bbox;
        let bbox = bbox.normalized();
        if bbox.is_empty() {
            return Err(EditorError::EmptyBox);
        }
        if bbox == current {
            log::trace!("Annotation {} keeps its box, skipping overlap check", id);
        } else if let Some(other) = self.first_collision(&bbox, Some(id)) {
            return Err(EditorError::Overlap(other.id));
        }
        let previous = self.replace_by_id(id, name, bbox)?;
        Ok((previous.name, previous.bbox))
    }

    /// Overwrite name and box in place without collision checks.
    ///
    /// Returns a snapshot of the annotation as it was.
    pub(crate) fn replace_by_id(
        &mut self,
        id: AnnotationId,
        name: impl Into<String>,
        bbox: BoundingBox,
    ) -> Result<Annotation, EditorError> {
        let position = self.position_of(id).ok_or(EditorError::NotFound(id))?;
        let slot = &mut self.annotations[position];
        let previous = slot.clone();
        slot.name = name.into();
        slot.bbox = bbox;
        log::debug!("Updated annotation {}: {} -> {}", id, previous.bbox, bbox);
        Ok(previous)
    }

    /// Clear all annotations and reset the id counter.
    pub fn clear(&mut self) {
        self.annotations.clear();
        self.next_id = 1;
    }

    /// Reassign positional ids from `start` onward and resync `next_id`.
    fn renumber_from(&mut self, start: usize) {
        for (index, ann) in self.annotations.iter_mut().enumerate().skip(start) {
            ann.id = id_for(index);
        }
        self.next_id = id_for(self.annotations.len());
    }
}

fn id_for(index: usize) -> AnnotationId {
    (index + 1) as AnnotationId
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bbox(x: i32) -> BoundingBox {
        BoundingBox::new(x, 10, x + 10, 0)
    }

    fn assert_contiguous(store: &AnnotationStore) {
        for (index, ann) in store.iter().enumerate() {
            assert_eq!(ann.id as usize, index + 1);
        }
        assert_eq!(store.next_id() as usize, store.len() + 1);
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let mut store = AnnotationStore::new();
        assert_eq!(store.next_id(), 1);

        assert_eq!(store.append("", bbox(0)), 1);
        assert_eq!(store.next_id(), 2);
        assert_eq!(store.append("", bbox(20)), 2);
        assert_eq!(store.next_id(), 3);
        assert_contiguous(&store);
    }

    #[test]
    fn test_remove_shifts_later_ids_down() {
        let mut store = AnnotationStore::new();
        store.append("a", bbox(0));
        store.append("b", bbox(20));
        store.append("c", bbox(40));

        let removed = store.remove_by_id(1).unwrap();
        assert_eq!(removed.name, "a");
        assert_eq!(store.len(), 2);
        assert_eq!(store.find_by_id(1).unwrap().name, "b");
        assert_eq!(store.find_by_id(2).unwrap().name, "c");
        assert!(store.find_by_id(3).is_none());
        assert_eq!(store.next_id(), 3);
        assert_contiguous(&store);
    }

    #[test]
    fn test_remove_missing_id() {
        let mut store = AnnotationStore::new();
        store.append("", bbox(0));
        assert!(matches!(store.remove_by_id(0), Err(EditorError::NotFound(0))));
        assert!(matches!(store.remove_by_id(2), Err(EditorError::NotFound(2))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_restore_shifts_later_ids_up() {
        let mut store = AnnotationStore::new();
        store.append("a", bbox(0));
        store.append("b", bbox(20));
        store.append("c", bbox(40));
        let before = store.clone();

        let removed = store.remove_by_id(2).unwrap();
        store.restore(removed).unwrap();
        assert_eq!(store, before);
    }

    #[test]
    fn test_insert_at_renumbers_inserted_annotation() {
        let mut store = AnnotationStore::new();
        store.append("a", bbox(0));
        store.insert_at(0, Annotation::new(7, "z", bbox(40))).unwrap();

        assert_eq!(store.find_by_id(1).unwrap().name, "z");
        assert_eq!(store.find_by_id(2).unwrap().name, "a");
        assert_contiguous(&store);
    }

    #[test]
    fn test_insert_past_end_fails() {
        let mut store = AnnotationStore::new();
        let result = store.insert_at(1, Annotation::new(2, "", bbox(0)));
        assert!(matches!(result, Err(EditorError::NotFound(2))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_returns_previous_values() {
        let mut store = AnnotationStore::new();
        store.append("old", bbox(0));

        let (old_name, old_box) = store.update_by_id(1, "new", BoundingBox::new(0, 0, 5, 5)).unwrap();
        assert_eq!(old_name, "old");
        assert_eq!(old_box, bbox(0));

        let ann = store.find_by_id(1).unwrap();
        assert_eq!(ann.name, "new");
        // Stored normalized
        assert_eq!(ann.bbox, BoundingBox::new(0, 5, 5, 0));
    }

    #[test]
    fn test_update_rejects_overlap_but_not_self() {
        let mut store = AnnotationStore::new();
        store.append("a", bbox(0));
        store.append("b", bbox(20));

        // Growing inside its own footprint is fine
        assert!(store.update_by_id(1, "a", BoundingBox::new(0, 10, 15, 0)).is_ok());
        // Reaching into box 2 is not
        let result = store.update_by_id(1, "a", BoundingBox::new(0, 10, 25, 0));
        assert!(matches!(result, Err(EditorError::Overlap(2))));
        assert_eq!(store.find_by_id(1).unwrap().bbox, BoundingBox::new(0, 10, 15, 0));
    }

    #[test]
    fn test_update_keeping_box_ignores_existing_overlap() {
        let mut store = AnnotationStore::new();
        store.append("a", bbox(0));
        store.append("b", bbox(5));

        // Already overlapping, as an import can leave them
        store.update_by_id(2, "renamed", bbox(5)).unwrap();
        assert_eq!(store.find_by_id(2).unwrap().name, "renamed");
        // Unnormalized form of the same box counts as unchanged
        store.update_by_id(2, "again", BoundingBox::new(15, 0, 5, 10)).unwrap();
        // Moving it still has to clear box 1
        assert!(matches!(
            store.update_by_id(2, "again", bbox(6)),
            Err(EditorError::Overlap(1))
        ));
    }

    #[test]
    fn test_update_rejects_empty_and_missing() {
        let mut store = AnnotationStore::new();
        store.append("a", bbox(0));
        assert!(matches!(
            store.update_by_id(1, "a", BoundingBox::new(3, 10, 3, 0)),
            Err(EditorError::EmptyBox)
        ));
        assert!(matches!(
            store.update_by_id(5, "a", bbox(100)),
            Err(EditorError::NotFound(5))
        ));
    }

    #[test]
    fn test_clear_resets_counter() {
        let mut store = AnnotationStore::new();
        store.append("", bbox(0));
        store.append("", bbox(20));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 1);
    }

    proptest! {
        #[test]
        fn prop_ids_stay_contiguous(ops in prop::collection::vec((any::<bool>(), 0u32..12), 0..64)) {
            let mut store = AnnotationStore::new();
            for (index, (is_append, id)) in ops.into_iter().enumerate() {
                if is_append {
                    store.append(index.to_string(), bbox(index as i32 * 20));
                } else {
                    let _ = store.remove_by_id(id);
                }
                for (position, ann) in store.iter().enumerate() {
                    prop_assert_eq!(ann.id as usize, position + 1);
                }
                prop_assert_eq!(store.next_id() as usize, store.len() + 1);
            }
        }
    }
}
