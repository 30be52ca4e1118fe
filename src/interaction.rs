//! Pointer gesture handling for drawing and resizing boxes.
//!
//! A gesture is press, zero or more drags, then release. Presses inside an
//! existing annotation start a resize anchored at the corner farthest from
//! the press. Anything else starts a new box. The store is only touched on
//! release.

use crate::annotation::{Annotation, AnnotationId, AnnotationStore};
use crate::geometry::{BoundingBox, Point};
use crate::undo::{Command, UndoStack};

/// State for the gesture currently in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    /// No button held.
    #[default]
    Idle,
    /// Drawing a new box from `anchor` to `current`.
    Drawing { anchor: Point, current: Point },
    /// Redrawing an existing annotation. `anchor` is its farthest corner from
    /// the press and stays fixed, `original` is the annotation as it was.
    Resizing {
        anchor: Point,
        current: Point,
        original: Annotation,
    },
}

/// What a release did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// No gesture was in progress.
    Idle,
    /// A new annotation was appended.
    Added(AnnotationId),
    /// An existing annotation got a new box.
    Resized(AnnotationId),
    /// A new box overlapped something or had no area and was dropped.
    Discarded,
    /// A resize was rejected; the annotation keeps its old box.
    ResizeAborted(AnnotationId),
}

impl ReleaseOutcome {
    /// True if the store was mutated.
    pub fn is_commit(&self) -> bool {
        matches!(self, ReleaseOutcome::Added(_) | ReleaseOutcome::Resized(_))
    }
}

impl DragState {
    /// Check if a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        !matches!(self, DragState::Idle)
    }

    pub fn is_resizing(&self) -> bool {
        matches!(self, DragState::Resizing { .. })
    }

    /// Annotation that the renderer should hide while it is being resized.
    pub fn hidden_id(&self) -> Option<AnnotationId> {
        match self {
            DragState::Resizing { original, .. } => Some(original.id),
            _ => None,
        }
    }

    /// Live rectangle to draw for the current gesture. May have zero area.
    pub fn preview(&self) -> Option<BoundingBox> {
        match self {
            DragState::Idle => None,
            DragState::Drawing { anchor, current } | DragState::Resizing { anchor, current, .. } => {
                Some(BoundingBox::from_corners(*anchor, *current))
            }
        }
    }

    /// Start a gesture at `point` (image coordinates).
    pub fn press(&mut self, store: &AnnotationStore, point: Point) {
        if self.is_drawing() {
            log::debug!("Press while a gesture is active, restarting");
        }
        *self = match store.hit_vertex(point) {
            Some(hit) => {
                log::debug!(
                    "Resizing annotation {} anchored at ({}, {})",
                    hit.annotation.id,
                    hit.anchor.x,
                    hit.anchor.y
                );
                DragState::Resizing {
                    anchor: hit.anchor,
                    current: point,
                    original: hit.annotation.clone(),
                }
            }
            None => DragState::Drawing {
                anchor: point,
                current: point,
            },
        };
    }

    /// Move the free corner of the current gesture.
    pub fn drag(&mut self, point: Point) {
        match self {
            DragState::Idle => {}
            DragState::Drawing { current, .. } | DragState::Resizing { current, .. } => {
                *current = point;
            }
        }
    }

    /// Finish the gesture at `point`, commit it to `store` if it is valid and
    /// record the commit in `history`. Always returns to [`DragState::Idle`].
    pub fn release(
        &mut self,
        store: &mut AnnotationStore,
        history: &mut UndoStack,
        point: Point,
    ) -> ReleaseOutcome {
        match std::mem::take(self) {
            DragState::Idle => ReleaseOutcome::Idle,
            DragState::Drawing { anchor, .. } => {
                let bbox = BoundingBox::from_corners(anchor, point);
                if bbox.is_empty() {
                    log::debug!("Discarding zero-area box {}", bbox);
                    return ReleaseOutcome::Discarded;
                }
                if let Some(other) = store.first_collision(&bbox, None) {
                    log::debug!("Discarding box {}: overlaps annotation {}", bbox, other.id);
                    return ReleaseOutcome::Discarded;
                }
                let id = store.append("", bbox);
                history.push(Command::AddAnnotation {
                    annotation: Annotation::new(id, "", bbox),
                });
                ReleaseOutcome::Added(id)
            }
            DragState::Resizing {
                anchor, original, ..
            } => {
                let id = original.id;
                let bbox = BoundingBox::from_corners(anchor, point);
                if bbox.is_empty() {
                    log::debug!("Resize of {} aborted: zero-area box", id);
                    return ReleaseOutcome::ResizeAborted(id);
                }
                if let Some(other) = store.first_collision(&bbox, Some(id)) {
                    log::debug!("Resize of {} aborted: overlaps annotation {}", id, other.id);
                    return ReleaseOutcome::ResizeAborted(id);
                }
                match store.replace_by_id(id, original.name.clone(), bbox) {
                    Ok(previous) => {
                        history.push(Command::EditAnnotation { previous });
                        ReleaseOutcome::Resized(id)
                    }
                    Err(e) => {
                        log::warn!("Resize of {} aborted: {}", id, e);
                        ReleaseOutcome::ResizeAborted(id)
                    }
                }
            }
        }
    }

    /// Drop the current gesture without touching the store.
    pub fn cancel(&mut self) {
        *self = DragState::Idle;
    }
}
