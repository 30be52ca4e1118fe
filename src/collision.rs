//! Hit testing against the annotation store.
//!
//! Two queries drive editing:
//! - [`AnnotationStore::hit_square`] vetoes any committed box that would
//!   overlap an existing one.
//! - [`AnnotationStore::hit_vertex`] decides whether a press starts a resize
//!   of an existing annotation, and from which corner.

use crate::annotation::{Annotation, AnnotationId, AnnotationStore};
use crate::geometry::{BoundingBox, Point};

/// Result of a vertex hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexHit<'a> {
    /// The first annotation in store order containing the point.
    pub annotation: &'a Annotation,
    /// Corner of that annotation farthest from the point. A resize drag
    /// stays anchored here while the opposite corner follows the pointer.
    pub anchor: Point,
}

impl AnnotationStore {
    /// First annotation, in store order, whose box overlaps `bbox`.
    ///
    /// `skip_id` excludes one annotation, typically the one being edited.
    pub fn first_collision(
        &self,
        bbox: &BoundingBox,
        skip_id: Option<AnnotationId>,
    ) -> Option<&Annotation> {
        self.iter()
            .filter(|ann| Some(ann.id) != skip_id)
            .find(|ann| ann.bbox.overlaps(bbox))
    }

    /// Check whether `bbox` overlaps any annotation other than `skip_id`.
    pub fn hit_square(&self, bbox: &BoundingBox, skip_id: Option<AnnotationId>) -> bool {
        self.first_collision(bbox, skip_id).is_some()
    }

    /// Find the annotation under a point and its farthest corner.
    ///
    /// The earliest annotation in store order wins when boxes overlap or
    /// share an edge.
    pub fn hit_vertex(&self, point: Point) -> Option<VertexHit<'_>> {
        self.iter()
            .find(|ann| ann.bbox.contains(point))
            .map(|annotation| VertexHit {
                annotation,
                anchor: annotation.bbox.farthest_corner(point),
            })
    }
}
