//! Notifications emitted by [`crate::EditorSession`] for the UI layer.

use serde::Serialize;

use crate::annotation::{Annotation, AnnotationId};
use crate::config::Rgb;
use crate::geometry::BoundingBox;

/// Something the list view or canvas should react to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The store changed. Carries the full sequence for a list refresh and redraw.
    AnnotationsChanged { annotations: Vec<Annotation> },
    /// An annotation was selected from outside (e.g. a list row).
    SelectionDetail {
        id: AnnotationId,
        name: String,
        bbox: BoundingBox,
    },
    /// The live drag rectangle moved. `hidden` is the annotation being
    /// resized, which should not be drawn until the gesture ends.
    PreviewChanged {
        preview: Option<BoundingBox>,
        hidden: Option<AnnotationId>,
    },
    /// Scale or colors changed and everything needs a redraw.
    ViewChanged {
        scale: f64,
        number_color: Rgb,
        square_color: Rgb,
    },
}
