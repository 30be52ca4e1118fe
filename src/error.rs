//! Error types for editing operations.

use thiserror::Error;

use crate::annotation::AnnotationId;
use crate::format::FormatError;

/// Errors returned by store mutations and session calls.
///
/// None of these are fatal: the caller is expected to leave its view as it
/// was and, at most, tell the user why the edit did not apply.
#[derive(Error, Debug)]
pub enum EditorError {
    /// The referenced annotation id does not exist in the store
    #[error("Annotation not found: {0}")]
    NotFound(AnnotationId),

    /// The candidate box intersects an existing annotation
    #[error("Box overlaps annotation {0}")]
    Overlap(AnnotationId),

    /// The candidate box has zero width or height
    #[error("Box has zero width or height")]
    EmptyBox,

    /// A persisted record could not be read
    #[error("Parse error: {0}")]
    Parse(#[from] FormatError),
}
