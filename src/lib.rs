//! boxlabel - rectangle annotation editing core
//!
//! Keeps an ordered set of named, non-overlapping boxes for one image, turns
//! pointer gestures into draws and corner-drag resizes, and tracks every
//! change in a linear undo/redo history. Rendering and widgets belong to the
//! caller, which drives an [`EditorSession`] and redraws from the
//! [`SessionEvent`]s it emits.

pub mod annotation;
pub mod collision;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod geometry;
pub mod interaction;
pub mod session;
pub mod undo;

pub use annotation::{Annotation, AnnotationId, AnnotationStore};
pub use config::{EditorConfig, LogLevel};
pub use error::EditorError;
pub use event::SessionEvent;
pub use geometry::{BoundingBox, Point};
pub use interaction::{DragState, ReleaseOutcome};
pub use session::{EditorSession, ImageSize};
pub use undo::{Command, UndoStack};
