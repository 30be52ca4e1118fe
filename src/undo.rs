//! Undo/Redo system for annotation operations.
//!
//! This module implements the Command pattern to enable undo/redo functionality
//! for annotation edits. Each command stores an owned snapshot of the
//! annotation it touched, so later edits to the live store cannot change what
//! an entry restores.
//!
//! Ids in the snapshots are positional ids at the time the command was
//! recorded. Replaying a command re-derives the store position from that id.

use crate::annotation::{Annotation, AnnotationStore};
use crate::error::EditorError;

// ============================================================================
// Command Types
// ============================================================================

/// A recorded store mutation that can be undone and redone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// An annotation was appended
    AddAnnotation {
        /// The annotation as it was added
        annotation: Annotation,
    },
    /// An annotation was deleted
    RemoveAnnotation {
        /// The annotation that was removed (stored for undo)
        annotation: Annotation,
    },
    /// An annotation's name or box changed
    EditAnnotation {
        /// The annotation before the edit
        previous: Annotation,
    },
}

impl Command {
    /// Get a human-readable description of this command
    pub fn description(&self) -> String {
        match self {
            Command::AddAnnotation { .. } => "Add annotation".to_string(),
            Command::RemoveAnnotation { .. } => "Delete annotation".to_string(),
            Command::EditAnnotation { .. } => "Edit annotation".to_string(),
        }
    }
}

// ============================================================================
// Undo Stack
// ============================================================================

/// History limits.
#[derive(Debug, Clone)]
pub struct UndoConfig {
    /// Oldest entries beyond this depth are dropped on push
    pub max_history: usize,
}

impl Default for UndoConfig {
    fn default() -> Self {
        Self { max_history: 100 }
    }
}

/// Linear edit history over an [`AnnotationStore`].
///
/// Entries are snapshots, not diffs. Undoing an entry applies it to the
/// store and pushes a fresh snapshot of what it replaced onto the redo side:
/// an undone edit records the post-edit annotation, an undone add records the
/// annotation as it was removed. Redo does the same in the other direction.
/// Recording a new command discards everything on the redo side.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    undo_stack: Vec<Command>,
    redo_stack: Vec<Command>,
    config: UndoConfig,
}

impl UndoStack {
    /// Create a new empty undo stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom configuration
    pub fn with_config(config: UndoConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Record a command that has already been applied to the store.
    pub fn push(&mut self, command: Command) {
        log::debug!("📝 Undo: pushed '{}'", command.description());
        self.undo_stack.push(command);
        self.redo_stack.clear();

        // Limit history size
        if self.undo_stack.len() > self.config.max_history {
            let excess = self.undo_stack.len() - self.config.max_history;
            self.undo_stack.drain(..excess);
        }
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.last().map(|c| c.description())
    }

    /// Get the description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.last().map(|c| c.description())
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        log::debug!("🗑️ Undo history cleared");
    }

    /// Get the number of commands in undo history
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in redo history
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo the most recent command against `store`.
    ///
    /// Returns true if the store changed. A command that no longer fits the
    /// store is dropped from history with a warning.
    pub fn undo(&mut self, store: &mut AnnotationStore) -> bool {
        let Some(cmd) = self.undo_stack.pop() else {
            return false;
        };
        log::debug!("⏪ Undo: reverting '{}'", cmd.description());

        match apply_undo(&cmd, store) {
            Ok(redo) => {
                self.redo_stack.push(redo);
                true
            }
            Err(e) => {
                log::warn!("Dropping '{}' from history: {}", cmd.description(), e);
                false
            }
        }
    }

    /// Redo the most recently undone command against `store`.
    pub fn redo(&mut self, store: &mut AnnotationStore) -> bool {
        let Some(cmd) = self.redo_stack.pop() else {
            return false;
        };
        log::debug!("⏩ Redo: reapplying '{}'", cmd.description());

        match apply_redo(&cmd, store) {
            Ok(undo) => {
                self.undo_stack.push(undo);
                true
            }
            Err(e) => {
                log::warn!("Dropping '{}' from history: {}", cmd.description(), e);
                false
            }
        }
    }
}

// ============================================================================
// Undo/Redo Execution
// ============================================================================

/// Reverse a command. Returns the command to push onto the redo stack.
fn apply_undo(cmd: &Command, store: &mut AnnotationStore) -> Result<Command, EditorError> {
    match cmd {
        Command::AddAnnotation { annotation } => {
            // Undo add = remove
            let removed = store.remove_by_id(annotation.id)?;
            log::debug!("⏪ Undid add annotation {}", annotation.id);
            Ok(Command::AddAnnotation {
                annotation: removed,
            })
        }
        Command::RemoveAnnotation { annotation } => {
            // Undo remove = put back at its old position
            store.restore(annotation.clone())?;
            log::debug!("⏪ Undid remove annotation {}", annotation.id);
            Ok(cmd.clone())
        }
        Command::EditAnnotation { previous } => {
            let current = swap_in(previous, store)?;
            log::debug!("⏪ Restored snapshot of {}, kept replaced state for redo", previous.id);
            Ok(Command::EditAnnotation { previous: current })
        }
    }
}

/// Re-apply a command. Returns the command to push back onto the undo stack.
fn apply_redo(cmd: &Command, store: &mut AnnotationStore) -> Result<Command, EditorError> {
    match cmd {
        Command::AddAnnotation { annotation } => {
            store.restore(annotation.clone())?;
            log::debug!("⏩ Redid add annotation {}", annotation.id);
            Ok(cmd.clone())
        }
        Command::RemoveAnnotation { annotation } => {
            let removed = store.remove_by_id(annotation.id)?;
            log::debug!("⏩ Redid remove annotation {}", annotation.id);
            Ok(Command::RemoveAnnotation {
                annotation: removed,
            })
        }
        Command::EditAnnotation { previous } => {
            let current = swap_in(previous, store)?;
            log::debug!("⏩ Restored snapshot of {}, kept replaced state for undo", previous.id);
            Ok(Command::EditAnnotation { previous: current })
        }
    }
}

/// Write a snapshot's name and box back under its id, returning what was there.
fn swap_in(snapshot: &Annotation, store: &mut AnnotationStore) -> Result<Annotation, EditorError> {
    store.replace_by_id(snapshot.id, snapshot.name.clone(), snapshot.bbox)
}

// ============================================================================
// Tests
// ============================================================================
