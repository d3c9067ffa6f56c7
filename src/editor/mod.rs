//! Cursor-aware editing for the description field.
//!
//! Provides a rope-backed text buffer with a selection range and the
//! formatting toolbar operations that insert markup around it.
//!
//! Edits are two-phase: the text changes immediately and the caret position
//! comes back as a [`PendingSelection`] that the host restores once its text
//! control shows the new content.

mod buffer;
mod toolbar;

pub use buffer::{EditorBuffer, PendingSelection, Selection, TextEdit};
pub use toolbar::{
    FormatAction, Markers, ToolbarAction, apply_to, image_markup, insert_image_markup, wrap_edit,
    wrap_selection,
};

/// Errors surfaced to the editing host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    /// A toolbar action arrived while no description field is open.
    #[error("no description field is open to edit")]
    NoTarget,
    #[error("selection {start}..{end} is outside the text ({len} chars)")]
    OutOfRange { start: usize, end: usize, len: usize },
}
