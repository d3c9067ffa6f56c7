// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. project::ProjectStore)
    clippy::module_name_repetitions
)]

//! # Folio
//!
//! Project description tooling for a portfolio of daily builds.
//!
//! Folio covers the path a project description takes from the admin form to
//! the page:
//! - A small markup dialect (headings, bold, italic, code, images) rendered
//!   to typed display blocks
//! - A cursor-aware editor buffer with formatting toolbar actions
//! - Project records with form validation and a JSON file store
//! - Terminal rendering and a live preview that follows file changes
//!
//! ## Modules
//!
//! - [`markup`]: Description markup to display blocks
//! - [`editor`]: Selection-aware text buffer and toolbar actions
//! - [`project`]: Project records, drafts and storage
//! - [`image`]: Image files as data URIs
//! - [`terminal`]: Styled terminal output
//! - [`watcher`]: File watching
//! - [`config`]: Saved command-line defaults

pub mod config;
pub mod editor;
pub mod image;
pub mod markup;
pub mod perf;
pub mod project;
pub mod terminal;
pub mod watcher;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::editor::{EditorBuffer, FormatAction, Selection, ToolbarAction};
    pub use crate::markup::{DisplayBlock, InlineSpan, render};
    pub use crate::project::{Project, ProjectDraft, ProjectStore};
}
