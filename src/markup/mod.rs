//! Description markup rendering.
//!
//! Project descriptions are stored as one string column and written in a
//! small markdown-like dialect:
//!
//! | Marker | Meaning |
//! |---|---|
//! | `# text` / `## text` | Heading (paragraph-initial only) |
//! | `**text**` | Bold |
//! | `*text*` | Italic |
//! | `` `text` `` | Inline code |
//! | ```` ```text``` ```` | Code block, rendered verbatim |
//! | `![alt](ref)` | Image, only as a whole paragraph |
//! | blank line | Paragraph separator |
//!
//! Rendering is pure and holds no state between calls.

mod inline;
pub mod lexer;
mod parser;
mod types;

pub use inline::scan_inline;
pub use parser::render;
pub use types::{BlockKey, DisplayBlock, HeadingLevel, InlineSpan, RenderedDescription, SpanKey};

/// Shown by the live preview while the description is empty.
pub const PREVIEW_PLACEHOLDER: &str = "Your formatted description will appear here...";

/// Render `input` and attach rendering keys.
pub fn render_description(input: &str) -> RenderedDescription {
    RenderedDescription::new(render(input))
}

/// Render for the editor's live preview pane.
///
/// A blank description shows [`PREVIEW_PLACEHOLDER`] instead of nothing.
pub fn render_preview(input: &str) -> Vec<DisplayBlock> {
    if input.trim().is_empty() {
        render(PREVIEW_PLACEHOLDER)
    } else {
        render(input)
    }
}

/// Plain-text excerpt of a description for listings.
///
/// Takes the first paragraph, or the first heading when there is no
/// paragraph, and cuts it to `max_chars` characters with `...` appended.
pub fn summary(input: &str, max_chars: usize) -> String {
    let blocks = render(input);
    let source = blocks
        .iter()
        .find(|b| matches!(b, DisplayBlock::Paragraph { .. }))
        .or_else(|| {
            blocks
                .iter()
                .find(|b| matches!(b, DisplayBlock::Heading { .. }))
        });
    let Some(block) = source else {
        return String::new();
    };

    let text = block.plain_text();
    if text.chars().count() <= max_chars {
        return text;
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
