//! Formatting toolbar operations over an [`EditorBuffer`].

use super::EditError;
use super::buffer::{EditorBuffer, PendingSelection, TextEdit};

/// Prefix, suffix and placeholder inserted by a formatting button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub placeholder: &'static str,
}

/// Text formatting buttons.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatAction {
    Bold,
    Italic,
    Code,
    CodeBlock,
    H1,
    H2,
}

impl FormatAction {
    pub const fn markers(self) -> Markers {
        match self {
            Self::Bold => Markers {
                prefix: "**",
                suffix: "**",
                placeholder: "bold text",
            },
            Self::Italic => Markers {
                prefix: "*",
                suffix: "*",
                placeholder: "italic text",
            },
            Self::Code => Markers {
                prefix: "`",
                suffix: "`",
                placeholder: "code",
            },
            Self::CodeBlock => Markers {
                prefix: "```\n",
                suffix: "\n```",
                placeholder: "code block",
            },
            Self::H1 => Markers {
                prefix: "# ",
                suffix: "",
                placeholder: "Heading",
            },
            Self::H2 => Markers {
                prefix: "## ",
                suffix: "",
                placeholder: "Subheading",
            },
        }
    }
}

/// Anything the toolbar can do to the description field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Format(FormatAction),
    Image {
        alt_text: String,
        source_ref: String,
    },
}

impl From<FormatAction> for ToolbarAction {
    fn from(action: FormatAction) -> Self {
        Self::Format(action)
    }
}

/// Build the edit that wraps the selection (or a placeholder) in markers.
///
/// The caret lands right after the suffix.
pub fn wrap_edit(buffer: &EditorBuffer, prefix: &str, suffix: &str, placeholder: &str) -> TextEdit {
    let selection = buffer.selection();
    let body = if selection.is_caret() {
        placeholder.to_string()
    } else {
        buffer.selected_text()
    };
    TextEdit::replace(selection, format!("{prefix}{body}{suffix}"))
}

/// Wrap the selection in `prefix`/`suffix`, or insert
/// `prefix + placeholder + suffix` at the caret.
///
/// The text changes immediately. The caret position is carried by the
/// returned token and becomes visible once the host restores it.
pub fn wrap_selection(
    buffer: &mut EditorBuffer,
    prefix: &str,
    suffix: &str,
    placeholder: &str,
) -> PendingSelection {
    let edit = wrap_edit(buffer, prefix, suffix, placeholder);
    buffer.apply_text_mutation(edit)
}

/// Insert `![alt_text](source_ref)` at the caret.
///
/// Any selected text is left in place; the markup goes in at the start of
/// the selection.
pub fn insert_image_markup(
    buffer: &mut EditorBuffer,
    alt_text: &str,
    source_ref: &str,
) -> PendingSelection {
    let at = buffer.selection().start;
    buffer.apply_text_mutation(TextEdit::insert(at, image_markup(alt_text, source_ref)))
}

/// The markup for an image paragraph.
pub fn image_markup(alt_text: &str, source_ref: &str) -> String {
    format!("![{alt_text}]({source_ref})")
}

/// Apply a toolbar action to the field, if one is open.
///
/// # Errors
/// Returns [`EditError::NoTarget`] when there is no buffer to edit.
pub fn apply_to(
    target: Option<&mut EditorBuffer>,
    action: &ToolbarAction,
) -> Result<PendingSelection, EditError> {
    let Some(buffer) = target else {
        tracing::warn!(?action, "toolbar action with no open description field");
        return Err(EditError::NoTarget);
    };
    let pending = match action {
        ToolbarAction::Format(format) => {
            let m = format.markers();
            wrap_selection(buffer, m.prefix, m.suffix, m.placeholder)
        }
        ToolbarAction::Image {
            alt_text,
            source_ref,
        } => insert_image_markup(buffer, alt_text, source_ref),
    };
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Selection;

    fn buffer(text: &str, start: usize, end: usize) -> EditorBuffer {
        let mut buf = EditorBuffer::from_text(text);
        buf.set_selection(start, end);
        buf
    }

    #[test]
    fn test_wrap_selected_text() {
        let mut buf = buffer("hello", 0, 5);
        let pending = wrap_selection(&mut buf, "**", "**", "bold");
        assert_eq!(buf.text(), "**hello**");
        assert!(buf.restore_selection(pending));
        assert_eq!(buf.selection(), Selection::caret(9));
    }

    #[test]
    fn test_wrap_empty_buffer_inserts_placeholder() {
        let mut buf = EditorBuffer::empty();
        let pending = wrap_selection(&mut buf, "*", "*", "italic");
        assert_eq!(buf.text(), "*italic*");
        assert_eq!(pending.selection(), Selection::caret(8));
    }

    #[test]
    fn test_wrap_in_middle_of_text() {
        let mut buf = buffer("a big cat", 2, 5);
        let sel = buf.apply(wrap_edit(&buf, "*", "*", "x"));
        assert_eq!(buf.text(), "a *big* cat");
        assert_eq!(sel, Selection::caret(7));
    }

    #[test]
    fn test_wrap_twice_inserts_twice() {
        let mut buf = EditorBuffer::empty();
        let first = wrap_selection(&mut buf, "**", "**", "b");
        buf.restore_selection(first);
        let second = wrap_selection(&mut buf, "**", "**", "b");
        buf.restore_selection(second);
        assert_eq!(buf.text(), "**b****b**");
        assert_eq!(buf.selection(), Selection::caret(10));
    }

    #[test]
    fn test_wrap_counts_multibyte_as_chars() {
        let mut buf = buffer("café", 0, 4);
        let pending = wrap_selection(&mut buf, "`", "`", "code");
        assert_eq!(buf.text(), "`café`");
        assert_eq!(pending.selection(), Selection::caret(6));
    }

    #[test]
    fn test_insert_image_at_caret() {
        let mut buf = buffer("ab", 1, 1);
        let pending = insert_image_markup(&mut buf, "cat", "x.png");
        assert_eq!(buf.text(), "a![cat](x.png)b");
        assert_eq!(pending.selection(), Selection::caret(14));
    }

    #[test]
    fn test_insert_image_keeps_selected_text() {
        let mut buf = buffer("hello", 1, 4);
        let pending = insert_image_markup(&mut buf, "", "u");
        assert_eq!(buf.text(), "h![](u)ello");
        assert_eq!(pending.selection(), Selection::caret(7));
    }

    #[test]
    fn test_heading_button_inserts_block_prefix() {
        let mut buf = EditorBuffer::empty();
        let pending = apply_to(Some(&mut buf), &FormatAction::H2.into()).unwrap();
        assert_eq!(buf.text(), "## Subheading");
        assert_eq!(pending.selection(), Selection::caret(13));
    }

    #[test]
    fn test_code_block_button_wraps_selection() {
        let mut buf = buffer("let x = 1;", 0, 10);
        let _ = apply_to(Some(&mut buf), &FormatAction::CodeBlock.into()).unwrap();
        assert_eq!(buf.text(), "```\nlet x = 1;\n```");
    }

    #[test]
    fn test_apply_to_image_action() {
        let mut buf = EditorBuffer::empty();
        let action = ToolbarAction::Image {
            alt_text: "shot".to_string(),
            source_ref: "data:image/png;base64,AA==".to_string(),
        };
        let _ = apply_to(Some(&mut buf), &action).unwrap();
        assert_eq!(buf.text(), "![shot](data:image/png;base64,AA==)");
    }

    #[test]
    fn test_apply_to_without_target_reports_no_target() {
        let result = apply_to(None, &FormatAction::Bold.into());
        assert_eq!(result, Err(EditError::NoTarget));
    }
}
