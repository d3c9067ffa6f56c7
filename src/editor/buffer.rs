use ropey::Rope;

use super::EditError;

/// A selection range in char offsets, always normalized so `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection between two offsets in either order.
    pub const fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A zero-width selection at `offset`.
    pub const fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub const fn is_caret(&self) -> bool {
        self.start == self.end
    }

    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    pub const fn is_empty(&self) -> bool {
        self.is_caret()
    }

    /// Clamp both ends into `0..=len`.
    const fn clamped(self, len: usize) -> Self {
        let start = if self.start > len { len } else { self.start };
        let end = if self.end > len { len } else { self.end };
        Self { start, end }
    }
}

impl From<std::ops::Range<usize>> for Selection {
    fn from(r: std::ops::Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

/// A text replacement plus where the caret belongs once it is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Chars to replace.
    pub range: Selection,
    /// Replacement text.
    pub text: String,
    /// Caret offset in the mutated text.
    pub caret: usize,
}

impl TextEdit {
    /// Replace `range` with `text`, caret after the inserted text.
    pub fn replace(range: Selection, text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = range.start + text.chars().count();
        Self { range, text, caret }
    }

    /// Insert `text` at `offset`, caret after it.
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(Selection::caret(offset), text)
    }

    /// Override the caret position.
    #[must_use]
    pub const fn with_caret(mut self, caret: usize) -> Self {
        self.caret = caret;
        self
    }
}

/// Selection to apply once the host has committed the new text.
///
/// Returned by [`EditorBuffer::apply_text_mutation`]. Hand it back through
/// [`EditorBuffer::restore_selection`] after the text control has redrawn.
#[must_use = "the selection is not moved until the pending selection is restored"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSelection {
    selection: Selection,
    revision: u64,
}

impl PendingSelection {
    /// The selection this token will restore.
    pub const fn selection(&self) -> Selection {
        self.selection
    }
}

/// The description field's text plus its selection.
///
/// Offsets are char offsets. `0 <= start <= end <= len_chars()` holds after
/// every operation.
pub struct EditorBuffer {
    rope: Rope,
    selection: Selection,
    revision: u64,
    dirty: bool,
}

impl EditorBuffer {
    /// Create a new buffer from a string, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::default(),
            revision: 0,
            dirty: false,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }

    /// The current selection.
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// The selected text (empty for a caret).
    pub fn selected_text(&self) -> String {
        self.rope
            .slice(self.selection.start..self.selection.end)
            .to_string()
    }

    /// Whether the buffer has been modified since creation or last save.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark the buffer as clean (e.g., after saving).
    pub const fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Select `start..end`, clamped to the buffer.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        self.selection = Selection::new(start, end).clamped(self.len_chars());
    }

    /// Select `start..end`, rejecting offsets past the end of the buffer.
    ///
    /// # Errors
    /// Returns [`EditError::OutOfRange`] when either offset exceeds the length.
    pub fn try_select(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        let len = self.len_chars();
        let selection = Selection::new(start, end);
        if selection.end > len {
            return Err(EditError::OutOfRange {
                start: selection.start,
                end: selection.end,
                len,
            });
        }
        self.selection = selection;
        Ok(())
    }

    /// Move the caret, clearing any selection.
    pub fn move_caret(&mut self, offset: usize) {
        self.set_selection(offset, offset);
    }

    /// Select the whole buffer.
    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.len_chars());
    }

    /// Phase one of an edit: change the text now.
    ///
    /// The current selection is kept (clamped) until the returned token is
    /// passed to [`Self::restore_selection`].
    pub fn apply_text_mutation(&mut self, edit: TextEdit) -> PendingSelection {
        let len = self.len_chars();
        let range = edit.range.clamped(len);
        if !range.is_empty() {
            self.rope.remove(range.start..range.end);
        }
        if !edit.text.is_empty() {
            self.rope.insert(range.start, &edit.text);
        }

        let new_len = self.len_chars();
        self.revision += 1;
        self.dirty = true;
        self.selection = self.selection.clamped(new_len);

        tracing::debug!(
            start = range.start,
            end = range.end,
            inserted = edit.text.len(),
            revision = self.revision,
            "applied text mutation"
        );

        PendingSelection {
            selection: Selection::caret(edit.caret).clamped(new_len),
            revision: self.revision,
        }
    }

    /// Phase two of an edit: place the selection once the text is visible.
    ///
    /// Returns `false` and leaves the selection alone when the buffer has
    /// been mutated again since the token was issued.
    pub fn restore_selection(&mut self, pending: PendingSelection) -> bool {
        if pending.revision != self.revision {
            tracing::warn!(
                pending = pending.revision,
                current = self.revision,
                "discarding stale selection restore"
            );
            return false;
        }
        self.selection = pending.selection.clamped(self.len_chars());
        true
    }

    /// Apply an edit and restore its selection immediately.
    ///
    /// For hosts with no redraw cycle between the two phases.
    pub fn apply(&mut self, edit: TextEdit) -> Selection {
        let pending = self.apply_text_mutation(edit);
        self.restore_selection(pending);
        self.selection
    }

    /// Type `s` over the selection.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() && self.selection.is_caret() {
            return;
        }
        self.apply(TextEdit::replace(self.selection, s));
    }

    /// Delete the selection, or the character before the caret (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        let range = if self.selection.is_caret() {
            if self.selection.start == 0 {
                return false;
            }
            Selection::new(self.selection.start - 1, self.selection.start)
        } else {
            self.selection
        };
        self.apply(TextEdit::replace(range, ""));
        true
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field("rope", &format_args!("Rope({} chars)", self.rope.len_chars()))
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish()
    }
}
