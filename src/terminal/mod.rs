//! Draw rendered descriptions to a terminal.

mod style;

use std::io::{self, Write};

use crossterm::style::ContentStyle;
use unicode_width::UnicodeWidthStr;

use crate::image::data_uri_mime;
use crate::markup::DisplayBlock;

pub use style::Theme;

const TAB: &str = "    ";

/// Writes display blocks as styled terminal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalRenderer {
    color: bool,
    theme: Theme,
}

impl TerminalRenderer {
    pub const fn new(color: bool, theme: Theme) -> Self {
        Self { color, theme }
    }

    /// A renderer that emits no escape codes.
    pub fn plain() -> Self {
        Self::new(false, Theme::default())
    }

    /// Write `blocks` separated by blank lines.
    ///
    /// # Errors
    /// Propagates write failures from `out`.
    pub fn write_blocks<W: Write>(&self, out: &mut W, blocks: &[DisplayBlock]) -> io::Result<()> {
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                writeln!(out)?;
            }
            match block {
                DisplayBlock::Heading { level, spans } => {
                    let base = self.theme.heading(*level);
                    // Keep the marker visible so levels stay distinct without color.
                    self.write_styled(out, level.prefix(), base)?;
                    for span in spans {
                        self.write_styled(out, span.value(), self.theme.inline(base, span))?;
                    }
                    writeln!(out)?;
                }
                DisplayBlock::Paragraph { spans } => {
                    for span in spans {
                        let style = self.theme.inline(ContentStyle::new(), span);
                        self.write_styled(out, span.value(), style)?;
                    }
                    writeln!(out)?;
                }
                DisplayBlock::Image {
                    alt_text,
                    source_ref,
                } => {
                    let label = image_label(alt_text, source_ref);
                    self.write_styled(out, &label, self.theme.image)?;
                    writeln!(out)?;
                }
                DisplayBlock::CodeBlock { literal_text } => {
                    for line in code_box(literal_text) {
                        self.write_styled(out, &line, self.theme.code_block)?;
                        writeln!(out)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Render `blocks` into a string.
    pub fn render_to_string(&self, blocks: &[DisplayBlock]) -> String {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_blocks(&mut out, blocks);
        String::from_utf8_lossy(&out).into_owned()
    }

    fn write_styled<W: Write>(&self, out: &mut W, text: &str, style: ContentStyle) -> io::Result<()> {
        if self.color && style != ContentStyle::new() {
            write!(out, "{}", style.apply(text))
        } else {
            out.write_all(text.as_bytes())
        }
    }
}

/// Placeholder text for an image.
fn image_label(alt_text: &str, source_ref: &str) -> String {
    if !alt_text.is_empty() {
        return format!("[Image: {alt_text}]");
    }
    match data_uri_mime(source_ref) {
        Some(mime) => format!("[Image: embedded {mime}]"),
        None => format!("[Image: {source_ref}]"),
    }
}

/// Frame code lines in a box padded to the widest line.
fn code_box(literal_text: &str) -> Vec<String> {
    let mut lines: Vec<String> = literal_text
        .lines()
        .map(|line| line.replace('\t', TAB))
        .collect();
    if lines.is_empty() {
        lines.push(String::new());
    }
    let width = lines.iter().map(|l| l.width()).max().unwrap_or(0);

    let mut framed = Vec::with_capacity(lines.len() + 2);
    framed.push(format!("┌{}┐", "─".repeat(width + 2)));
    for line in lines {
        let padding = " ".repeat(width - line.width());
        framed.push(format!("│ {line}{padding} │"));
    }
    framed.push(format!("└{}┘", "─".repeat(width + 2)));
    framed
}
