//! Block assembly: fences, paragraphs, headings and images.

use super::inline::scan_inline;
use super::lexer::{Segment, is_line_terminator, split_fences};
use super::types::{DisplayBlock, HeadingLevel};

/// Render raw description text into display blocks.
///
/// Total over any input: anything that does not match a recognized form
/// falls through to a plain paragraph.
pub fn render(input: &str) -> Vec<DisplayBlock> {
    let mut blocks = Vec::new();
    for segment in split_fences(input) {
        match segment {
            Segment::Code(content) => blocks.push(DisplayBlock::CodeBlock {
                literal_text: content.trim().to_string(),
            }),
            Segment::Text(text) => {
                blocks.extend(split_paragraphs(text).into_iter().map(classify));
            }
        }
    }
    tracing::trace!(bytes = input.len(), blocks = blocks.len(), "rendered description");
    blocks
}

/// Split on runs of two or more `\n`, dropping blank candidates.
fn split_paragraphs(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut candidates = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\n' && bytes.get(i + 1) == Some(&b'\n') {
            let mut run_end = i + 2;
            while bytes.get(run_end) == Some(&b'\n') {
                run_end += 1;
            }
            candidates.push(&text[start..i]);
            start = run_end;
            i = run_end;
        } else {
            i += 1;
        }
    }
    candidates.push(&text[start..]);

    candidates.retain(|c| !c.trim().is_empty());
    candidates
}

fn classify(candidate: &str) -> DisplayBlock {
    let lead = candidate.trim_start();

    for level in [HeadingLevel::One, HeadingLevel::Two] {
        if let Some(rest) = lead.strip_prefix(level.prefix()) {
            return DisplayBlock::Heading {
                level,
                spans: scan_inline(rest.trim_end()),
            };
        }
    }

    let body = lead.trim_end();
    if let Some((alt_text, source_ref)) = match_image(body) {
        return DisplayBlock::Image {
            alt_text: alt_text.to_string(),
            source_ref: source_ref.to_string(),
        };
    }

    DisplayBlock::Paragraph {
        spans: scan_inline(body),
    }
}

/// Match a whole paragraph of the form `![alt](ref)`.
///
/// `alt` ends at the first `](`; `ref` runs to the final `)`. Neither may
/// contain a line break.
fn match_image(body: &str) -> Option<(&str, &str)> {
    if body.contains(is_line_terminator) {
        return None;
    }
    let inner = body.strip_prefix("![")?.strip_suffix(')')?;
    let split = inner.find("](")?;
    Some((&inner[..split], &inner[split + 2..]))
}
