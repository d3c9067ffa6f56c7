//! Display types produced by the description formatter.

use serde::Serialize;

/// Heading depth. The dialect only knows `# ` and `## `.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingLevel {
    One,
    Two,
}

impl HeadingLevel {
    /// Numeric level (1 or 2).
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// The paragraph prefix that introduces this heading.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::One => "# ",
            Self::Two => "## ",
        }
    }
}

/// A styled run of text inside a heading or paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InlineSpan {
    PlainText(String),
    Bold(String),
    Italic(String),
    InlineCode(String),
}

impl InlineSpan {
    /// The span's text without markers.
    pub fn value(&self) -> &str {
        match self {
            Self::PlainText(v) | Self::Bold(v) | Self::Italic(v) | Self::InlineCode(v) => v,
        }
    }
}

/// One structural unit of rendered output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayBlock {
    Heading {
        level: HeadingLevel,
        spans: Vec<InlineSpan>,
    },
    Paragraph {
        spans: Vec<InlineSpan>,
    },
    /// `source_ref` is either a URL or a `data:` URI.
    Image {
        alt_text: String,
        source_ref: String,
    },
    /// Fenced content, trimmed, never inline-formatted.
    CodeBlock {
        literal_text: String,
    },
}

impl DisplayBlock {
    /// Inline spans of headings and paragraphs; empty for images and code.
    pub fn spans(&self) -> &[InlineSpan] {
        match self {
            Self::Heading { spans, .. } | Self::Paragraph { spans } => spans,
            Self::Image { .. } | Self::CodeBlock { .. } => &[],
        }
    }

    /// Flatten the block to unstyled text.
    ///
    /// Images flatten to their alt text.
    pub fn plain_text(&self) -> String {
        match self {
            Self::Heading { spans, .. } | Self::Paragraph { spans } => {
                spans.iter().map(InlineSpan::value).collect()
            }
            Self::Image { alt_text, .. } => alt_text.clone(),
            Self::CodeBlock { literal_text } => literal_text.clone(),
        }
    }
}

/// Rendering key of a block: its position in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BlockKey(pub usize);

/// Rendering key of a span: owning block plus position within the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SpanKey {
    pub block: BlockKey,
    pub span: usize,
}

/// A rendered description with keys for the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedDescription {
    blocks: Vec<DisplayBlock>,
}

impl RenderedDescription {
    pub(crate) const fn new(blocks: Vec<DisplayBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[DisplayBlock] {
        &self.blocks
    }

    pub fn into_blocks(self) -> Vec<DisplayBlock> {
        self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Blocks paired with their keys, in source order.
    pub fn keyed(&self) -> impl Iterator<Item = (BlockKey, &DisplayBlock)> {
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (BlockKey(i), block))
    }

    /// Spans of one block paired with their keys.
    pub fn keyed_spans(&self, key: BlockKey) -> impl Iterator<Item = (SpanKey, &InlineSpan)> {
        self.blocks
            .get(key.0)
            .map(DisplayBlock::spans)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(move |(span, s)| (SpanKey { block: key, span }, s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_prefixes() {
        assert_eq!(HeadingLevel::One.prefix(), "# ");
        assert_eq!(HeadingLevel::Two.prefix(), "## ");
        assert_eq!(HeadingLevel::Two.as_u8(), 2);
    }

    #[test]
    fn test_plain_text_flattens_spans() {
        let block = DisplayBlock::Paragraph {
            spans: vec![
                InlineSpan::PlainText("a ".to_string()),
                InlineSpan::Bold("b".to_string()),
                InlineSpan::InlineCode(" c".to_string()),
            ],
        };
        assert_eq!(block.plain_text(), "a b c");
    }

    #[test]
    fn test_image_plain_text_is_alt() {
        let block = DisplayBlock::Image {
            alt_text: "cat".to_string(),
            source_ref: "x.png".to_string(),
        };
        assert_eq!(block.plain_text(), "cat");
        assert!(block.spans().is_empty());
    }

    #[test]
    fn test_keyed_spans_are_unique_per_block() {
        let doc = RenderedDescription::new(vec![
            DisplayBlock::Paragraph {
                spans: vec![
                    InlineSpan::PlainText("a".to_string()),
                    InlineSpan::Italic("b".to_string()),
                ],
            },
            DisplayBlock::Paragraph {
                spans: vec![InlineSpan::PlainText("c".to_string())],
            },
        ]);
        let mut keys: Vec<SpanKey> = doc
            .keyed()
            .flat_map(|(key, _)| doc.keyed_spans(key).map(|(k, _)| k))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 3);
    }

    #[test]
    fn test_keyed_spans_out_of_range_is_empty() {
        let doc = RenderedDescription::default();
        assert_eq!(doc.keyed_spans(BlockKey(4)).count(), 0);
    }

    #[test]
    fn test_serializes_tagged_json() {
        let block = DisplayBlock::Heading {
            level: HeadingLevel::One,
            spans: vec![InlineSpan::Bold("x".to_string())],
        };
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["kind"], "heading");
        assert_eq!(json["level"], "one");
        assert_eq!(json["spans"][0]["kind"], "bold");
        assert_eq!(json["spans"][0]["value"], "x");
    }
}
