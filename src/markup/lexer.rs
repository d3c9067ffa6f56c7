//! Single-pass scanners for the description dialect.
//!
//! Two scans run over raw text:
//! - [`split_fences`] cuts the input into fenced code regions and the text
//!   between them, before anything else looks at those bytes.
//! - [`tokenize`] turns one paragraph into marker and text tokens for the
//!   inline assembler.

/// Fence delimiter for code blocks.
pub const FENCE: &str = "```";

/// Kind of an inline token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A single `*`.
    Star,
    /// A single `` ` ``.
    Backtick,
    /// A line terminator. Inline spans never cross one.
    LineBreak,
    /// A maximal run of any other characters.
    Text,
}

/// A token with its byte range in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    const fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }
}

/// Characters that end a line for inline matching.
pub const fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Scan `text` into inline tokens.
///
/// Every marker character is its own token, so `**` is two `Star` tokens.
/// Token ranges are contiguous and cover the whole input.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        let kind = match ch {
            '*' => TokenKind::Star,
            '`' => TokenKind::Backtick,
            c if is_line_terminator(c) => TokenKind::LineBreak,
            _ => {
                text_start.get_or_insert(idx);
                continue;
            }
        };
        if let Some(start) = text_start.take() {
            tokens.push(Token::new(TokenKind::Text, start, idx));
        }
        tokens.push(Token::new(kind, idx, idx + ch.len_utf8()));
    }

    if let Some(start) = text_start {
        tokens.push(Token::new(TokenKind::Text, start, text.len()));
    }
    tokens
}

/// A region of the raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Ordinary text between fences.
    Text(&'a str),
    /// The content between an opening and closing fence, untrimmed.
    Code(&'a str),
}

/// Split `input` into text and fenced code segments, in source order.
///
/// A fence opens at the first ```` ``` ```` and closes at the next one.
/// An opening fence with no closing fence is left as ordinary text. Empty
/// text segments are omitted; empty code segments are kept.
pub fn split_fences(input: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    while let Some(open) = input[cursor..].find(FENCE).map(|i| cursor + i) {
        let content_start = open + FENCE.len();
        let Some(close) = input[content_start..].find(FENCE).map(|i| content_start + i) else {
            break;
        };
        if open > cursor {
            segments.push(Segment::Text(&input[cursor..open]));
        }
        segments.push(Segment::Code(&input[content_start..close]));
        cursor = close + FENCE.len();
    }

    if cursor < input.len() {
        segments.push(Segment::Text(&input[cursor..]));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize(text).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_markers_are_single_chars() {
        use TokenKind::{Star, Text};
        assert_eq!(kinds("**a**"), vec![Star, Star, Text, Star, Star]);
    }

    #[test]
    fn test_tokenize_covers_input_contiguously() {
        let text = "a *b* `c`\nd é";
        let tokens = tokenize(text);
        assert_eq!(tokens.first().unwrap().start, 0);
        assert_eq!(tokens.last().unwrap().end, text.len());
        for pair in tokens.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_tokenize_line_terminators() {
        use TokenKind::{LineBreak, Text};
        assert_eq!(kinds("a\r\nb"), vec![Text, LineBreak, LineBreak, Text]);
        assert_eq!(kinds("a\u{2028}b"), vec![Text, LineBreak, Text]);
    }

    #[test]
    fn test_tokenize_multibyte_text_ranges() {
        let tokens = tokenize("é*");
        assert_eq!(tokens[0], Token::new(TokenKind::Text, 0, 2));
        assert_eq!(tokens[1], Token::new(TokenKind::Star, 2, 3));
    }

    #[test]
    fn test_split_fences_plain_text() {
        assert_eq!(split_fences("hello"), vec![Segment::Text("hello")]);
    }

    #[test]
    fn test_split_fences_code_between_text() {
        assert_eq!(
            split_fences("a```x```b"),
            vec![Segment::Text("a"), Segment::Code("x"), Segment::Text("b")]
        );
    }

    #[test]
    fn test_split_fences_is_non_greedy() {
        assert_eq!(
            split_fences("```a``` mid ```b```"),
            vec![
                Segment::Code("a"),
                Segment::Text(" mid "),
                Segment::Code("b")
            ]
        );
    }

    #[test]
    fn test_split_fences_unterminated_is_text() {
        assert_eq!(
            split_fences("```a``` then ```open"),
            vec![Segment::Code("a"), Segment::Text(" then ```open")]
        );
    }

    #[test]
    fn test_split_fences_keeps_empty_code() {
        assert_eq!(split_fences("``````"), vec![Segment::Code("")]);
    }

    #[test]
    fn test_split_fences_extra_backtick_goes_into_content() {
        assert_eq!(split_fences("````x```"), vec![Segment::Code("`x")]);
    }
}
