//! Inline span assembly over the token stream.
//!
//! Matching is leftmost-first and non-nesting. At each token the forms are
//! tried in a fixed order (bold, italic, inline code); the first that closes
//! wins and claims the nearest closing marker. Scanning resumes right after
//! the closing marker, so markers inside a span are literal content.

use super::lexer::{Token, TokenKind, tokenize};
use super::types::InlineSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanForm {
    Bold,
    Italic,
    Code,
}

impl SpanForm {
    const ORDER: [Self; 3] = [Self::Bold, Self::Italic, Self::Code];

    const fn marker(self) -> TokenKind {
        match self {
            Self::Bold | Self::Italic => TokenKind::Star,
            Self::Code => TokenKind::Backtick,
        }
    }

    /// Marker width in tokens.
    const fn width(self) -> usize {
        match self {
            Self::Bold => 2,
            Self::Italic | Self::Code => 1,
        }
    }

    fn span(self, value: &str) -> InlineSpan {
        let value = value.to_string();
        match self {
            Self::Bold => InlineSpan::Bold(value),
            Self::Italic => InlineSpan::Italic(value),
            Self::Code => InlineSpan::InlineCode(value),
        }
    }
}

/// A matched span: form, content byte range, and the token index after the
/// closing marker.
#[derive(Debug, Clone, Copy)]
struct SpanMatch {
    form: SpanForm,
    content_start: usize,
    content_end: usize,
    end_byte: usize,
    next: usize,
}

/// Scan `text` into inline spans.
///
/// Unmatched markers stay in the surrounding plain text. Empty input yields
/// no spans.
pub fn scan_inline(text: &str) -> Vec<InlineSpan> {
    let tokens = tokenize(text);
    let mut spans = Vec::new();
    let mut literal_from = 0;
    let mut i = 0;

    while i < tokens.len() {
        let Some(found) = SpanForm::ORDER
            .iter()
            .find_map(|&form| match_form(&tokens, i, form))
        else {
            i += 1;
            continue;
        };

        let open = tokens[i].start;
        if open > literal_from {
            spans.push(InlineSpan::PlainText(text[literal_from..open].to_string()));
        }
        spans.push(
            found
                .form
                .span(&text[found.content_start..found.content_end]),
        );
        literal_from = found.end_byte;
        i = found.next;
    }

    if literal_from < text.len() {
        spans.push(InlineSpan::PlainText(text[literal_from..].to_string()));
    }
    spans
}

fn is_marker_run(tokens: &[Token], at: usize, form: SpanForm) -> bool {
    (0..form.width()).all(|offset| {
        tokens
            .get(at + offset)
            .is_some_and(|t| t.kind == form.marker())
    })
}

/// Try to match `form` opening at token `at`.
///
/// Content is at least one character and never contains a line break.
fn match_form(tokens: &[Token], at: usize, form: SpanForm) -> Option<SpanMatch> {
    if !is_marker_run(tokens, at, form) {
        return None;
    }
    let content_first = at + form.width();

    let mut k = content_first;
    while let Some(token) = tokens.get(k) {
        if token.kind == TokenKind::LineBreak {
            return None;
        }
        if k > content_first && is_marker_run(tokens, k, form) {
            let close_last = k + form.width() - 1;
            return Some(SpanMatch {
                form,
                content_start: tokens[content_first].start,
                content_end: token.start,
                end_byte: tokens[close_last].end,
                next: close_last + 1,
            });
        }
        k += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(s: &str) -> InlineSpan {
        InlineSpan::PlainText(s.to_string())
    }

    fn bold(s: &str) -> InlineSpan {
        InlineSpan::Bold(s.to_string())
    }

    fn italic(s: &str) -> InlineSpan {
        InlineSpan::Italic(s.to_string())
    }

    fn code(s: &str) -> InlineSpan {
        InlineSpan::InlineCode(s.to_string())
    }

    #[test]
    fn test_empty_text_has_no_spans() {
        assert!(scan_inline("").is_empty());
    }

    #[test]
    fn test_plain_text_single_span() {
        assert_eq!(scan_inline("plain text"), vec![plain("plain text")]);
    }

    #[test]
    fn test_each_form() {
        assert_eq!(scan_inline("**b**"), vec![bold("b")]);
        assert_eq!(scan_inline("*i*"), vec![italic("i")]);
        assert_eq!(scan_inline("`c`"), vec![code("c")]);
    }

    #[test]
    fn test_mixed_spans_keep_order() {
        assert_eq!(
            scan_inline("a **b** c *d* e `f` g"),
            vec![
                plain("a "),
                bold("b"),
                plain(" c "),
                italic("d"),
                plain(" e "),
                code("f"),
                plain(" g"),
            ]
        );
    }

    #[test]
    fn test_bold_swallows_inner_italic() {
        assert_eq!(scan_inline("**a*b*c**"), vec![bold("a*b*c")]);
    }

    #[test]
    fn test_bold_is_non_greedy() {
        assert_eq!(
            scan_inline("**a** and **b**"),
            vec![bold("a"), plain(" and "), bold("b")]
        );
    }

    #[test]
    fn test_unclosed_bold_falls_back_to_italic() {
        // No closing `**`, so the first star opens an italic whose content
        // starts with the second star.
        assert_eq!(scan_inline("**a*"), vec![italic("*a")]);
    }

    #[test]
    fn test_triple_star_bold_content_starts_with_star() {
        assert_eq!(scan_inline("***a**"), vec![bold("*a")]);
    }

    #[test]
    fn test_four_stars_make_italic_star() {
        assert_eq!(scan_inline("****"), vec![italic("*"), plain("*")]);
    }

    #[test]
    fn test_empty_markers_are_literal() {
        assert_eq!(scan_inline("``"), vec![plain("``")]);
        assert_eq!(scan_inline("a ** b"), vec![plain("a ** b")]);
    }

    #[test]
    fn test_lone_marker_is_literal() {
        assert_eq!(scan_inline("2 * 3"), vec![plain("2 * 3")]);
    }

    #[test]
    fn test_spans_do_not_cross_line_breaks() {
        assert_eq!(scan_inline("*a\nb*"), vec![plain("*a\nb*")]);
        assert_eq!(
            scan_inline("*a\nb* *c*"),
            vec![plain("*a\nb"), italic(" "), plain("c*")]
        );
    }

    #[test]
    fn test_code_content_keeps_stars() {
        assert_eq!(scan_inline("`**x**`"), vec![code("**x**")]);
    }

    #[test]
    fn test_italic_inside_code_order() {
        assert_eq!(scan_inline("*`a`*"), vec![italic("`a`")]);
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(
            scan_inline("é **ü** ö"),
            vec![plain("é "), bold("ü"), plain(" ö")]
        );
    }
}
