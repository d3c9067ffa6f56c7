//! Theming for rendered descriptions.
//!
//! Uses ANSI colors that adapt to the terminal's color palette, with
//! indexed fallbacks for light backgrounds.

use crossterm::style::{Color, ContentStyle, Stylize};

use crate::config::ThemeMode;
use crate::markup::{HeadingLevel, InlineSpan};

/// Styles for each kind of rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub h1: ContentStyle,
    pub h2: ContentStyle,
    pub code_block: ContentStyle,
    pub inline_code: ContentStyle,
    pub image: ContentStyle,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        let light = mode == ThemeMode::Light;
        Self {
            // Headings - bold with distinct colors per level
            h1: ContentStyle::new()
                .with(if light { Color::AnsiValue(24) } else { Color::Cyan })
                .bold()
                .underlined(),
            h2: ContentStyle::new()
                .with(if light { Color::AnsiValue(22) } else { Color::Green })
                .bold(),
            code_block: ContentStyle::new()
                .with(if light {
                    Color::AnsiValue(238)
                } else {
                    Color::AnsiValue(245)
                })
                .dim(),
            inline_code: ContentStyle::new()
                .with(if light { Color::AnsiValue(88) } else { Color::Red })
                .bold(),
            // Images - magenta italic to stand out as placeholder
            image: ContentStyle::new()
                .with(if light {
                    Color::AnsiValue(90)
                } else {
                    Color::Magenta
                })
                .italic(),
        }
    }

    pub const fn heading(&self, level: HeadingLevel) -> ContentStyle {
        match level {
            HeadingLevel::One => self.h1,
            HeadingLevel::Two => self.h2,
        }
    }

    /// Style for an inline span, merged over a base block style.
    pub fn inline(&self, base: ContentStyle, span: &InlineSpan) -> ContentStyle {
        let overlay = match span {
            InlineSpan::PlainText(_) => return base,
            InlineSpan::Bold(_) => ContentStyle::new().bold(),
            InlineSpan::Italic(_) => ContentStyle::new().italic(),
            InlineSpan::InlineCode(_) => self.inline_code,
        };
        merge(base, overlay)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_mode(ThemeMode::Dark)
    }
}

fn merge(base: ContentStyle, overlay: ContentStyle) -> ContentStyle {
    let mut style = base;
    if overlay.foreground_color.is_some() {
        style.foreground_color = overlay.foreground_color;
    }
    if overlay.background_color.is_some() {
        style.background_color = overlay.background_color;
    }
    style.attributes.extend(overlay.attributes);
    style
}
