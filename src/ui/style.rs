//! Colors for rendered content and chrome.
//!
//! Named ANSI colors on dark backgrounds so the terminal palette applies;
//! darker indexed colors on light backgrounds.

use ratatui::style::{Color, Modifier, Style};

use crate::content::{InlineStyle, LineType};
use crate::theme::is_light_background;

/// Style for a laid-out content line.
pub fn style_for_line_type(line_type: &LineType) -> Style {
    let light_bg = is_light_background();
    match line_type {
        LineType::Heading(1) => Style::default()
            .fg(if light_bg {
                Color::Indexed(24)
            } else {
                Color::Cyan
            })
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => Style::default()
            .fg(if light_bg {
                Color::Indexed(54)
            } else {
                Color::Magenta
            })
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => Style::default()
            .fg(if light_bg {
                Color::Indexed(58)
            } else {
                Color::Yellow
            })
            .add_modifier(Modifier::BOLD),
        LineType::AnswerLabel | LineType::Answer => answer_style(),
        LineType::ListItem | LineType::Paragraph | LineType::Empty => Style::default(),
    }
}

/// Green used for the answer callout gutter and text.
pub fn answer_style() -> Style {
    Style::default().fg(if is_light_background() {
        Color::Indexed(22)
    } else {
        Color::Green
    })
}

/// Merge inline emphasis into a line's base style.
pub fn style_for_inline(base: Style, inline: InlineStyle) -> Style {
    let mut style = base;
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}

/// Border of the pane that has focus.
pub fn focus_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Sidebar section headings.
pub fn section_style() -> Style {
    Style::default()
        .fg(if is_light_background() {
            Color::Indexed(24)
        } else {
            Color::Cyan
        })
        .add_modifier(Modifier::BOLD)
}

/// Hints and placeholders.
pub fn dim_style() -> Style {
    Style::default().fg(if is_light_background() {
        Color::Indexed(242)
    } else {
        Color::Indexed(245)
    })
}

pub fn error_style() -> Style {
    Style::default().fg(if is_light_background() {
        Color::Indexed(124)
    } else {
        Color::LightRed
    })
}
