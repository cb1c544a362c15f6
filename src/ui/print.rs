//! Non-interactive output: write a laid-out document straight to a stream.

use std::io::{self, IsTerminal, Write};

use crossterm::queue;
use crossterm::style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor};
use ratatui::backend::IntoCrossterm;
use ratatui::style::{Modifier, Style};

use crate::content::Document;

use super::style::{style_for_inline, style_for_line_type};

/// Fallback width when stdout is not a terminal.
pub const DEFAULT_PRINT_WIDTH: u16 = 80;

/// Write every line of `document`, with ANSI styling when `color` is set.
pub fn write_document<W: Write>(out: &mut W, document: &Document, color: bool) -> io::Result<()> {
    for line in document.lines() {
        if !color {
            writeln!(out, "{}", line.content())?;
            continue;
        }
        let base = style_for_line_type(line.line_type());
        match line.spans() {
            Some(spans) => {
                for span in spans {
                    write_styled(out, span.text(), style_for_inline(base, span.style()))?;
                }
            }
            None => write_styled(out, line.content(), base)?,
        }
        writeln!(out)?;
    }
    out.flush()
}

fn write_styled<W: Write>(out: &mut W, text: &str, style: Style) -> io::Result<()> {
    if style == Style::default() {
        return queue!(out, Print(text));
    }
    if let Some(fg) = style.fg {
        queue!(out, SetForegroundColor(fg.into_crossterm()))?;
    }
    let modifiers = style.add_modifier;
    if modifiers.contains(Modifier::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if modifiers.contains(Modifier::ITALIC) {
        queue!(out, SetAttribute(Attribute::Italic))?;
    }
    if modifiers.contains(Modifier::UNDERLINED) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    queue!(
        out,
        Print(text),
        SetAttribute(Attribute::Reset),
        ResetColor
    )
}

/// Color only for an interactive stdout without `NO_COLOR`.
pub fn should_use_color() -> bool {
    io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Width to lay printed output out at.
pub fn print_width(requested: Option<u16>) -> u16 {
    match requested {
        Some(width) if width > 0 => width,
        _ => crossterm::terminal::size()
            .ok()
            .map(|(w, _)| w)
            .filter(|w| *w > 0)
            .unwrap_or(DEFAULT_PRINT_WIDTH),
    }
}
