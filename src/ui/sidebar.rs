use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::{Focus, Model};
use crate::generator::RevisionMode;

use super::style;

const MODE_KEYS: [&str; 3] = ["1/s", "2/Q", "3/e"];

pub fn render_sidebar(model: &Model, frame: &mut Frame, area: Rect) {
    let focused = matches!(model.focus, Focus::Topics | Focus::Concept);
    let block = Block::default()
        .title(" Revise a Topic ")
        .borders(Borders::ALL)
        .border_style(style::focus_border(focused))
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("1. Select Topic", style::section_style()));
    for (idx, topic) in model.topics.iter().enumerate() {
        let selected = idx == model.selected_topic;
        let marker = if selected { "> " } else { "  " };
        let text = truncate_to_width(topic, width.saturating_sub(2));
        let mut line_style = Style::default();
        if selected {
            line_style = line_style.add_modifier(Modifier::BOLD);
            if model.focus == Focus::Topics {
                line_style = line_style.add_modifier(Modifier::REVERSED);
            }
        }
        lines.push(Line::styled(format!("{marker}{text}"), line_style));
    }
    lines.push(Line::raw(""));

    lines.push(Line::styled("2. Choose Revision Type", style::section_style()));
    for (mode, keys) in RevisionMode::ALL.iter().zip(MODE_KEYS) {
        let radio = if *mode == model.mode { "(•)" } else { "( )" };
        let label = truncate_to_width(mode.label(), width.saturating_sub(10));
        lines.push(Line::from(vec![
            Span::raw(format!("{radio} {label} ")),
            Span::styled(format!("[{keys}]"), style::dim_style()),
        ]));
    }
    lines.push(Line::raw(""));

    if model.concept_visible() {
        lines.push(Line::styled("3. Concept to Explain", style::section_style()));
        lines.push(concept_line(model, width));
        lines.push(Line::raw(""));
    }

    let hint = if model.is_loading() {
        Line::styled("Generating...", style::dim_style())
    } else {
        Line::styled(
            "Enter: Generate Content",
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    lines.push(hint);

    frame.render_widget(Paragraph::new(lines), inner);
}

fn concept_line(model: &Model, width: usize) -> Line<'static> {
    let editing = model.focus == Focus::Concept;
    if model.concept.is_empty() && !editing {
        return Line::styled(
            truncate_to_width("e.g. Active transport", width),
            style::dim_style(),
        );
    }
    let cursor = if editing { "_" } else { "" };
    let available = width.saturating_sub(cursor.len());
    let text = tail_to_width(&model.concept, available);
    let mut line_style = Style::default();
    if editing {
        line_style = line_style.add_modifier(Modifier::UNDERLINED);
    }
    Line::styled(format!("{text}{cursor}"), line_style)
}

/// Cut `text` to at most `max` display columns, marking the cut with `…`.
fn truncate_to_width(text: &str, max: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// Keep the end of `text` so the cursor stays visible while typing.
fn tail_to_width(text: &str, max: usize) -> String {
    let mut kept: Vec<char> = Vec::new();
    let mut used = 0;
    for ch in text.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        kept.push(ch);
        used += w;
    }
    kept.into_iter().rev().collect()
}
