use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

use crate::app::Model;

use super::style;

const KEY_COLUMN: usize = 20;

fn key_line(keys: &str, action: &str) -> Line<'static> {
    Line::raw(format!("  {keys:<width$}{action}", width = KEY_COLUMN))
}

pub fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section = style::section_style();
    let mut lines: Vec<Line> = vec![
        Line::styled("Choosing", section),
        key_line("Tab / Shift-Tab", "Next / previous pane"),
        key_line("j/k or Up/Down", "Move topic selection"),
        key_line("1 / s", "Summary"),
        key_line("2 / Q", "Questions"),
        key_line("3 / e", "Explain a concept"),
        key_line("Enter / g", "Generate content"),
        Line::raw(""),
        Line::styled("Reading", section),
        key_line("j/k or Up/Down", "Scroll"),
        key_line("Space/PageDown", "Page down"),
        key_line("b/PageUp", "Page up"),
        key_line("Ctrl-d / Ctrl-u", "Half page"),
        key_line("g / G", "Top / bottom"),
        Line::raw(""),
        Line::styled("Other", section),
        key_line("y", "Copy generated text"),
        key_line("q / Ctrl-c", "Quit"),
        key_line("? / F1", "Toggle help"),
        Line::raw(""),
        Line::styled("Config", section),
        Line::raw(format!("  Global: {global_cfg}")),
        Line::raw(format!("  Local override: {local_cfg}")),
    ];
    lines.push(Line::raw(""));
    lines.push(Line::styled("Any key closes", style::dim_style()));

    let block = Block::default()
        .title("Help")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
