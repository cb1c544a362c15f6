use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{ContentState, Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let label = if model.model_label.is_empty() {
        "revise"
    } else {
        model.model_label.as_str()
    };

    let position = match model.state {
        ContentState::Ready => format!(
            "  Line {}/{}  [{}%]",
            (model.viewport.offset() + 1).min(model.viewport.total_lines().max(1)),
            model.viewport.total_lines(),
            model.viewport.scroll_percent()
        ),
        ContentState::Loading => "  generating".to_string(),
        ContentState::Error(_) => "  failed".to_string(),
        ContentState::Empty => String::new(),
    };

    let status = format!(" {label}  {}{position}  ?:help", model.mode.label());
    let status_bar =
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => (
            "[info]",
            Style::default().bg(Color::DarkGray).fg(Color::White),
        ),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
