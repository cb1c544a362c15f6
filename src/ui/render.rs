use std::rc::Rc;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::{ContentState, Focus, Model};

use super::{CONTENT_PADDING, SIDEBAR_WIDTH, overlays, sidebar, status, style};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Status bar rows under the panes.
const FOOTER_ROWS: u16 = 1;

pub fn split_main_columns(area: Rect) -> Rc<[Rect]> {
    let sidebar_width = SIDEBAR_WIDTH.min(area.width / 2);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
        .split(area)
}

/// Columns available for content text in a terminal `total_width` wide.
pub fn content_width(total_width: u16) -> u16 {
    let pane = split_main_columns(Rect::new(0, 0, total_width, 1))[1];
    pane.width.saturating_sub(2 + 2 * CONTENT_PADDING).max(1)
}

/// Rows available for content text in a terminal `total_height` tall.
pub const fn content_height(total_height: u16) -> u16 {
    let rows = total_height.saturating_sub(FOOTER_ROWS + 2);
    if rows == 0 { 1 } else { rows }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let toast_active = model.active_toast().is_some();
    let footer_rows = FOOTER_ROWS + u16::from(toast_active);

    let main_area = Rect {
        height: area.height.saturating_sub(footer_rows),
        ..area
    };
    let toast_area = Rect {
        y: area.y + area.height.saturating_sub(footer_rows),
        height: 1,
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: 1,
        ..area
    };

    let chunks = split_main_columns(main_area);
    sidebar::render_sidebar(model, frame, chunks[0]);
    render_content(model, frame, chunks[1]);

    if toast_active {
        status::render_toast_bar(model, frame, toast_area);
    }
    status::render_status_bar(model, frame, status_area);

    if model.help_visible {
        overlays::render_help_overlay(model, frame, area);
    }
}

fn render_content(model: &Model, frame: &mut Frame, area: Rect) {
    let title = match model.state {
        ContentState::Ready => format!(" {} · {} ", model.topic(), model.mode.label()),
        _ => " Content ".to_string(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style::focus_border(model.focus == Focus::Content))
        .padding(Padding::horizontal(CONTENT_PADDING));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    match &model.state {
        ContentState::Empty => render_placeholder(
            frame,
            inner,
            vec![
                Line::styled(
                    "Ready to Revise?",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::raw(""),
                Line::styled(
                    "Select a topic and a revision type, then press Enter to generate content.",
                    style::dim_style(),
                ),
            ],
        ),
        ContentState::Loading => {
            let spinner = SPINNER[model.spinner_frame % SPINNER.len()];
            render_placeholder(
                frame,
                inner,
                vec![
                    Line::styled(
                        format!("{spinner} Generating your revision materials..."),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Line::raw(""),
                    Line::styled("This may take a moment.", style::dim_style()),
                ],
            );
        }
        ContentState::Error(message) => render_error(frame, inner, message),
        ContentState::Ready => render_document(model, frame, inner),
    }
}

/// Vertically centered, wrapped message.
fn render_placeholder(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let wanted = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(1);
    let top = area.height.saturating_sub(wanted) / 2;
    let target = Rect {
        y: area.y + top,
        height: area.height.saturating_sub(top),
        ..area
    };
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, target);
}

fn render_error(frame: &mut Frame, area: Rect, message: &str) {
    let callout = Block::default()
        .title(" Error ")
        .borders(Borders::ALL)
        .border_style(style::error_style())
        .padding(Padding::horizontal(1));
    let height = area.height.min(5);
    let target = Rect { height, ..area };
    let paragraph = Paragraph::new(message.to_string())
        .style(style::error_style())
        .wrap(Wrap { trim: true })
        .block(callout);
    frame.render_widget(paragraph, target);
}

fn render_document(model: &Model, frame: &mut Frame, area: Rect) {
    if model.document.is_empty() {
        frame.render_widget(
            Paragraph::new(Line::styled("The model returned no content.", style::dim_style())),
            area,
        );
        return;
    }

    let visible_lines = model
        .document
        .visible_lines(model.viewport.offset(), area.height as usize);

    let content: Vec<Line> = visible_lines
        .iter()
        .map(|line| {
            let line_style = style::style_for_line_type(line.line_type());
            line.spans().map_or_else(
                || Line::styled(line.content().to_string(), line_style),
                |spans| {
                    Line::from(
                        spans
                            .iter()
                            .map(|span| {
                                Span::styled(
                                    span.text().to_string(),
                                    style::style_for_inline(line_style, span.style()),
                                )
                            })
                            .collect::<Vec<_>>(),
                    )
                },
            )
        })
        .collect();

    frame.render_widget(Paragraph::new(content), area);
}
