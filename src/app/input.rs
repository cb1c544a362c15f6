use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind};

use crate::app::model::Focus;
use crate::app::{Message, Model};
use crate::generator::RevisionMode;

use super::event_loop::ResizeDebouncer;

pub(super) fn handle_event(
    event: &Event,
    model: &Model,
    now_ms: u64,
    resize_debouncer: &mut ResizeDebouncer,
) -> Option<Message> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(*key, model),
        Event::Mouse(mouse) => handle_mouse(*mouse, model),
        Event::Resize(w, h) => {
            crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
            resize_debouncer.queue(*w, *h, now_ms);
            None
        }
        _ => None,
    }
}

pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
    if model.help_visible {
        return None;
    }
    match mouse.kind {
        MouseEventKind::ScrollDown if model.viewport.can_scroll_down() => {
            Some(Message::ScrollDown(3))
        }
        MouseEventKind::ScrollUp if model.viewport.can_scroll_up() => Some(Message::ScrollUp(3)),
        _ => None,
    }
}

pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return Some(Message::Quit);
    }

    if model.help_visible {
        return Some(Message::HideHelp);
    }

    match model.focus {
        Focus::Concept => handle_concept_key(key, model),
        Focus::Topics => handle_topics_key(key, model),
        Focus::Content => handle_content_key(key, model),
    }
}

fn handle_concept_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Enter => Some(Message::Generate),
        KeyCode::Tab => Some(Message::FocusNext),
        KeyCode::BackTab | KeyCode::Esc => Some(Message::FocusPrev),
        KeyCode::Backspace => {
            let mut next = model.concept.clone();
            next.pop();
            Some(Message::ConceptInput(next))
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Message::ConceptInput(String::new()))
        }
        KeyCode::Char(c)
            if !key.modifiers.contains(KeyModifiers::CONTROL)
                && !key.modifiers.contains(KeyModifiers::ALT) =>
        {
            let mut next = model.concept.clone();
            next.push(c);
            Some(Message::ConceptInput(next))
        }
        _ => None,
    }
}

fn handle_topics_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => Some(Message::TopicDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Message::TopicUp),
        KeyCode::Enter | KeyCode::Char('g') => Some(Message::Generate),
        KeyCode::Home => Some(Message::SelectTopic(0)),
        KeyCode::End => Some(Message::SelectTopic(model.topics.len().saturating_sub(1))),
        _ => handle_common_key(key, model),
    }
}

fn handle_content_key(key: KeyEvent, model: &Model) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            model.viewport.can_scroll_down().then_some(Message::ScrollDown(1))
        }
        KeyCode::Char('k') | KeyCode::Up => {
            model.viewport.can_scroll_up().then_some(Message::ScrollUp(1))
        }
        KeyCode::Char('d') if ctrl => model
            .viewport
            .can_scroll_down()
            .then_some(Message::HalfPageDown),
        KeyCode::Char('u') if ctrl => model.viewport.can_scroll_up().then_some(Message::HalfPageUp),
        KeyCode::Char(' ') => model.viewport.can_scroll_down().then_some(Message::PageDown),
        KeyCode::Char('b') => model.viewport.can_scroll_up().then_some(Message::PageUp),
        KeyCode::Char('g') | KeyCode::Home => Some(Message::GoToTop),
        KeyCode::Char('G') | KeyCode::End => Some(Message::GoToBottom),
        _ => handle_common_key(key, model),
    }
}

/// Keys shared by the topic list and the content pane.
fn handle_common_key(key: KeyEvent, model: &Model) -> Option<Message> {
    match key.code {
        KeyCode::PageDown => model.viewport.can_scroll_down().then_some(Message::PageDown),
        KeyCode::PageUp => model.viewport.can_scroll_up().then_some(Message::PageUp),
        KeyCode::Char('1' | 's') => Some(Message::SetMode(RevisionMode::Summary)),
        KeyCode::Char('2' | 'Q') => Some(Message::SetMode(RevisionMode::Questions)),
        KeyCode::Char('3' | 'e') => Some(Message::SetMode(RevisionMode::Explain)),
        KeyCode::Tab => Some(Message::FocusNext),
        KeyCode::BackTab => Some(Message::FocusPrev),
        KeyCode::Char('y') => Some(Message::CopyContent),
        KeyCode::Char('?') | KeyCode::F(1) => Some(Message::ToggleHelp),
        KeyCode::Char('q') => Some(Message::Quit),
        _ => None,
    }
}
