use crate::app::Model;
use crate::app::model::{
    ContentState, Focus, GENERATION_FAILED_MESSAGE, GenerateRequest, VALIDATION_MESSAGE,
};
use crate::generator::RevisionMode;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Content navigation
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),
    /// Scroll up one page
    PageUp,
    /// Scroll down one page
    PageDown,
    /// Scroll up half page
    HalfPageUp,
    /// Scroll down half page
    HalfPageDown,
    /// Go to beginning of content
    GoToTop,
    /// Go to end of content
    GoToBottom,

    // Sidebar
    /// Move topic selection up
    TopicUp,
    /// Move topic selection down
    TopicDown,
    /// Select topic by index
    SelectTopic(usize),
    /// Choose the revision mode
    SetMode(RevisionMode),
    /// Replace the concept text
    ConceptInput(String),
    /// Move focus to the next pane
    FocusNext,
    /// Move focus to the previous pane
    FocusPrev,

    // Generation
    /// Validate the form and start a request
    Generate,
    /// A background request finished; `Err` holds the cause for logging
    GenerationFinished {
        id: u64,
        result: Result<String, String>,
    },
    /// Copy the raw generated text
    CopyContent,

    /// Toggle help overlay
    ToggleHelp,
    /// Hide help overlay
    HideHelp,
    /// Advance the loading spinner
    Tick,

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Pure function that updates the model based on a message.
///
/// All state transitions happen here. Work that touches the outside world
/// (starting a request, writing to the clipboard) is left to the event loop.
pub fn update(mut model: Model, msg: Message) -> Model {
    match msg {
        Message::ScrollUp(n) => model.viewport.scroll_up(n),
        Message::ScrollDown(n) => model.viewport.scroll_down(n),
        Message::PageUp => model.viewport.page_up(),
        Message::PageDown => model.viewport.page_down(),
        Message::HalfPageUp => model.viewport.half_page_up(),
        Message::HalfPageDown => model.viewport.half_page_down(),
        Message::GoToTop => model.viewport.go_to_top(),
        Message::GoToBottom => model.viewport.go_to_bottom(),

        Message::TopicUp => {
            model.selected_topic = model.selected_topic.saturating_sub(1);
        }
        Message::TopicDown => {
            let max = model.topics.len().saturating_sub(1);
            model.selected_topic = (model.selected_topic + 1).min(max);
        }
        Message::SelectTopic(index) => {
            if index < model.topics.len() {
                model.selected_topic = index;
            }
        }
        Message::SetMode(mode) => {
            model.mode = mode;
            if mode.needs_detail() {
                model.focus = Focus::Concept;
            } else if model.focus == Focus::Concept {
                model.focus = Focus::Topics;
            }
        }
        Message::ConceptInput(text) => {
            model.concept = text;
        }
        Message::FocusNext => {
            model.focus = match model.focus {
                Focus::Topics if model.concept_visible() => Focus::Concept,
                Focus::Topics | Focus::Concept => Focus::Content,
                Focus::Content => Focus::Topics,
            };
        }
        Message::FocusPrev => {
            model.focus = match model.focus {
                Focus::Content if model.concept_visible() => Focus::Concept,
                Focus::Content | Focus::Concept => Focus::Topics,
                Focus::Topics => Focus::Content,
            };
        }

        Message::Generate => start_generation(&mut model),
        Message::GenerationFinished { id, result } => {
            if id == model.request_id && model.is_loading() {
                match result {
                    Ok(text) => model.load_content(&text),
                    Err(_) => {
                        model.state = ContentState::Error(GENERATION_FAILED_MESSAGE.to_string());
                    }
                }
            }
        }

        Message::ToggleHelp => {
            model.help_visible = !model.help_visible;
        }
        Message::HideHelp => {
            model.help_visible = false;
        }
        Message::Tick => {
            if model.is_loading() {
                model.spinner_frame = model.spinner_frame.wrapping_add(1);
            }
        }
        Message::Resize(width, height) => {
            model.viewport.resize(
                crate::ui::content_width(width),
                crate::ui::content_height(height),
            );
            model.reflow_layout();
        }
        // CopyContent: handled in effects (clipboard)
        Message::CopyContent => {}
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

fn start_generation(model: &mut Model) {
    // One request at a time.
    if model.is_loading() {
        return;
    }
    let topic = model.topic().to_string();
    let concept = model.concept.trim().to_string();
    if topic.is_empty() || (model.mode.needs_detail() && concept.is_empty()) {
        model.state = ContentState::Error(VALIDATION_MESSAGE.to_string());
        model.pending_request = None;
        return;
    }

    model.request_id += 1;
    model.spinner_frame = 0;
    model.state = ContentState::Loading;
    model.pending_request = Some(GenerateRequest {
        id: model.request_id,
        topic,
        mode: model.mode,
        concept,
    });
}
