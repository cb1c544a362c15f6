use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::content::Document;
use crate::generator::RevisionMode;
use crate::generator::topics::BIOLOGY_TOPICS;
use crate::ui::viewport::Viewport;

/// Shown when an explain request has no concept.
pub const VALIDATION_MESSAGE: &str = "Please select a topic and provide a concept to explain.";
/// Shown for every generator failure; the cause goes to the log.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate content. Please check your API key and try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// Which pane receives keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Topics,
    Concept,
    Content,
}

/// What the content pane shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContentState {
    /// Nothing generated yet
    #[default]
    Empty,
    /// A request is in flight
    Loading,
    /// Last request failed or was rejected
    Error(String),
    /// `Model::document` holds the latest result
    Ready,
}

/// A generation the event loop should start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub id: u64,
    pub topic: String,
    pub mode: RevisionMode,
    pub concept: String,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    /// Selectable topics
    pub topics: Vec<String>,
    /// Index into `topics`
    pub selected_topic: usize,
    pub mode: RevisionMode,
    /// Concept text for explain requests
    pub concept: String,
    pub focus: Focus,
    pub state: ContentState,
    /// Latest generated content, laid out for the content pane
    pub document: Document,
    /// Scroll state of the content pane
    pub viewport: Viewport,
    /// Optional maximum wrap width in columns
    pub wrap_width: Option<u16>,
    /// Generator description shown in the status bar
    pub model_label: String,
    pub config_global_path: Option<PathBuf>,
    pub config_local_path: Option<PathBuf>,
    pub help_visible: bool,
    pub spinner_frame: usize,
    pub should_quit: bool,
    /// Set by `update` when a generation should start; taken by the event loop
    pub pending_request: Option<GenerateRequest>,
    /// Id of the newest request; older results are dropped
    pub(super) request_id: u64,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model sized for a terminal of `(width, height)` cells.
    pub fn new(terminal_size: (u16, u16)) -> Self {
        Self {
            viewport: Viewport::new(
                crate::ui::content_width(terminal_size.0),
                crate::ui::content_height(terminal_size.1),
                0,
            ),
            ..Self::default()
        }
    }

    pub fn topic(&self) -> &str {
        self.topics
            .get(self.selected_topic)
            .map_or("", String::as_str)
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.state, ContentState::Loading)
    }

    /// Whether the concept input is part of the sidebar.
    pub const fn concept_visible(&self) -> bool {
        self.mode.needs_detail()
    }

    /// Width content is wrapped to.
    pub(super) fn layout_width(&self) -> u16 {
        match self.wrap_width {
            Some(w) if w > 0 => self.viewport.width().min(w),
            _ => self.viewport.width(),
        }
    }

    /// Re-wrap the document after a size change.
    pub(super) fn reflow_layout(&mut self) {
        let width = self.layout_width();
        self.document.relayout(width);
        self.viewport.set_total_lines(self.document.line_count());
    }

    /// Replace the document with freshly generated text.
    pub(super) fn load_content(&mut self, text: &str) {
        self.document = Document::from_text(text, self.layout_width());
        self.viewport.set_total_lines(self.document.line_count());
        self.viewport.go_to_top();
        self.state = ContentState::Ready;
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + Duration::from_secs(4),
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

// Implement Default for Model to allow std::mem::take
impl Default for Model {
    fn default() -> Self {
        Self {
            topics: BIOLOGY_TOPICS.iter().map(ToString::to_string).collect(),
            selected_topic: 0,
            mode: RevisionMode::default(),
            concept: String::new(),
            focus: Focus::default(),
            state: ContentState::default(),
            document: Document::empty(),
            viewport: Viewport::new(80, 24, 0),
            wrap_width: None,
            model_label: String::new(),
            config_global_path: None,
            config_local_path: None,
            help_visible: false,
            spinner_frame: 0,
            should_quit: false,
            pending_request: None,
            request_id: 0,
            toast: None,
        }
    }
}
