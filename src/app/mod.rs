//! Application state and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: Pure function for state transitions
//! - [`App::run`]: Main event loop with rendering
//!
//! Generation runs on a worker thread; its result re-enters the loop as a
//! [`Message::GenerationFinished`].

mod effects;
mod event_loop;
mod input;
mod model;
mod update;
mod worker;

pub use model::{
    ContentState, Focus, GENERATION_FAILED_MESSAGE, GenerateRequest, Model, ToastLevel,
    VALIDATION_MESSAGE,
};
pub use update::{Message, update};

use std::path::PathBuf;
use std::sync::Arc;

use crate::generator::{ContentGenerator, RevisionMode};

/// Main application struct that owns the generator and runs the event loop.
pub struct App {
    generator: Arc<dyn ContentGenerator>,
    topic_index: usize,
    mode: RevisionMode,
    concept: String,
    wrap_width: Option<u16>,
    model_label: String,
    config_global_path: Option<PathBuf>,
    config_local_path: Option<PathBuf>,
}

impl App {
    /// Create a new application backed by `generator`.
    pub fn new(generator: Arc<dyn ContentGenerator>) -> Self {
        Self {
            generator,
            topic_index: 0,
            mode: RevisionMode::default(),
            concept: String::new(),
            wrap_width: None,
            model_label: String::new(),
            config_global_path: None,
            config_local_path: None,
        }
    }

    /// Preselect a topic by index.
    #[must_use]
    pub const fn with_topic_index(mut self, index: usize) -> Self {
        self.topic_index = index;
        self
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: RevisionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Prefill the concept input.
    #[must_use]
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = concept.into();
        self
    }

    /// Cap the content wrap width.
    #[must_use]
    pub const fn with_wrap_width(mut self, width: Option<u16>) -> Self {
        self.wrap_width = width;
        self
    }

    /// Text shown in the status bar to identify the generator.
    #[must_use]
    pub fn with_model_label(mut self, label: impl Into<String>) -> Self {
        self.model_label = label.into();
        self
    }

    /// Set config paths to show in help.
    #[must_use]
    pub fn with_config_paths(
        mut self,
        global_path: Option<PathBuf>,
        local_path: Option<PathBuf>,
    ) -> Self {
        self.config_global_path = global_path;
        self.config_local_path = local_path;
        self
    }

    fn generator(&self) -> Arc<dyn ContentGenerator> {
        Arc::clone(&self.generator)
    }

    fn initial_model(&self, terminal_size: (u16, u16)) -> Model {
        let mut model = Model::new(terminal_size);
        if self.topic_index < model.topics.len() {
            model.selected_topic = self.topic_index;
        }
        model.mode = self.mode;
        model.concept.clone_from(&self.concept);
        model.wrap_width = self.wrap_width;
        model.model_label.clone_from(&self.model_label);
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);
        model
    }
}

#[cfg(test)]
mod tests;
