//! Revision content generation.
//!
//! The model call sits behind [`ContentGenerator`] so the renderer and the UI
//! can run against canned text:
//! - [`GeminiGenerator`]: Google Generative Language API over HTTP
//! - [`FixtureGenerator`]: fixed text, for offline use and tests

mod gemini;
pub mod prompts;
pub mod topics;

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};

pub use gemini::{
    DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, DEFAULT_TOP_P,
    GeminiConfig, GeminiGenerator,
};

/// Which kind of revision material to ask for.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RevisionMode {
    /// Key-concept summary of the topic
    #[default]
    Summary,
    /// Exam-style questions with answers
    Questions,
    /// Explanation of a single concept within the topic
    Explain,
}

impl RevisionMode {
    pub const ALL: [Self; 3] = [Self::Summary, Self::Questions, Self::Explain];

    /// Display label used in the sidebar.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Summary => "Summary",
            Self::Questions => "Questions",
            Self::Explain => "Explain Concept",
        }
    }

    /// Token used on the command line and in the rc file.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Questions => "questions",
            Self::Explain => "explain",
        }
    }

    /// Whether this mode needs a concept to explain.
    pub const fn needs_detail(self) -> bool {
        matches!(self, Self::Explain)
    }
}

impl fmt::Display for RevisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure to produce revision content.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("model returned no text ({0})")]
    EmptyResponse(String),
}

/// Something that turns a topic and mode into model text.
///
/// Implementations block until the text is available; the app calls them
/// from a worker thread.
pub trait ContentGenerator: Send + Sync {
    /// Generate revision text for `topic` in `mode`.
    ///
    /// `detail` is the concept to explain and is ignored by other modes.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidRequest`] for an explain request with a
    /// blank `detail`, or a transport/provider error from the backend.
    fn generate(&self, topic: &str, mode: RevisionMode, detail: &str)
    -> Result<String, GenerateError>;
}

/// Returns the same text for every valid request.
#[derive(Debug, Clone)]
pub struct FixtureGenerator {
    text: String,
}

impl FixtureGenerator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load the canned text from a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?;
        Ok(Self::new(text))
    }
}

impl ContentGenerator for FixtureGenerator {
    fn generate(
        &self,
        topic: &str,
        mode: RevisionMode,
        detail: &str,
    ) -> Result<String, GenerateError> {
        // Same validation as a live request.
        prompts::user_prompt(topic, mode, detail)?;
        Ok(self.text.clone())
    }
}
