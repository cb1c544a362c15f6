// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. content::ContentNode)
    clippy::module_name_repetitions
)]

//! # Revise
//!
//! A terminal revision companion for AQA A-Level Biology.
//!
//! Revise asks a language model for topic summaries, exam-style questions
//! or concept explanations and shows the result in the terminal:
//! - A line-oriented renderer for the markdown subset the model emits
//! - Bold and italic runs as styled spans, never as raw markup
//! - Answer callouts for mark schemes
//! - Background generation with a responsive UI
//!
//! ## Architecture
//!
//! Revise uses The Elm Architecture (TEA) pattern:
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: Pure state transitions
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`app`]: Main application loop and state
//! - [`content`]: Rendering model output into laid-out lines
//! - [`generator`]: Prompts, topics and the Gemini client
//! - [`ui`]: Terminal UI components
//! - [`config`]: Saved defaults
//! - [`logging`]: Where tracing output goes
//! - [`theme`]: Light/dark background detection

pub mod app;
pub mod config;
pub mod content;
pub mod generator;
pub mod logging;
pub mod perf;
pub mod theme;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::content::{ContentNode, Document, render};
    pub use crate::generator::{ContentGenerator, FixtureGenerator, RevisionMode};
    pub use crate::ui::viewport::Viewport;
}
