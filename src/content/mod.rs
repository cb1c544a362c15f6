//! Model output parsing and layout.
//!
//! This module handles:
//! - Scanning the markdown subset the model emits into [`ContentNode`]s
//! - Resolving bold/italic runs into styled [`InlineSpan`]s
//! - Wrapping nodes into [`RenderedLine`]s for display
//!
//! Nothing here builds markup from model text, so untrusted output can only
//! ever become styled plain text.

mod layout;
mod parser;
mod types;

pub use layout::{ANSWER_GUTTER, layout};
pub use parser::{format_inline, render};
pub use types::{ContentNode, Document, InlineSpan, InlineStyle, LineType, RenderedLine};
