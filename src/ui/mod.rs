//! Terminal UI components.
//!
//! This module contains all UI-related code including:
//! - [`viewport`]: Scroll position and visible range management
//! - [`style`]: Theming and colors
//! - [`print`]: Non-interactive output to stdout

pub mod print;
pub mod style;
pub mod viewport;

mod overlays;
mod render;
mod sidebar;
mod status;

pub use render::{content_height, content_width, render, split_main_columns};

/// Preferred sidebar width; capped at half the terminal.
pub const SIDEBAR_WIDTH: u16 = 36;
/// Horizontal padding inside the content pane border.
pub const CONTENT_PADDING: u16 = 1;
