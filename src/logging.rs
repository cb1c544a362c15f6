//! Where `tracing` output goes.
//!
//! The TUI draws on the alternate screen, so anything written to stderr
//! while it runs lands on top of the panes. Interactive runs therefore log
//! to `--log-file` or nowhere; `--print` and `--list-topics` keep stderr.

use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

/// Destination for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Discard,
}

impl LogTarget {
    /// Pick the destination for a run. `interactive` is true when the TUI
    /// will own the terminal.
    pub fn select(log_file: Option<&Path>, interactive: bool) -> Self {
        match log_file {
            Some(path) => Self::File(path.to_path_buf()),
            None if interactive => Self::Discard,
            None => Self::Stderr,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the log file cannot be opened for appending.
    pub fn make_writer(&self) -> io::Result<BoxMakeWriter> {
        Ok(match self {
            Self::File(path) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                BoxMakeWriter::new(Mutex::new(file))
            }
            Self::Stderr => BoxMakeWriter::new(io::stderr),
            Self::Discard => BoxMakeWriter::new(io::sink),
        })
    }
}

/// Default filter: `RUST_LOG` when set, warnings otherwise.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// The formatting subscriber used by the binary, writing through `writer`.
pub fn subscriber<W>(filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(writer)
        .finish()
}

/// Install the global subscriber for `target`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already set.
pub fn init(target: &LogTarget) -> Result<()> {
    let writer = target.make_writer().with_context(|| match target {
        LogTarget::File(path) => format!("Failed to open log file {}", path.display()),
        _ => "Failed to set up logging".to_string(),
    })?;
    tracing::subscriber::set_global_default(subscriber(default_filter(), writer))
        .context("Failed to install tracing subscriber")
}
