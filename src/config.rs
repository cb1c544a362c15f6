//! Saved command-line defaults.
//!
//! Defaults live in an rc file of flag lines (`--mode questions`). The global
//! file is merged with a local `.reviserc`, then command-line flags win over
//! both. The API key is never read from or written to these files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::generator::RevisionMode;

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

impl ThemeMode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    pub topic: Option<String>,
    pub mode: Option<RevisionMode>,
    pub concept: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub width: Option<u16>,
    pub theme: Option<ThemeMode>,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: options in `other` win, switches are or-ed.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            topic: other.topic.clone().or_else(|| self.topic.clone()),
            mode: other.mode.or(self.mode),
            concept: other.concept.clone().or_else(|| self.concept.clone()),
            model: other.model.clone().or_else(|| self.model.clone()),
            temperature: other.temperature.or(self.temperature),
            top_p: other.top_p.or(self.top_p),
            base_url: other.base_url.clone().or_else(|| self.base_url.clone()),
            timeout_secs: other.timeout_secs.or(self.timeout_secs),
            width: other.width.or(self.width),
            theme: other.theme.or(self.theme),
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("revise").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("revise")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("revise").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("revise")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".reviserc")
}

/// Load flags from an rc file. A missing file yields empty flags.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    // One flag per line; everything after the flag name is its value.
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| match line.split_once(char::is_whitespace) {
            Some((flag, value)) => vec![flag.to_string(), value.trim().to_string()],
            None => vec![line.to_string()],
        })
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// Write flags as an rc file, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# revise defaults (saved with --save)".to_string()];
    if let Some(topic) = &flags.topic {
        lines.push(format!("--topic {topic}"));
    }
    if let Some(mode) = flags.mode {
        lines.push(format!("--mode {mode}"));
    }
    if let Some(concept) = &flags.concept {
        lines.push(format!("--concept {concept}"));
    }
    if let Some(model) = &flags.model {
        lines.push(format!("--model {model}"));
    }
    if let Some(temperature) = flags.temperature {
        lines.push(format!("--temperature {temperature}"));
    }
    if let Some(top_p) = flags.top_p {
        lines.push(format!("--top-p {top_p}"));
    }
    if let Some(base_url) = &flags.base_url {
        lines.push(format!("--base-url {base_url}"));
    }
    if let Some(secs) = flags.timeout_secs {
        lines.push(format!("--timeout-secs {secs}"));
    }
    if let Some(width) = flags.width {
        lines.push(format!("--width {width}"));
    }
    if let Some(theme) = flags.theme {
        lines.push(format!("--theme {}", theme.as_str()));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// Remove an rc file if present.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the saveable flags out of raw arguments.
///
/// Unknown tokens and unparseable values are skipped; clap reports those.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--perf" {
            flags.perf = true;
            i += 1;
            continue;
        }

        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        if !is_value_flag(name) {
            i += 1;
            continue;
        }
        let value = match inline_value {
            Some(value) => value,
            None => {
                let Some(next) = tokens.get(i + 1) else {
                    break;
                };
                i += 1;
                next.as_str()
            }
        };
        apply_value(&mut flags, name, value);
        i += 1;
    }
    flags
}

fn is_value_flag(name: &str) -> bool {
    matches!(
        name,
        "--topic"
            | "--mode"
            | "--concept"
            | "--model"
            | "--temperature"
            | "--top-p"
            | "--base-url"
            | "--timeout-secs"
            | "--width"
            | "--theme"
            | "--render-debug-log"
            | "--log-file"
    )
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--topic" => flags.topic = Some(value.to_string()),
        "--mode" => flags.mode = ValueEnum::from_str(value, true).ok(),
        "--concept" => flags.concept = Some(value.to_string()),
        "--model" => flags.model = Some(value.to_string()),
        "--temperature" => flags.temperature = value.parse().ok(),
        "--top-p" => flags.top_p = value.parse().ok(),
        "--base-url" => flags.base_url = Some(value.to_string()),
        "--timeout-secs" => flags.timeout_secs = value.parse().ok(),
        "--width" => flags.width = value.parse().ok(),
        "--theme" => flags.theme = ValueEnum::from_str(value, true).ok(),
        "--render-debug-log" => flags.render_debug_log = Some(PathBuf::from(value)),
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}
