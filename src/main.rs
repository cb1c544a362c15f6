//! revise - AQA A-Level Biology revision in the terminal.
//!
//! # Usage
//!
//! ```bash
//! GEMINI_API_KEY=... revise
//! revise --topic cells --mode questions
//! revise --topic 3 --mode explain --concept "surface area to volume ratio" --print
//! revise --input notes.md --print
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use revise::app::App;
use revise::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use revise::content::Document;
use revise::generator::topics::{BIOLOGY_TOPICS, find_topic};
use revise::generator::{
    ContentGenerator, FixtureGenerator, GeminiConfig, GeminiGenerator, RevisionMode,
};
use revise::logging::{self, LogTarget};
use revise::perf;
use revise::theme::{Background, detect_background, set_background};
use revise::ui::print::{print_width, should_use_color, write_document};

/// AQA A-Level Biology revision materials, generated on demand
#[derive(Parser, Debug)]
#[command(name = "revise", version, about, long_about = None)]
struct Cli {
    /// Topic to preselect: list number, name, or a unique part of a name
    #[arg(short, long)]
    topic: Option<String>,

    /// Kind of revision material
    #[arg(short, long, value_enum)]
    mode: Option<RevisionMode>,

    /// Concept to explain (explain mode)
    #[arg(short, long)]
    concept: Option<String>,

    /// Gemini model name
    #[arg(long)]
    model: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    temperature: Option<f32>,

    /// Nucleus sampling probability
    #[arg(long)]
    top_p: Option<f32>,

    /// Generative Language API base URL
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout_secs: Option<u64>,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Show text from FILE instead of calling the API
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Generate once and print to stdout instead of starting the UI
    #[arg(short, long)]
    print: bool,

    /// Maximum wrap width in columns
    #[arg(short, long)]
    width: Option<u16>,

    /// List the available topics and exit
    #[arg(long)]
    list_topics: bool,

    /// Force the color scheme for a light or dark background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write tracing output to a file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Write detailed render/generation debug events to a file
    #[arg(long, value_name = "PATH")]
    render_debug_log: Option<PathBuf>,

    /// Enable performance logging
    #[arg(long)]
    perf: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

impl Cli {
    /// The flags that may be saved as defaults. The API key is not one.
    fn config_flags(&self) -> ConfigFlags {
        ConfigFlags {
            topic: self.topic.clone(),
            mode: self.mode,
            concept: self.concept.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            top_p: self.top_p,
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout_secs,
            width: self.width,
            theme: self.theme,
            perf: self.perf,
            render_debug_log: self.render_debug_log.clone(),
            log_file: self.log_file.clone(),
        }
    }
}

fn gemini_config(api_key: String, flags: &ConfigFlags) -> Result<GeminiConfig> {
    let mut config = GeminiConfig::new(api_key);
    if let Some(model) = &flags.model {
        config = config.with_model(model.clone());
    }
    if let Some(temperature) = flags.temperature {
        config = config.with_temperature(temperature);
    }
    if let Some(top_p) = flags.top_p {
        config = config.with_top_p(top_p);
    }
    if let Some(base_url) = &flags.base_url {
        config = config.with_base_url(base_url)?;
    }
    if let Some(secs) = flags.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn build_generator(
    cli: &Cli,
    flags: &ConfigFlags,
) -> Result<(Arc<dyn ContentGenerator>, String)> {
    if let Some(path) = &cli.input {
        let generator = FixtureGenerator::from_file(path)?;
        return Ok((Arc::new(generator), format!("file: {}", path.display())));
    }
    let api_key = cli
        .api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .context("No API key: set GEMINI_API_KEY or pass --api-key (or use --input FILE)")?;
    let config = gemini_config(api_key, flags)?;
    tracing::debug!(?config, "using Gemini generator");
    let label = config.model().to_string();
    Ok((Arc::new(GeminiGenerator::new(config)), label))
}

fn print_once(
    generator: &dyn ContentGenerator,
    topic: &str,
    mode: RevisionMode,
    concept: &str,
    width: Option<u16>,
) -> Result<()> {
    let text = generator
        .generate(topic, mode, concept)
        .with_context(|| format!("Failed to generate {} for {topic}", mode.label()))?;
    let document = Document::from_text(&text, print_width(width));
    let mut out = std::io::stdout().lock();
    write_document(&mut out, &document, should_use_color()).context("Failed to write output")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = cli.config_flags();

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let interactive = !(cli.print || cli.list_topics);
    logging::init(&LogTarget::select(effective.log_file.as_deref(), interactive))?;
    perf::set_enabled(effective.perf);
    if let Err(err) = perf::set_debug_log_path(effective.render_debug_log.as_deref()) {
        tracing::warn!(error = %err, "failed to open render debug log");
    }

    if cli.list_topics {
        let mut out = std::io::stdout().lock();
        for (idx, topic) in BIOLOGY_TOPICS.iter().enumerate() {
            writeln!(out, "{:>2}. {topic}", idx + 1)?;
        }
        return Ok(());
    }

    let topic_index = match effective.topic.as_deref() {
        Some(query) => find_topic(query)
            .with_context(|| format!("Unknown topic {query:?} (see --list-topics)"))?,
        None => 0,
    };
    let mode = effective.mode.unwrap_or_default();
    let concept = effective.concept.clone().unwrap_or_default();

    let (generator, label) = build_generator(&cli, &effective)?;

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background(detect_background()),
        ThemeMode::Light => set_background(Some(Background::Light)),
        ThemeMode::Dark => set_background(Some(Background::Dark)),
    }

    if cli.print {
        return print_once(
            generator.as_ref(),
            BIOLOGY_TOPICS[topic_index],
            mode,
            &concept,
            effective.width,
        );
    }

    let mut app = App::new(generator)
        .with_topic_index(topic_index)
        .with_mode(mode)
        .with_concept(concept)
        .with_wrap_width(effective.width)
        .with_model_label(label)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
