//! Structured logging setup.
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and either JSON (production) or
//! pretty (development) output. `RUST_LOG` wins over the configured level when set.

use std::env;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

impl LogFormat {
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated), e.g. `kahless::router=debug`
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Apply `KAHLESS_LOG_LEVEL`, `KAHLESS_LOG_FORMAT` and `KAHLESS_LOG_TARGET_FILTER`.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = env::var("KAHLESS_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("KAHLESS_LOG_FORMAT") {
            self.format = LogFormat::parse(&format);
        }
        if let Ok(filter) = env::var("KAHLESS_LOG_TARGET_FILTER") {
            self.target_filter = Some(filter);
        }
        self
    }

    #[must_use]
    pub fn default_dev() -> Self {
        Self {
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: true,
        }
    }

    fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

/// Install the global subscriber. Calling it again is a no-op.
///
/// # Errors
///
/// Returns an error if another global subscriber was installed outside this function.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    if INITIALIZED.get().is_some() {
        return Ok(());
    }

    let mut env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level().as_str()));

    // may_minihttp logs every client disconnect; keep warn+ only.
    if let Ok(directive) = "may_minihttp=warn".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    if let Some(target_filter) = &config.target_filter {
        for filter in target_filter.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            match filter.parse() {
                Ok(directive) => env_filter = env_filter.add_directive(directive),
                Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
            }
        }
    }

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_span_list(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    INITIALIZED.get_or_init(|| ());
    Ok(())
}
