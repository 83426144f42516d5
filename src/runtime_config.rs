//! # Runtime Configuration Module
//!
//! Application configuration loaded from an optional YAML file and overridden by environment
//! variables.
//!
//! ## Example Configuration
//!
//! ```yaml
//! templates_dir: templates
//! static_dir: static
//! static_prefix: /static
//! addr: 0.0.0.0:8080
//! stack_size: 0x10000
//! log:
//!   level: info
//!   format: json
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Field |
//! |----------|-------|
//! | `KAHLESS_TEMPLATES_DIR` | `templates_dir` |
//! | `KAHLESS_STATIC_DIR` | `static_dir` |
//! | `KAHLESS_STATIC_PREFIX` | `static_prefix` |
//! | `KAHLESS_ADDR` | `addr` |
//! | `KAHLESS_STACK_SIZE` | `stack_size` (decimal or `0x` hex) |
//! | `KAHLESS_LOG_LEVEL`, `KAHLESS_LOG_FORMAT` | `log.*` |
//!
//! ### `KAHLESS_STACK_SIZE`
//!
//! Stack size for the request coroutines. Handlers run on the coroutine serving the
//! connection, so deep handler call chains or large locals need a bigger stack. Too small
//! overflows; too large wastes memory (stack_size × concurrent connections).

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};

use crate::error::ConfigError;
use crate::logging::LogConfig;

pub const DEFAULT_STACK_SIZE: usize = 0x10000;
pub const DEFAULT_STATIC_PREFIX: &str = "/static";
pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";

/// Parse a stack size given in decimal or `0x`-prefixed hex.
pub fn parse_stack_size(value: &str) -> Option<usize> {
    let value = value.trim();
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

fn deserialize_stack_size<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(usize),
        Text(String),
    }
    match Raw::deserialize(d)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => parse_stack_size(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid stack size `{s}`"))),
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory templates are loaded from
    pub templates_dir: PathBuf,
    /// Root for static assets; static serving is disabled when unset
    pub static_dir: Option<PathBuf>,
    /// URL prefix under which static assets are served
    pub static_prefix: String,
    /// Listen address for `serve`
    pub addr: String,
    /// Coroutine stack size in bytes
    #[serde(deserialize_with = "deserialize_stack_size")]
    pub stack_size: usize,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            static_dir: None,
            static_prefix: DEFAULT_STATIC_PREFIX.to_string(),
            addr: DEFAULT_ADDR.to_string(),
            stack_size: DEFAULT_STACK_SIZE,
            log: LogConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparsable `KAHLESS_STACK_SIZE`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// Load a YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an override is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: display.clone(),
            source,
        })?;
        let config: AppConfig = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })?;
        config.with_env_overrides()
    }

    /// Apply `KAHLESS_*` environment variables on top of this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unparsable `KAHLESS_STACK_SIZE`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(dir) = env::var("KAHLESS_TEMPLATES_DIR") {
            self.templates_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("KAHLESS_STATIC_DIR") {
            self.static_dir = Some(PathBuf::from(dir));
        }
        if let Ok(prefix) = env::var("KAHLESS_STATIC_PREFIX") {
            self.static_prefix = prefix;
        }
        if let Ok(addr) = env::var("KAHLESS_ADDR") {
            self.addr = addr;
        }
        if let Ok(val) = env::var("KAHLESS_STACK_SIZE") {
            self.stack_size = parse_stack_size(&val).ok_or(ConfigError::InvalidValue {
                key: "KAHLESS_STACK_SIZE",
                value: val,
            })?;
        }
        self.log = self.log.with_env_overrides();
        Ok(self)
    }

    /// Static prefix normalized to `/segment` form without a trailing slash.
    #[must_use]
    pub fn normalized_static_prefix(&self) -> String {
        let trimmed = self.static_prefix.trim_matches('/');
        format!("/{trimmed}")
    }
}
