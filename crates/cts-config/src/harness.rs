//! Harness configuration types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::validate::ValidationError;

/// Default bounded-wait timeout applied by test drivers.
pub const DEFAULT_WAIT_TIMEOUT_MS: u64 = 5_000;

/// Default prefix for action worker thread names.
pub const DEFAULT_THREAD_NAME_PREFIX: &str = "cts-action";

/// Smallest stack size accepted for action threads.
pub const MIN_THREAD_STACK_SIZE: usize = 64 * 1024;

/// Output format of the diagnostic log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// `EnvFilter` directive string; `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    DEFAULT_WAIT_TIMEOUT_MS
}

fn default_thread_name_prefix() -> String {
    DEFAULT_THREAD_NAME_PREFIX.to_string()
}

/// Top-level harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Timeout used by drivers that wait on actions without an explicit bound.
    #[serde(default = "default_wait_timeout_ms")]
    pub default_wait_timeout_ms: u64,

    /// Worker threads are named `<prefix>-<short action id>`.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,

    /// Stack size for worker threads; platform default when unset.
    #[serde(default)]
    pub thread_stack_size: Option<usize>,

    #[serde(default)]
    pub log: LogConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            default_wait_timeout_ms: DEFAULT_WAIT_TIMEOUT_MS,
            thread_name_prefix: default_thread_name_prefix(),
            thread_stack_size: None,
            log: LogConfig::default(),
        }
    }
}

impl HarnessConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ValidationError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::parse_json(&content)
    }

    /// Parse a config from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e)))
    }

    /// The default wait timeout as a `Duration`.
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.default_wait_timeout_ms)
    }

    /// Serialize the config to pretty JSON.
    pub fn to_json(&self) -> Result<String, ValidationError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ValidationError::ParseError(format!("Failed to serialize: {}", e)))
    }
}
