//! Logging configuration.
//!
//! Everything [`init_logging`](super::init_logging) needs is resolved here,
//! once, from a key lookup:
//! - `GT_LOG`: a single level (`trace`, `debug`, `info`, `warn`, `error`, `off`)
//! - `RUST_LOG`: full `EnvFilter` directives, used only when `GT_LOG` is unset
//! - `GT_LOG_FORMAT`: `human` or `jsonl`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

pub const ENV_LOG: &str = "GT_LOG";
pub const ENV_RUST_LOG: &str = "RUST_LOG";
pub const ENV_LOG_FORMAT: &str = "GT_LOG_FORMAT";

/// Filter used when neither variable is set.
pub const DEFAULT_FILTER: &str = "info";

/// Output format of the stderr layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event.
    Jsonl,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(LogFormat::Human),
            "jsonl" => Ok(LogFormat::Jsonl),
            _ => Err(format!("unknown log format: {}", s)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Human => write!(f, "human"),
            LogFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}

/// Where the filter directives came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSource {
    Default,
    /// Level passed by the embedding harness.
    Explicit,
    GtLog,
    RustLog,
}

/// Resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives handed to the subscriber.
    pub filter: String,
    pub filter_source: FilterSource,
    /// Timestamps in human output.
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            format: LogFormat::Human,
            filter: DEFAULT_FILTER.to_string(),
            filter_source: FilterSource::Default,
            timestamps: true,
        }
    }
}

fn level_directive(level: LevelFilter) -> String {
    level.to_string().to_ascii_lowercase()
}

impl LogConfig {
    /// Resolve from the process environment; `level` and `format` win when given.
    pub fn from_env(level: Option<LevelFilter>, format: Option<LogFormat>) -> Self {
        Self::from_lookup(|key| std::env::var(key).ok(), level, format)
    }

    /// Resolve from an arbitrary key lookup.
    ///
    /// Precedence for the filter: explicit `level`, then a parseable `GT_LOG`,
    /// then non-empty `RUST_LOG` directives, then [`DEFAULT_FILTER`].
    /// Unparseable `GT_LOG`/`GT_LOG_FORMAT` values are ignored.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        level: Option<LevelFilter>,
        format: Option<LogFormat>,
    ) -> Self {
        let mut config = LogConfig::default();

        let gt_log = lookup(ENV_LOG).and_then(|val| val.trim().parse::<LevelFilter>().ok());
        if let Some(level) = level {
            config = config.with_level(level);
        } else if let Some(level) = gt_log {
            config.filter = level_directive(level);
            config.filter_source = FilterSource::GtLog;
        } else if let Some(directives) = lookup(ENV_RUST_LOG).filter(|d| !d.trim().is_empty()) {
            config.filter = directives.trim().to_string();
            config.filter_source = FilterSource::RustLog;
        }

        config.format = format
            .or_else(|| lookup(ENV_LOG_FORMAT).and_then(|val| val.parse().ok()))
            .unwrap_or_default();

        config
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Filter everything at a single level.
    pub fn with_level(mut self, level: LevelFilter) -> Self {
        self.filter = level_directive(level);
        self.filter_source = FilterSource::Explicit;
        self
    }

    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }
}
