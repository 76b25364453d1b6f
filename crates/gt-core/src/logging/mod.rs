//! Structured logging for the GPU test gate.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the embedding test harness, which can call [`init_logging`] once at startup.
//!
//! - stderr receives all log output (human or JSONL)
//! - event targets come from [`event_names`] so decisions can be filtered

pub mod config;
pub mod events;

pub use config::{FilterSource, LogConfig, LogFormat};
pub use events::event_names;

use self::config::DEFAULT_FILTER;

use std::io::IsTerminal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// Filters with `config.filter`, falling back to [`DEFAULT_FILTER`]
/// when the directives do not parse. Returns false if a subscriber was
/// already installed (e.g. by another test).
pub fn init_logging(config: &LogConfig) -> bool {
    let filter = build_filter(config);

    match config.format {
        LogFormat::Human => {
            let use_ansi = std::io::stderr().is_terminal();
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(use_ansi);

            if config.timestamps {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer)
                    .try_init()
                    .is_ok()
            } else {
                tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt_layer.without_time())
                    .try_init()
                    .is_ok()
            }
        }
        LogFormat::Jsonl => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .is_ok(),
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize logging from the environment (for tests and simple cases).
pub fn init_default_logging() -> bool {
    init_logging(&LogConfig::from_env(None, None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::config::ENV_LOG;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn test_filter_comes_from_config_not_process_env() {
        let config = LogConfig::from_lookup(
            |key| (key == ENV_LOG).then(|| "error".to_string()),
            None,
            None,
        );
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_bad_directives_fall_back_to_default() {
        let config = LogConfig {
            filter: "gate.skip=loud".to_string(),
            filter_source: FilterSource::RustLog,
            ..LogConfig::default()
        };
        assert_eq!(build_filter(&config).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn test_second_init_is_harmless() {
        let config = LogConfig::default().with_level(LevelFilter::OFF);
        let _ = init_logging(&config);
        assert!(!init_logging(&config));
    }

    #[test]
    fn test_event_names_are_dotted() {
        for name in [
            event_names::PROFILE_LOADED,
            event_names::GATE_SKIP,
            event_names::ANALYSIS_CONFLICT,
            event_names::CONFIG_INVALID,
        ] {
            assert!(name.contains('.'), "{name}");
        }
    }
}
