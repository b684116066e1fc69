//! Tracing subscriber setup for the `webcalc` binary.

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset; `-v` can only raise it.
    pub level: String,
    pub format: LogFormat,
    /// File name under `<home_dir>/logs`; file logging is off when unset.
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: LogFormat::Text,
            file: None,
        }
    }
}

/// Filter directive: `-v` may raise the configured level, never lower it.
fn directive(config: &LoggingConfig, verbose: u8) -> &str {
    let (requested, name) = match verbose {
        0 => return &config.level,
        1 => (LevelFilter::INFO, "info"),
        2 => (LevelFilter::DEBUG, "debug"),
        _ => (LevelFilter::TRACE, "trace"),
    };
    let configured = EnvFilter::try_new(&config.level)
        .ok()
        .and_then(|filter| filter.max_level_hint());
    if configured.is_some_and(|level| level >= requested) {
        &config.level
    } else {
        name
    }
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// JSON layer writing to `<home_dir>/logs/<file_name>` through a background worker.
fn file_layer(home_dir: &Path, file_name: &str) -> anyhow::Result<(BoxedLayer, WorkerGuard)> {
    let log_dir = home_dir.join("logs");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(&log_dir, file_name));
    let layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_writer(writer)
        .boxed();
    Ok((layer, guard))
}

/// Install the global subscriber.
///
/// Console output goes to stderr so command output on stdout stays clean.
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the process.
///
/// # Errors
/// Fails on an invalid filter directive, an unwritable log directory, or a
/// subscriber that is already installed.
pub fn init_logging(
    config: &LoggingConfig,
    verbose: u8,
    home_dir: &Path,
) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        let level = directive(config, verbose);
        EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))
    })?;

    let mut layers: Vec<BoxedLayer> = vec![match config.format {
        LogFormat::Text => fmt::layer().with_writer(std::io::stderr).boxed(),
        LogFormat::Json => fmt::layer().json().with_writer(std::io::stderr).boxed(),
    }];

    let file = config
        .file
        .as_deref()
        .map(|file_name| file_layer(home_dir, file_name))
        .transpose()?;
    let guard = file.map(|(layer, guard)| {
        layers.push(layer);
        guard
    });

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_quiet_config_level() {
        let config = LoggingConfig {
            level: "warn".to_owned(),
            ..LoggingConfig::default()
        };
        assert_eq!(directive(&config, 0), "warn");
        assert_eq!(directive(&config, 1), "info");
        assert_eq!(directive(&config, 2), "debug");
        assert_eq!(directive(&config, 5), "trace");
    }

    #[test]
    fn verbosity_never_lowers_config_level() {
        let config = LoggingConfig {
            level: "debug".to_owned(),
            ..LoggingConfig::default()
        };
        assert_eq!(directive(&config, 1), "debug");
        assert_eq!(directive(&config, 2), "debug");
        assert_eq!(directive(&config, 3), "trace");

        let targeted = LoggingConfig {
            level: "warn,calculator=trace".to_owned(),
            ..LoggingConfig::default()
        };
        assert_eq!(directive(&targeted, 2), "warn,calculator=trace");
    }

    #[test]
    fn format_names() {
        let config: LoggingConfig =
            serde_json::from_str(r#"{"format": "json", "file": "webcalc.log"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert_eq!(config.file.as_deref(), Some("webcalc.log"));
    }
}
