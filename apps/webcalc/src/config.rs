//! Layered application configuration.
//!
//! defaults -> YAML file (`--config`) -> `WEBCALC__*` environment -> CLI overrides

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use calculator::{CalculatorConfig, HistoryConfig};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;
use crate::paths;

pub const ENV_PREFIX: &str = "WEBCALC__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// State directory (history database, logs). Supports `~`.
    pub home_dir: String,
    pub calculator: CalculatorConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            home_dir: "~/.webcalc".to_owned(),
            calculator: CalculatorConfig::default(),
            history: HistoryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Values given on the command line; `None` leaves the configured value.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub endpoint: Option<String>,
}

impl AppConfig {
    /// Build the layered figment without extracting it.
    #[must_use]
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Yaml::file_exact(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    /// Fails if the YAML cannot be parsed or a value has the wrong shape.
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        Self::figment(config_path)
            .extract()
            .context("failed to load configuration")
    }

    pub fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        if let Some(endpoint) = &overrides.endpoint {
            endpoint.clone_into(&mut self.calculator.endpoint);
        }
    }

    /// Resolve `home_dir`, create it, and store the absolute form back.
    ///
    /// # Errors
    /// See [`paths::resolve_home_dir`].
    pub fn normalize_home_dir(&mut self) -> anyhow::Result<PathBuf> {
        let resolved = paths::resolve_home_dir(&self.home_dir, true)
            .with_context(|| format!("invalid home_dir '{}'", self.home_dir))?;
        self.home_dir = resolved.to_string_lossy().into_owned();
        Ok(resolved)
    }

    /// History database URL, defaulting to a file under `home_dir`.
    #[must_use]
    pub fn history_url(&self, home_dir: &Path) -> String {
        self.history
            .database_url
            .clone()
            .unwrap_or_else(|| paths::default_history_url(home_dir))
    }

    /// Semantic checks that deserialization cannot express.
    ///
    /// # Errors
    /// Describes the first invalid value.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.calculator.check_endpoint().with_context(|| {
            format!(
                "calculator.endpoint '{}' is not usable; http:// also needs calculator.allow_insecure_http",
                self.calculator.endpoint
            )
        })?;
        if self.calculator.timeout_ms == 0 {
            bail!("calculator.timeout_ms must be greater than zero");
        }
        Ok(())
    }

    /// # Errors
    /// Propagates serializer errors.
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
