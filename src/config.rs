//! Configuration management module
//!
//! Layers, lowest precedence first: built-in defaults, an optional config
//! file (format picked from its extension), `IDCHECK_*` environment
//! variables, then command-line overrides applied by the binary.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use idcheck_core_types::ViewClass;
use serde::{Deserialize, Serialize};
use view_checker::{CheckerConfig, CheckerError, Interval, TraversalOptions};

use crate::errors::Result;

pub const ENV_PREFIX: &str = "IDCHECK";

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Delay between passes, in humantime notation (`5s`, `1m 30s`).
    pub interval: String,
    /// Extra classes that must carry an identifier.
    pub custom_classes: Vec<String>,
    pub guard_cycles: bool,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interval: "5s".to_string(),
            custom_classes: Vec::new(),
            guard_cycles: TraversalOptions::default().guard_cycles,
            log_level: "info".to_string(),
            log_format: LogFormat::Human,
        }
    }
}

impl AppConfig {
    /// Loads from `path` (if any) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`AppConfig::load`], reading environment variables from `env`
    /// instead of the process when given.
    pub fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("custom_classes")
                .source(env),
        );
        Ok(builder.build()?.try_deserialize()?)
    }

    pub fn interval(&self) -> std::result::Result<Duration, CheckerError> {
        humantime::parse_duration(self.interval.trim()).map_err(|err| {
            CheckerError::invalid_interval(format!("{:?}: {err}", self.interval))
        })
    }

    /// Validated checker settings. Fails on a zero or unparsable interval and
    /// on malformed class names.
    pub fn checker_config(&self) -> Result<CheckerConfig> {
        let interval = Interval::new(self.interval()?)?;
        let classes = self
            .custom_classes
            .iter()
            .map(|name| ViewClass::new(name.trim()))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(CheckerConfig::default()
            .with_interval(interval)
            .with_custom_checkable(classes)
            .with_traversal(TraversalOptions {
                guard_cycles: self.guard_cycles,
            }))
    }
}
