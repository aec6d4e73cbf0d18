//! Engine configuration
//!
//! Read from `.dytyrc` or `.dytyrc.toml`, searched upward from the working
//! directory. Every key is optional.
//!
//! ```toml
//! [merge]
//! unsupported = "incomparable"   # or "propagate"
//!
//! [logging]
//! level = "info"
//! format = "pretty"              # "compact", "json"
//! output = "stderr"              # "stdout", { file = { directory, prefix } }
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{warn, Level};

use crate::analysis::merge::{MergeEngine, UnsupportedPolicy};
use crate::errors::ConfigError;
use crate::infrastructure::logging::{LogConfig, LogFormat, LogOutput};

/// File names probed in each directory, in order
pub const CONFIG_FILES: [&str; 2] = [".dytyrc", ".dytyrc.toml"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Policy for subtype checks with no defined rule
    #[serde(default)]
    pub unsupported: UnsupportedPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,

    #[serde(default)]
    pub span_events: bool,

    /// Extra directives, comma separated
    #[serde(default)]
    pub filter: Option<String>,

    #[serde(default)]
    pub output: LogOutput,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::default(),
            span_events: false,
            filter: None,
            output: LogOutput::default(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find and load the configuration for the current directory, falling
    /// back to defaults when none is found
    pub fn discover() -> Self {
        std::env::current_dir()
            .map(|dir| Self::discover_from(&dir))
            .unwrap_or_default()
    }

    /// Walk from `start` up to the filesystem root. A file that fails to load
    /// is skipped with a warning.
    pub fn discover_from(start: &Path) -> Self {
        for dir in start.ancestors() {
            for name in CONFIG_FILES {
                let path = dir.join(name);
                if !path.is_file() {
                    continue;
                }
                match Self::load(&path) {
                    Ok(config) => return config,
                    Err(err) => warn!(path = %path.display(), %err, "ignoring config file"),
                }
            }
        }
        Self::default()
    }

    pub fn generate_default() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate config"))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn merge_engine(&self) -> MergeEngine {
        MergeEngine::with_policy(self.merge.unsupported)
    }

    /// Logging settings; an unknown level falls back to `info`
    pub fn log_config(&self) -> LogConfig {
        let level = Level::from_str(&self.logging.level).unwrap_or_else(|_| {
            warn!(level = %self.logging.level, "unknown log level");
            Level::INFO
        });
        let mut config = LogConfig::new()
            .with_level(level)
            .with_format(self.logging.format)
            .with_output(self.logging.output.clone())
            .with_span_events(self.logging.span_events);
        if let Some(filter) = &self.logging.filter {
            config = config.with_filter(filter.clone());
        }
        config
    }
}
