use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::timer::TimerPolicy;
use crate::words::store::DEFAULT_SOURCE;

/// Environment variable naming the source selected at startup.
pub const DEFAULT_SOURCE_ENV: &str = "WORDTRAINER_DEFAULT_SOURCE";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_source")]
    pub default_source: String,
    #[serde(default)]
    pub words_dir: Option<String>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_inactivity_timeout_secs")]
    pub inactivity_timeout_secs: u64,
    #[serde(default = "default_break_after_secs")]
    pub break_after_secs: u64,
    #[serde(default = "default_break_length_secs")]
    pub break_length_secs: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_inactivity_timeout_secs() -> u64 {
    120
}
fn default_break_after_secs() -> u64 {
    900
}
fn default_break_length_secs() -> u64 {
    300
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            words_dir: None,
            theme: default_theme(),
            inactivity_timeout_secs: default_inactivity_timeout_secs(),
            break_after_secs: default_break_after_secs(),
            break_length_secs: default_break_length_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.apply_env(std::env::var(DEFAULT_SOURCE_ENV).ok());
        config.validate();
        Ok(config)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wordtrainer")
            .join("config.toml")
    }

    /// An externally supplied default source wins over the config file.
    pub fn apply_env(&mut self, default_source: Option<String>) {
        if let Some(source) = default_source.filter(|s| !s.trim().is_empty()) {
            self.default_source = source.trim().to_string();
        }
    }

    /// Clamp timer values to usable ranges and restore an empty source.
    pub fn validate(&mut self) {
        if self.default_source.trim().is_empty() {
            self.default_source = default_source();
        }
        self.inactivity_timeout_secs = self.inactivity_timeout_secs.clamp(10, 3600);
        self.break_after_secs = self.break_after_secs.clamp(60, 4 * 3600);
        self.break_length_secs = self.break_length_secs.clamp(10, 3600);
    }

    pub fn words_dir(&self) -> Option<PathBuf> {
        self.words_dir.as_ref().map(PathBuf::from)
    }

    pub fn timer_policy(&self) -> TimerPolicy {
        TimerPolicy {
            inactivity: Duration::from_secs(self.inactivity_timeout_secs),
            break_after: Duration::from_secs(self.break_after_secs),
            break_length: Duration::from_secs(self.break_length_secs),
        }
    }
}
