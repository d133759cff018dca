use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::client::{ClientOptions, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Page sizes the lifelog API accepts.
pub const LIMIT_RANGE: std::ops::RangeInclusive<u32> = 1..=10;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct LifelogConfig {
    pub api: ApiConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub default_limit: u32,
    pub format: OutputFormat,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

/// How `lifelog list` prints entries.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            format: OutputFormat::Text,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
        }
    }
}

/// Returns `~/.lifelog/`, or `./.lifelog/` when no home directory is known.
pub fn default_lifelog_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".lifelog")
}

/// Returns the default config file path: `~/.lifelog/config.toml`
pub fn default_config_path() -> PathBuf {
    default_lifelog_dir().join("config.toml")
}

impl LifelogConfig {
    /// Load config from the default TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            LifelogConfig::default()
        };

        config.apply_env_overrides();
        config
            .validate()
            .with_context(|| format!("invalid config in {}", path.display()))?;
        Ok(config)
    }

    /// Check values that the API would reject.
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            LIMIT_RANGE.contains(&self.output.default_limit),
            "output.default_limit must be between {} and {}, got {}",
            LIMIT_RANGE.start(),
            LIMIT_RANGE.end(),
            self.output.default_limit
        );
        Ok(())
    }

    /// Apply environment variable overrides (LIMITLESS_API_KEY, LIMITLESS_BASE_URL,
    /// LIFELOG_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("LIMITLESS_API_KEY").filter(|v| !v.is_empty()) {
            self.api.api_key = Some(val);
        }
        if let Some(val) = lookup("LIMITLESS_BASE_URL").filter(|v| !v.is_empty()) {
            self.api.base_url = val;
        }
        if let Some(val) = lookup("LIFELOG_LOG_LEVEL") {
            self.log.level = val;
        }
    }

    /// Connection settings for [`crate::client::LifelogClient`].
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }
}
