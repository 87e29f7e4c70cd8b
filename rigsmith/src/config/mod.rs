//! Runtime configuration: typed sections with defaults, read from XDG `config.toml`, then
//! overridden from the environment.
//!
//! Precedence per field: **process env > project `.env` > XDG `config.toml` > default**. The
//! project `.env` is applied to the process environment first (never replacing variables that
//! are already set), so a single pass of environment overrides covers both.

mod env;
mod xdg_toml;

pub use env::apply_overrides;
pub use xdg_toml::{load_file, xdg_config_path};

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::bundle::DEFAULT_BATCH_INTERVAL;
use crate::cache::DEFAULT_PRODUCT_TTL;
use crate::fetch::DEFAULT_FETCH_INTERVAL;
use crate::llm::ChatOpenAI;
use crate::marketplace::MarketplaceConfig;
use crate::planner::PlannerConfig;
use crate::retry::BackoffPolicy;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read config file: {0}")]
    Read(#[source] std::io::Error),
    #[error("parse config toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    Dotenv(String),
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}

/// Spacing of marketplace requests and resolution batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub fetch_interval_ms: u64,
    pub batch_interval_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            fetch_interval_ms: DEFAULT_FETCH_INTERVAL.as_millis() as u64,
            batch_interval_ms: DEFAULT_BATCH_INTERVAL.as_millis() as u64,
        }
    }
}

impl PacingConfig {
    pub fn fetch_interval(&self) -> Duration {
        Duration::from_millis(self.fetch_interval_ms)
    }

    pub fn batch_interval(&self) -> Duration {
        Duration::from_millis(self.batch_interval_ms)
    }
}

/// Backoff on marketplace throttling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub base_delay_ms: u64,
    pub max_retries: usize,
}

impl Default for RetryConfig {
    fn default() -> Self {
        let policy = BackoffPolicy::default();
        Self {
            base_delay_ms: policy.base_delay.as_millis() as u64,
            max_retries: policy.max_retries,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> BackoffPolicy {
        BackoffPolicy::new(Duration::from_millis(self.base_delay_ms), self.max_retries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_PRODUCT_TTL.as_secs(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Generative-text provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// API key; when unset the client falls back to `OPENAI_API_KEY` at request time.
    pub api_key: Option<String>,
    /// OpenAI-compatible base URL, e.g. `https://api.openai.com/v1`.
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: Option<f32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            temperature: None,
        }
    }
}

impl LlmConfig {
    /// Chat completions client for this section.
    pub fn client(&self) -> ChatOpenAI {
        let client = match &self.api_key {
            Some(key) => ChatOpenAI::from_credentials(key, self.base_url.as_deref(), &self.model),
            None => ChatOpenAI::new(&self.model),
        };
        match self.temperature {
            Some(t) => client.with_temperature(t),
            None => client,
        }
    }
}

/// Whole runtime configuration. Every section defaults, so an empty file is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub marketplace: MarketplaceConfig,
    pub pacing: PacingConfig,
    pub retry: RetryConfig,
    pub cache: CacheConfig,
    pub planner: PlannerConfig,
    pub llm: LlmConfig,
}

/// Loads configuration for `app_name`.
///
/// * Applies `.env` from `override_dir` (or the current directory and its parents) without
///   replacing variables that are already set.
/// * Reads `$XDG_CONFIG_HOME/<app_name>/config.toml` when it exists.
/// * Applies `RIGSMITH_*` and `OPENAI_*` environment overrides.
pub fn load(app_name: &str, override_dir: Option<&Path>) -> Result<RigConfig, LoadError> {
    apply_dotenv(override_dir)?;

    let mut config = match xdg_config_path(app_name)? {
        Some(path) => {
            debug!(path = %path.display(), "reading config file");
            load_file(&path)?
        }
        None => RigConfig::default(),
    };
    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
    Ok(config)
}

fn apply_dotenv(override_dir: Option<&Path>) -> Result<(), LoadError> {
    match override_dir {
        Some(dir) => {
            let path = dir.join(".env");
            if path.is_file() {
                dotenv::from_path(&path).map_err(|e| LoadError::Dotenv(e.to_string()))?;
            }
            Ok(())
        }
        None => match dotenv::dotenv() {
            Ok(path) => {
                debug!(path = %path.display(), "applied .env");
                Ok(())
            }
            Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LoadError::Dotenv(e.to_string())),
        },
    }
}
