//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Adaptive request pacing settings
    #[serde(default)]
    pub pacing: PacingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.user_agent.trim().is_empty() {
            return Err(AppError::config("crawler.user_agent is empty"));
        }
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::config("crawler.timeout_secs must be > 0"));
        }
        if self.pacing.min_delay_secs == 0 {
            return Err(AppError::config("pacing.min_delay_secs must be > 0"));
        }
        if self.pacing.max_delay_secs < self.pacing.min_delay_secs {
            return Err(AppError::config(
                "pacing.max_delay_secs must be >= pacing.min_delay_secs",
            ));
        }
        if self.pacing.max_attempts == 0 {
            return Err(AppError::config("pacing.max_attempts must be > 0"));
        }
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Adaptive pacing settings.
///
/// The inter-request delay always stays within
/// `[min_delay_secs, max_delay_secs]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Floor for the inter-request delay in seconds
    #[serde(default = "defaults::min_delay")]
    pub min_delay_secs: u64,

    /// Ceiling for the inter-request delay in seconds
    #[serde(default = "defaults::max_delay")]
    pub max_delay_secs: u64,

    /// Delay applied when the remote responds slowly, in seconds
    #[serde(default = "defaults::slow_delay")]
    pub slow_delay_secs: u64,

    /// Response time above which a request counts as slow, in seconds
    #[serde(default = "defaults::slow_response")]
    pub slow_response_secs: u64,

    /// Maximum request attempts per item before giving up
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_delay_secs: defaults::min_delay(),
            max_delay_secs: defaults::max_delay(),
            slow_delay_secs: defaults::slow_delay(),
            slow_response_secs: defaults::slow_response(),
            max_attempts: defaults::max_attempts(),
        }
    }
}

mod defaults {
    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; leetcrawl/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Pacing defaults
    pub fn min_delay() -> u64 {
        1
    }
    pub fn max_delay() -> u64 {
        60
    }
    pub fn slow_delay() -> u64 {
        5
    }
    pub fn slow_response() -> u64 {
        2
    }
    pub fn max_attempts() -> u32 {
        5
    }
}
