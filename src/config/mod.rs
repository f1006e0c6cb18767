//! Configuration management for the comment crawler
//!
//! Every setting has a built-in default; a TOML file can override any
//! subset of them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::Error;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Retry/backoff configuration for AJAX requests
    pub retry: RetrySettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Initial comments page; `{video_id}` is substituted
    pub comments_url_template: String,

    /// AJAX continuation endpoint
    pub ajax_url: String,

    /// User agent string sent on every request of the session
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Fixed delay between successive AJAX requests
    pub politeness_delay_ms: u64,

    /// Stop paginating after this many continuation pages (None = until exhausted)
    pub max_pages: Option<u32>,
}

/// Retry budget and backoff window
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    /// Total attempts per request, including the first
    pub max_attempts: u32,

    /// Lower bound of the randomized backoff sleep (inclusive)
    pub min_sleep_ms: u64,

    /// Upper bound of the randomized backoff sleep (exclusive)
    pub max_sleep_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            comments_url_template: String::from(
                "https://www.youtube.com/all_comments?v={video_id}",
            ),
            ajax_url: String::from("https://www.youtube.com/comment_ajax"),
            user_agent: String::from(
                "Mozilla/5.0 (Windows NT 6.1; WOW64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/48.0.2564.116 Safari/537.36",
            ),
            request_timeout_secs: 30,
            politeness_delay_ms: 1000,
            max_pages: None,
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            min_sleep_ms: 60_000,
            max_sleep_ms: 400_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(Error::config("retry.max_attempts must be greater than 0"));
        }

        if self.retry.min_sleep_ms >= self.retry.max_sleep_ms {
            return Err(Error::config(
                "retry.min_sleep_ms must be below retry.max_sleep_ms",
            ));
        }

        if !self.crawler.comments_url_template.contains("{video_id}") {
            return Err(Error::config(
                "crawler.comments_url_template must contain {video_id}",
            ));
        }

        if self.crawler.request_timeout_secs == 0 {
            return Err(Error::config(
                "crawler.request_timeout_secs must be greater than 0",
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::config(format!(
                "logging.format must be text or json, got {}",
                self.logging.format
            )));
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the politeness delay as Duration
    #[must_use]
    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.politeness_delay_ms)
    }

    /// Initial comments page URL for a video
    pub fn comments_url(&self, video_id: &str) -> String {
        self.crawler
            .comments_url_template
            .replace("{video_id}", video_id)
    }
}
