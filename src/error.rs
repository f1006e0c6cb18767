//! Unified error handling for the ytcomments crate
//!
//! # Architecture
//!
//! - [`CrawlErrorTrait`] - Common interface implemented by the crawl error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Crate-level error for setup and validation

use thiserror::Error;

pub use crate::utils::error::{CrawlerError, FetchError, ParseError};

/// Common trait for crawl error types
pub trait CrawlErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, retry budget)
    Network,
    /// Envelope decoding errors
    Parsing,
    /// Output and I/O errors
    Storage,
}

impl ErrorCategory {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Storage => "storage error",
        }
    }
}

impl CrawlErrorTrait for FetchError {
    /// Non-success statuses and request-level failures are worth another
    /// attempt; an exhausted budget or an undecodable body is not
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::ServerError(_) | Self::Timeout)
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Decode(_) => ErrorCategory::Parsing,
            _ => ErrorCategory::Network,
        }
    }
}

impl CrawlErrorTrait for CrawlerError {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::InitialPage { source, .. } => source.is_recoverable(),
            Self::Sink(_) => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::InitialPage { source, .. } => source.category(),
            Self::Sink(_) => ErrorCategory::Storage,
        }
    }
}

/// Crate-level error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias using the crate Error type
pub type Result<T> = std::result::Result<T, Error>;
