//! Error types for the comment crawler
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Retry budget exhausted
    #[error("Maximum retry attempts exceeded after {attempts} attempt(s)")]
    MaxRetriesExceeded { attempts: u32 },

    /// Response body could not be decoded into the AJAX envelope
    #[error("Decoding error: {0}")]
    Decode(String),
}

/// Errors that can occur while extracting a comment block
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Comment block has no `data-cid` attribute
    #[error("Comment block has no data-cid attribute")]
    MissingId,

    /// Required sub-element absent from a comment block
    #[error("Comment block {block} is missing required element {element}")]
    MissingElement {
        element: &'static str,
        block: String,
    },
}

/// General crawler errors
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Initial page could not be loaded; fatal for this video only
    #[error("Initial page for video {video_id} unavailable: {source}")]
    InitialPage {
        video_id: String,
        #[source]
        source: FetchError,
    },

    /// Output sink failed to accept a record
    #[error("Sink error: {0}")]
    Sink(#[from] std::io::Error),
}
