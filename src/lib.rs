//! ytcomments - incremental video comment crawler
//!
//! Downloads a video's entire comment thread, including continuation pages
//! and reply threads, from the legacy `all_comments` page and its
//! `comment_ajax` continuation endpoint, and streams the comments as
//! newline-delimited JSON.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Token extraction, retrying transport, pagination, reply expansion
//! - [`parser`] - Comment block extraction from HTML fragments
//! - [`models`] - Core data structures and types
//! - [`storage`] - Output sinks
//! - [`utils`] - Retry helpers, error types, input parsing
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use ytcomments::config::Config;
//! use ytcomments::crawler::CommentCrawler;
//! use ytcomments::storage::JsonLinesSink;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let crawler = CommentCrawler::new(Config::default())?;
//!     let mut sink = JsonLinesSink::new(Path::new("."))?;
//!     let summary = crawler.run(&["dQw4w9WgXcQ".to_string()], &mut sink).await;
//!     println!("{} comments", summary.total_comments);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::CommentCrawler;
    pub use crate::error::{CrawlErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{CommentRecord, CrawlStats, RunSummary};
    pub use crate::parser::CommentFragment;
    pub use crate::storage::{CommentSink, JsonLinesSink};
}

// Direct re-exports for convenience
pub use models::{CommentRecord, CrawlStats, RunSummary};
