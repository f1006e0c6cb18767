//! Per-video crawl state
//!
//! Cursor, reply queue and dedup set live for exactly one video's crawl.
//! The driver builds a fresh [`CrawlSession`] for every video id.

use std::collections::HashSet;

use crate::crawler::token::InitialTokens;
use crate::models::{CommentRecord, CrawlStats};
use crate::storage::CommentSink;
use crate::utils::error::CrawlerError;

/// Pagination cursor
///
/// An empty `page_token` is terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlCursor {
    pub page_token: String,
    pub session_token: String,
    pub is_first_request: bool,
}

impl CrawlCursor {
    /// Cursor for the first continuation request
    ///
    /// Returns `None` without a session token: no continuation request can
    /// be made without one.
    pub fn start(tokens: &InitialTokens) -> Option<Self> {
        let session_token = tokens.session_token.clone()?;

        Some(Self {
            page_token: tokens.page_token.clone().unwrap_or_default(),
            session_token,
            is_first_request: true,
        })
    }

    pub fn is_terminal(&self) -> bool {
        self.page_token.is_empty()
    }

    /// Move to the next page; `None` from the server ends pagination
    pub fn advance(&mut self, next_page_token: Option<String>) {
        self.page_token = next_page_token.unwrap_or_default();
        self.is_first_request = false;
    }
}

/// Reply-thread ids in discovery order
///
/// Append-only while the main thread is crawled; consumed once by reply
/// expansion through [`IntoIterator`].
#[derive(Debug, Default)]
pub struct ReplyQueue {
    ids: Vec<String>,
}

impl ReplyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: String) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Extend<String> for ReplyQueue {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl IntoIterator for ReplyQueue {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

/// Comment ids already emitted for the current video
#[derive(Debug, Default)]
pub struct SeenIdSet {
    ids: HashSet<String>,
}

impl SeenIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `id`; returns false if it was already emitted
    pub fn insert(&mut self, id: &str) -> bool {
        if self.ids.contains(id) {
            return false;
        }
        self.ids.insert(id.to_string())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Everything scoped to one video's crawl
#[derive(Debug)]
pub struct CrawlSession {
    pub video_id: String,
    pub seen: SeenIdSet,
    pub replies: ReplyQueue,
}

impl CrawlSession {
    pub fn new(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            seen: SeenIdSet::new(),
            replies: ReplyQueue::new(),
        }
    }

    /// Pass every record not seen before to the sink
    ///
    /// Returns the number of records emitted.
    pub fn emit_unseen<S, I>(
        &mut self,
        records: I,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<u64, CrawlerError>
    where
        S: CommentSink + ?Sized,
        I: IntoIterator<Item = CommentRecord>,
    {
        let mut emitted = 0;

        for record in records {
            if !self.seen.insert(&record.id) {
                tracing::trace!(video_id = %self.video_id, cid = %record.id, "Skipping duplicate comment");
                stats.duplicates_skipped += 1;
                continue;
            }

            sink.emit(&self.video_id, &record)?;
            stats.comments_emitted += 1;
            emitted += 1;
        }

        Ok(emitted)
    }
}
