// Core data structures for the comment crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One comment extracted from a fragment
///
/// Field names on the wire follow the downstream consumers of the
/// newline-delimited JSON stream (`cid`, `time`, `clikes`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "cid")]
    pub id: String,
    pub text: String,
    #[serde(rename = "time")]
    pub timestamp_label: String,
    pub author: String,
    #[serde(rename = "clikes")]
    pub like_count: u64,
    #[serde(rename = "cdislikes")]
    pub dislike_count: u64,
}

/// Per-video crawl statistics
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    pub video_id: String,
    pub comments_emitted: u64,
    pub duplicates_skipped: u64,
    pub pages_fetched: u32,
    pub pages_failed: u32,
    pub reply_threads_fetched: u32,
    pub reply_threads_failed: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStats {
    /// Create stats for a video crawl starting now
    pub fn new(video_id: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            comments_emitted: 0,
            duplicates_skipped: 0,
            pages_fetched: 0,
            pages_failed: 0,
            reply_threads_fetched: 0,
            reply_threads_failed: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Mark the crawl as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Elapsed seconds, up to now if the crawl has not finished
    pub fn duration_secs(&self) -> u64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.started_at).num_seconds().max(0) as u64
    }

    /// Calculate crawl rate (comments per minute)
    pub fn crawl_rate(&self) -> f64 {
        let secs = self.duration_secs();
        if secs == 0 {
            0.0
        } else {
            (self.comments_emitted as f64 / secs as f64) * 60.0
        }
    }
}

/// Totals for a multi-video run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub videos_succeeded: u32,
    pub videos_failed: u32,
    pub total_comments: u64,
    pub failed_videos: Vec<String>,
}

impl RunSummary {
    pub fn record_success(&mut self, stats: &CrawlStats) {
        self.videos_succeeded += 1;
        self.total_comments += stats.comments_emitted;
    }

    pub fn record_failure(&mut self, video_id: &str, emitted_before_failure: u64) {
        self.videos_failed += 1;
        self.total_comments += emitted_before_failure;
        self.failed_videos.push(video_id.to_string());
    }

    pub fn videos_attempted(&self) -> u32 {
        self.videos_succeeded + self.videos_failed
    }
}
