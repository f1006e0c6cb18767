//! Reply-thread expansion
//!
//! Runs after main-thread pagination. Each queued thread is requested once
//! and its comments are flattened into the same output stream.

use std::collections::HashSet;
use std::time::Duration;

use crate::crawler::fetcher::{AjaxRequest, CommentFetcher};
use crate::crawler::state::{CrawlSession, ReplyQueue};
use crate::models::CrawlStats;
use crate::parser::CommentFragment;
use crate::storage::CommentSink;
use crate::utils::error::CrawlerError;

/// Build the request loading every reply of one thread
pub fn reply_request(video_id: &str, thread_id: &str, session_token: &str) -> AjaxRequest {
    AjaxRequest {
        query: vec![
            ("action_load_replies", "1".to_string()),
            ("order_by_time", "true".to_string()),
            ("filter", video_id.to_string()),
            ("tab", "inbox".to_string()),
        ],
        form: vec![
            ("comment_id", thread_id.to_string()),
            ("video_id", video_id.to_string()),
            ("can_reply", "1".to_string()),
            ("session_token", session_token.to_string()),
        ],
    }
}

/// Requests queued reply threads for one video
pub struct ReplyExpander<'a> {
    fetcher: &'a CommentFetcher,
    politeness_delay: Duration,
}

impl<'a> ReplyExpander<'a> {
    pub fn new(fetcher: &'a CommentFetcher, politeness_delay: Duration) -> Self {
        Self {
            fetcher,
            politeness_delay,
        }
    }

    /// Drain `queue` in discovery order
    ///
    /// A failed thread is logged and skipped. Thread ids found inside reply
    /// fragments are not followed.
    pub async fn run<S>(
        &self,
        session: &mut CrawlSession,
        queue: ReplyQueue,
        session_token: &str,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<(), CrawlerError>
    where
        S: CommentSink + ?Sized,
    {
        let mut requested = HashSet::new();

        for thread_id in queue {
            if !requested.insert(thread_id.clone()) {
                continue;
            }

            let request = reply_request(&session.video_id, &thread_id, session_token);
            match self.fetcher.post_ajax(&request).await {
                Ok(page) => {
                    stats.reply_threads_fetched += 1;

                    let emitted = {
                        let fragment = CommentFragment::parse(&page.html);
                        session.emit_unseen(fragment.comments(), sink, stats)?
                    };

                    tracing::debug!(
                        video_id = %session.video_id,
                        thread_id = %thread_id,
                        emitted,
                        total = stats.comments_emitted,
                        "Expanded reply thread"
                    );
                }
                Err(e) => {
                    stats.reply_threads_failed += 1;
                    tracing::warn!(
                        video_id = %session.video_id,
                        thread_id = %thread_id,
                        error = %e,
                        "Reply thread request failed, skipping"
                    );
                }
            }

            tokio::time::sleep(self.politeness_delay).await;
        }

        Ok(())
    }
}
