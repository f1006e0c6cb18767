//! Main-thread pagination over the AJAX continuation endpoint
//!
//! Each response carries the cursor for the next request, so pages are
//! fetched strictly one after another until the cursor runs out or the
//! transport gives up.

use std::time::Duration;

use crate::crawler::fetcher::{AjaxRequest, CommentFetcher};
use crate::crawler::state::{CrawlCursor, CrawlSession};
use crate::models::CrawlStats;
use crate::parser::CommentFragment;
use crate::storage::CommentSink;
use crate::utils::error::CrawlerError;

/// Build the continuation request for the current cursor
///
/// The first request asks for the order menu and sends no page token;
/// later requests send the page token and drop the menu flag.
pub fn comment_page_request(video_id: &str, cursor: &CrawlCursor) -> AjaxRequest {
    let mut query = vec![
        ("action_load_comments", "1".to_string()),
        ("order_by_time", "true".to_string()),
        ("filter", video_id.to_string()),
    ];
    let mut form = vec![
        ("video_id", video_id.to_string()),
        ("session_token", cursor.session_token.clone()),
    ];

    if cursor.is_first_request {
        query.push(("order_menu", "true".to_string()));
    } else {
        form.push(("page_token", cursor.page_token.clone()));
    }

    AjaxRequest { query, form }
}

/// Drives the cursor state machine for one video
pub struct Paginator<'a> {
    fetcher: &'a CommentFetcher,
    politeness_delay: Duration,
    max_pages: Option<u32>,
}

impl<'a> Paginator<'a> {
    pub fn new(fetcher: &'a CommentFetcher, politeness_delay: Duration) -> Self {
        Self {
            fetcher,
            politeness_delay,
            max_pages: None,
        }
    }

    /// Stop after `max_pages` continuation pages
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: Option<u32>) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetch continuation pages until the cursor is exhausted
    ///
    /// A transport failure ends pagination quietly; records already emitted
    /// stay emitted. Only sink errors are returned.
    pub async fn run<S>(
        &self,
        session: &mut CrawlSession,
        mut cursor: CrawlCursor,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<(), CrawlerError>
    where
        S: CommentSink + ?Sized,
    {
        let mut pages = 0u32;

        while !cursor.is_terminal() {
            if let Some(max) = self.max_pages {
                if pages >= max {
                    tracing::warn!(
                        video_id = %session.video_id,
                        max_pages = max,
                        "Reached maximum page limit, stopping pagination"
                    );
                    break;
                }
            }

            let request = comment_page_request(&session.video_id, &cursor);
            let page = match self.fetcher.post_ajax(&request).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        video_id = %session.video_id,
                        page = pages + 1,
                        error = %e,
                        "Continuation request failed, ending pagination"
                    );
                    stats.pages_failed += 1;
                    break;
                }
            };
            pages += 1;
            stats.pages_fetched += 1;

            let emitted = {
                let fragment = CommentFragment::parse(&page.html);
                session.replies.extend(fragment.reply_thread_ids());
                session.emit_unseen(fragment.comments(), sink, stats)?
            };

            tracing::info!(
                video_id = %session.video_id,
                page = pages,
                emitted,
                total = stats.comments_emitted,
                has_next = page.page_token.is_some(),
                "Downloaded comments"
            );

            cursor.advance(page.page_token);
            if !cursor.is_terminal() {
                tokio::time::sleep(self.politeness_delay).await;
            }
        }

        Ok(())
    }
}
