//! Comment crawling for a list of videos
//!
//! This module implements the crawl driver: for each video it loads the
//! initial comments page, paginates the main thread, expands reply threads
//! and streams every new comment to a [`CommentSink`].

pub mod fetcher;
pub mod pagination;
pub mod replies;
pub mod state;
pub mod token;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::error::CrawlErrorTrait;
use crate::models::{CrawlStats, RunSummary};
use crate::parser::CommentFragment;
use crate::storage::CommentSink;
use crate::utils::error::CrawlerError;
use fetcher::CommentFetcher;
use pagination::Paginator;
use replies::ReplyExpander;
use state::{CrawlCursor, CrawlSession};
use token::InitialTokens;

/// Main crawler structure
pub struct CommentCrawler {
    /// Persistent HTTP session shared by every video of the run
    fetcher: CommentFetcher,

    /// Configuration
    config: Config,
}

impl CommentCrawler {
    /// Create a new crawler instance
    pub fn new(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;

        let fetcher = CommentFetcher::new(&config).context("Failed to create HTTP client")?;

        Ok(Self { fetcher, config })
    }

    /// Create from an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: CommentFetcher) -> Self {
        Self { fetcher, config }
    }

    /// Crawl every video in order, isolating failures per video
    pub async fn run<S>(&self, video_ids: &[String], sink: &mut S) -> RunSummary
    where
        S: CommentSink + ?Sized,
    {
        let mut summary = RunSummary::default();

        for (i, video_id) in video_ids.iter().enumerate() {
            tracing::info!(
                video_id = %video_id,
                position = i + 1,
                total = video_ids.len(),
                "Downloading comments"
            );

            if let Err(e) = sink.begin_video(video_id) {
                tracing::error!(video_id = %video_id, error = %e, "Could not open output");
                summary.record_failure(video_id, 0);
                continue;
            }

            let mut stats = CrawlStats::new(video_id);
            let result = self.crawl_into(video_id, sink, &mut stats).await;
            stats.finish();

            if let Err(e) = sink.finish_video(video_id) {
                tracing::warn!(video_id = %video_id, error = %e, "Could not finalize output");
            }

            match result {
                Ok(()) => {
                    tracing::info!(
                        video_id = %video_id,
                        comments = stats.comments_emitted,
                        duplicates = stats.duplicates_skipped,
                        pages = stats.pages_fetched,
                        reply_threads = stats.reply_threads_fetched,
                        failed_reply_threads = stats.reply_threads_failed,
                        duration_secs = stats.duration_secs(),
                        comments_per_min = stats.crawl_rate(),
                        "Finished video"
                    );
                    summary.record_success(&stats);
                }
                Err(e) => {
                    tracing::error!(
                        video_id = %video_id,
                        comments = stats.comments_emitted,
                        category = e.category().description(),
                        recoverable = e.is_recoverable(),
                        error = %e,
                        "Video crawl failed"
                    );
                    summary.record_failure(video_id, stats.comments_emitted);
                }
            }
        }

        summary
    }

    /// Crawl a single video
    ///
    /// The caller is responsible for `begin_video`/`finish_video` on the sink.
    pub async fn crawl_video<S>(
        &self,
        video_id: &str,
        sink: &mut S,
    ) -> Result<CrawlStats, CrawlerError>
    where
        S: CommentSink + ?Sized,
    {
        let mut stats = CrawlStats::new(video_id);
        self.crawl_into(video_id, sink, &mut stats).await?;
        stats.finish();
        Ok(stats)
    }

    async fn crawl_into<S>(
        &self,
        video_id: &str,
        sink: &mut S,
        stats: &mut CrawlStats,
    ) -> Result<(), CrawlerError>
    where
        S: CommentSink + ?Sized,
    {
        let mut session = CrawlSession::new(video_id);

        let url = self.config.comments_url(video_id);
        let html = self
            .fetcher
            .fetch_page(&url)
            .await
            .map_err(|source| CrawlerError::InitialPage {
                video_id: video_id.to_string(),
                source,
            })?;

        let tokens = InitialTokens::extract(&html);

        let initial = {
            let fragment = CommentFragment::parse(&html);
            session.replies.extend(fragment.reply_thread_ids());
            session.emit_unseen(fragment.comments(), sink, stats)?
        };
        tracing::info!(
            video_id = %video_id,
            emitted = initial,
            reply_threads = session.replies.len(),
            has_page_token = tokens.page_token.is_some(),
            "Parsed initial page"
        );

        let Some(cursor) = CrawlCursor::start(&tokens) else {
            tracing::warn!(
                video_id = %video_id,
                "No session token on initial page, skipping pagination and replies"
            );
            return Ok(());
        };
        let session_token = cursor.session_token.clone();
        let delay = self.config.politeness_delay();

        Paginator::new(&self.fetcher, delay)
            .with_max_pages(self.config.crawler.max_pages)
            .run(&mut session, cursor, sink, stats)
            .await?;

        let queue = std::mem::take(&mut session.replies);
        ReplyExpander::new(&self.fetcher, delay)
            .run(&mut session, queue, &session_token, sink, stats)
            .await
    }
}
