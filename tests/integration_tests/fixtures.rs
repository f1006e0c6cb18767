//! Test fixtures for integration tests
//!
//! Builders for the initial comments page, AJAX envelopes and a config
//! pointed at a mock server with near-zero delays.

use wiremock::MockServer;
use ytcomments::config::Config;

/// Session token embedded in every initial page fixture
pub const XSRF: &str = "xsrf-abc";

/// One comment block
pub fn comment_block(cid: &str, likes: Option<u64>, dislikes: Option<u64>) -> String {
    let likes = likes
        .map(|n| format!(r#"<span class="like-count off">{n}</span>"#))
        .unwrap_or_default();
    let dislikes = dislikes
        .map(|n| format!(r#"<span class="dislike-count off">{n}</span>"#))
        .unwrap_or_default();

    format!(
        r#"<div class="comment-item" data-cid="{cid}" data-aid="author-{cid}">
            <div class="comment-header">
                <a href="/channel/{cid}" class="user-name">User {cid}</a>
                <span class="time">
                    <a href="/watch?v=abc123&lc={cid}">2 years ago</a>
                </span>
            </div>
            <div class="comment-text">
                <div class="comment-text-content">Comment body {cid}</div>
            </div>
            <div class="comment-footer">
                <div class="comment-footer-actions">{likes}{dislikes}</div>
            </div>
        </div>"#
    )
}

/// Plain comment block with no vote counts
pub fn comment(cid: &str) -> String {
    comment_block(cid, None, None)
}

/// "View all replies" control for a reply thread
pub fn reply_loader(thread_id: &str) -> String {
    format!(
        r#"<div class="comment-replies-header">
            <div class="load-comments" data-cid="{thread_id}">View all replies</div>
        </div>"#
    )
}

/// Initial comments page; `page_token` adds the "Show more" button
pub fn initial_page(body: &str, page_token: Option<&str>, with_session: bool) -> String {
    let script = if with_session {
        format!(r#"<script>var yt = {{'XSRF_TOKEN': "{XSRF}", 'VISITOR': "v1"}};</script>"#)
    } else {
        String::from("<script>var yt = {};</script>")
    };
    let more = page_token
        .map(|t| {
            format!(r#"<button class="yt-uix-button load-more-button" data-token="{t}">Show more</button>"#)
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>All comments</title>{script}</head>
<body>
<div id="all-comments">{body}</div>
{more}
</body>
</html>"#
    )
}

/// AJAX JSON envelope
pub fn envelope(page_token: Option<&str>, html: &str) -> String {
    serde_json::json!({
        "page_token": page_token,
        "html_content": html,
    })
    .to_string()
}

/// Config aimed at `server` with millisecond sleeps
pub fn test_config(server: &MockServer, max_attempts: u32) -> Config {
    let mut config = Config::default();
    config.crawler.comments_url_template = format!("{}/all_comments?v={{video_id}}", server.uri());
    config.crawler.ajax_url = format!("{}/comment_ajax", server.uri());
    config.crawler.politeness_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config.retry.max_attempts = max_attempts;
    config.retry.min_sleep_ms = 1;
    config.retry.max_sleep_ms = 3;
    config
}
