//! Error scenario integration tests
//!
//! Tests failure modes and how far they reach:
//! 1. Initial page errors (404, 500)
//! 2. Missing session token
//! 3. Pagination failures mid-crawl
//! 4. Reply thread failures
//! 5. Malformed comment blocks

use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ytcomments::crawler::CommentCrawler;
use ytcomments::error::{CrawlErrorTrait, CrawlerError, ErrorCategory, FetchError};
use ytcomments::storage::MemorySink;

use super::fixtures::{comment, envelope, initial_page, reply_loader, test_config};

// ============================================================================
// Initial Page Errors
// ============================================================================

#[tokio::test]
async fn test_initial_page_404_does_not_stop_the_run() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .and(query_param("v", "missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .and(query_param("v", "abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(initial_page(&comment("c1"), None, true)),
        )
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    let videos = vec!["missing".to_string(), "abc123".to_string()];
    let summary = crawler.run(&videos, &mut sink).await;

    assert_eq!(summary.videos_attempted(), 2);
    assert_eq!(summary.videos_succeeded, 1);
    assert_eq!(summary.videos_failed, 1);
    assert_eq!(summary.failed_videos, vec!["missing"]);
    assert!(sink.ids_for("missing").is_empty());
    assert_eq!(sink.ids_for("abc123"), vec!["c1"]);
    // Output is finalized for the failed video as well
    assert_eq!(sink.finished, vec!["missing", "abc123"]);
}

#[tokio::test]
async fn test_initial_page_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 5)).unwrap();
    let mut sink = MemorySink::new();
    let result = crawler.crawl_video("abc123", &mut sink).await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("abc123"));
    assert!(matches!(
        err,
        CrawlerError::InitialPage {
            source: FetchError::ServerError(500),
            ..
        }
    ));
    assert_eq!(err.category(), ErrorCategory::Network);
    assert!(err.is_recoverable());
}

// ============================================================================
// Token Errors
// ============================================================================

#[tokio::test]
async fn test_missing_session_token_skips_ajax() {
    let server = MockServer::start().await;
    let body = format!("{}{}", comment("c1"), reply_loader("r1"));

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(initial_page(&body, Some("p1"), false)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, "")))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    let summary = crawler.run(&["abc123".to_string()], &mut sink).await;

    assert_eq!(sink.ids_for("abc123"), vec!["c1"]);
    assert_eq!(summary.videos_succeeded, 1);
}

#[tokio::test]
async fn test_missing_page_token_still_expands_replies() {
    let server = MockServer::start().await;
    let body = format!("{}{}", comment("c1"), reply_loader("r1"));

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(initial_page(&body, None, true)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(query_param("action_load_comments", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, "")))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(query_param("action_load_replies", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, &comment("c2"))))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    crawler.run(&["abc123".to_string()], &mut sink).await;

    assert_eq!(sink.ids_for("abc123"), vec!["c1", "c2"]);
}

// ============================================================================
// Pagination Errors
// ============================================================================

#[tokio::test]
async fn test_pagination_failure_keeps_earlier_records() {
    let server = MockServer::start().await;
    let body = format!("{}{}", comment("c1"), reply_loader("r1"));

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(initial_page(&body, Some("p1"), true)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(query_param("order_menu", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(Some("p2"), &comment("c2"))))
        .expect(1)
        .mount(&server)
        .await;

    // Second page fails on every attempt
    Mock::given(method("POST"))
        .and(body_string_contains("page_token=p2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    // Reply expansion still runs after pagination gives up
    Mock::given(method("POST"))
        .and(query_param("action_load_replies", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, &comment("c3"))))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    let summary = crawler.run(&["abc123".to_string()], &mut sink).await;

    assert_eq!(sink.ids_for("abc123"), vec!["c1", "c2", "c3"]);
    assert_eq!(summary.videos_succeeded, 1);
}

#[tokio::test]
async fn test_undecodable_page_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(initial_page(&comment("c1"), Some("p1"), true)),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login required</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 5)).unwrap();
    let mut sink = MemorySink::new();
    let stats = crawler.crawl_video("abc123", &mut sink).await.unwrap();

    assert_eq!(stats.comments_emitted, 1);
    assert_eq!(stats.pages_failed, 1);
}

// ============================================================================
// Reply Errors
// ============================================================================

#[tokio::test]
async fn test_failed_reply_thread_is_skipped() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}{}",
        comment("c1"),
        reply_loader("r1"),
        comment("c2"),
        reply_loader("r2")
    );

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(initial_page(&body, None, true)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("comment_id=r1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("comment_id=r2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, &comment("c4"))))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    let stats = crawler.crawl_video("abc123", &mut sink).await.unwrap();

    assert_eq!(sink.ids_for("abc123"), vec!["c1", "c2", "c4"]);
    assert_eq!(stats.reply_threads_failed, 1);
    assert_eq!(stats.reply_threads_fetched, 1);
}

#[tokio::test]
async fn test_duplicate_thread_ids_are_requested_once() {
    let server = MockServer::start().await;
    let body = format!(
        "{}{}{}",
        comment("c1"),
        reply_loader("r1"),
        reply_loader("r1")
    );

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(initial_page(&body, None, true)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("comment_id=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, &comment("c2"))))
        .expect(1)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    crawler.crawl_video("abc123", &mut sink).await.unwrap();

    assert_eq!(sink.ids_for("abc123"), vec!["c1", "c2"]);
}

#[tokio::test]
async fn test_reply_ids_inside_replies_are_not_followed() {
    let server = MockServer::start().await;
    let body = format!("{}{}", comment("c1"), reply_loader("r1"));
    let reply_html = format!("{}{}", comment("c2"), reply_loader("r9"));

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(initial_page(&body, None, true)))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("comment_id=r1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, &reply_html)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("comment_id=r9"))
        .respond_with(ResponseTemplate::new(200).set_body_string(envelope(None, "")))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    crawler.crawl_video("abc123", &mut sink).await.unwrap();

    assert_eq!(sink.ids_for("abc123"), vec!["c1", "c2"]);
}

// ============================================================================
// Malformed Content
// ============================================================================

#[tokio::test]
async fn test_malformed_block_is_skipped() {
    let server = MockServer::start().await;
    let broken = r#"<div class="comment-item" data-cid="broken">
        <span class="time">now</span>
        <a class="user-name">Someone</a>
    </div>"#;
    let body = format!("{}{}{}", comment("c1"), broken, comment("c2"));

    Mock::given(method("GET"))
        .and(path("/all_comments"))
        .respond_with(ResponseTemplate::new(200).set_body_string(initial_page(&body, None, true)))
        .mount(&server)
        .await;

    let crawler = CommentCrawler::new(test_config(&server, 3)).unwrap();
    let mut sink = MemorySink::new();
    let stats = crawler.crawl_video("abc123", &mut sink).await.unwrap();

    assert_eq!(sink.ids_for("abc123"), vec!["c1", "c2"]);
    assert_eq!(stats.comments_emitted, 2);
}
