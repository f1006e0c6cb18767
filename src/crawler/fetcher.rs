//! HTTP transport for the comments page and the AJAX endpoint
//!
//! One [`CommentFetcher`] wraps one persistent HTTP session (cookie store,
//! fixed User-Agent) reused for every request of a run:
//! - plain GET for the initial comments page, without retries
//! - form POST to the AJAX endpoint with bounded retries and jittered backoff
//! - decoding of the `{page_token, html_content}` JSON envelope

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE},
    Client, Response,
};
use serde::Deserialize;

use crate::config::Config;
use crate::error::CrawlErrorTrait;
use crate::utils::error::FetchError;
use crate::utils::retry::{with_retry_if, RetryPolicy};

/// Query parameters and form body of one AJAX request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AjaxRequest {
    pub query: Vec<(&'static str, String)>,
    pub form: Vec<(&'static str, String)>,
}

impl AjaxRequest {
    /// Look up a query parameter
    pub fn query_param(&self, key: &str) -> Option<&str> {
        lookup(&self.query, key)
    }

    /// Look up a form field
    pub fn form_field(&self, key: &str) -> Option<&str> {
        lookup(&self.form, key)
    }
}

fn lookup<'a>(pairs: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_str())
}

/// Decoded AJAX response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AjaxPage {
    /// Cursor for the next page; `None` when the thread is exhausted
    pub page_token: Option<String>,

    /// HTML fragment holding the comment blocks
    pub html: String,
}

#[derive(Debug, Deserialize)]
struct AjaxEnvelope {
    #[serde(default)]
    page_token: Option<String>,
    html_content: String,
}

/// Decode the AJAX JSON envelope
pub fn decode_envelope(body: &str) -> Result<AjaxPage, FetchError> {
    let envelope: AjaxEnvelope = serde_json::from_str(body)
        .map_err(|e| FetchError::Decode(format!("invalid AJAX envelope: {e}")))?;

    Ok(AjaxPage {
        page_token: envelope.page_token.filter(|t| !t.is_empty()),
        html: envelope.html_content,
    })
}

/// Persistent HTTP session with retrying AJAX requests
pub struct CommentFetcher {
    /// HTTP client with cookie store, configured timeout and compression
    client: Client,

    /// AJAX continuation endpoint
    ajax_url: String,

    /// Retry budget and backoff window for AJAX requests
    retry: RetryPolicy,
}

impl CommentFetcher {
    /// Create a fetcher from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(&config.crawler.user_agent)
            .default_headers(build_headers())
            .timeout(config.request_timeout())
            .cookie_store(true)
            .gzip(true)
            .build()?;

        Ok(Self {
            client,
            ajax_url: config.crawler.ajax_url.clone(),
            retry: RetryPolicy::from(&config.retry),
        })
    }

    /// Replace the retry policy
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetch the initial comments page (single attempt)
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ServerError` on a non-success status, or
    /// `FetchError::Http`/`FetchError::Timeout` if the request fails
    pub async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!(url = %url, "Fetching comments page");

        let response = self.client.get(url).send().await.map_err(classify)?;
        let response = ensure_success(response)?;

        response.text().await.map_err(classify)
    }

    /// POST to the AJAX endpoint, retrying transient failures
    ///
    /// Non-success statuses and request errors are retried with a randomized
    /// backoff until the retry budget is spent. A body that is not a valid
    /// envelope is returned as `FetchError::Decode` without retrying.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::MaxRetriesExceeded` when the budget runs out
    pub async fn post_ajax(&self, request: &AjaxRequest) -> Result<AjaxPage, FetchError> {
        let result = with_retry_if(
            &self.retry,
            || self.post_once(request),
            FetchError::is_recoverable,
        )
        .await;

        match result {
            Err(e) if e.is_recoverable() => Err(FetchError::MaxRetriesExceeded {
                attempts: self.retry.max_attempts.max(1),
            }),
            other => other,
        }
    }

    async fn post_once(&self, request: &AjaxRequest) -> Result<AjaxPage, FetchError> {
        tracing::debug!(url = %self.ajax_url, query = ?request.query, "Posting AJAX request");

        let response = self
            .client
            .post(&self.ajax_url)
            .query(&request.query)
            .form(&request.form)
            .send()
            .await
            .map_err(classify)?;
        let response = ensure_success(response)?;

        let body = response.text().await.map_err(classify)?;
        decode_envelope(&body)
    }
}

fn ensure_success(response: Response) -> Result<Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(FetchError::ServerError(status.as_u16()))
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(e)
    }
}

/// Browser-like default headers for the session
fn build_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();

    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/json;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.8"),
    );

    headers
}
