//! Marker-based token scanning for the initial comments page
//!
//! The page does not expose its continuation cursor or XSRF token as clean
//! attributes, so both are located by scanning for a fixed marker and
//! reading up to the next double quote.

/// Marker preceding the first continuation cursor (`data-token="..."`)
pub const PAGE_TOKEN_MARKER: &str = "data-token";

/// Characters between the cursor marker and its value (`="`)
pub const PAGE_TOKEN_OFFSET: usize = 2;

/// Marker preceding the session token (`'XSRF_TOKEN': "..."`)
pub const SESSION_TOKEN_MARKER: &str = "XSRF_TOKEN";

/// Characters between the session marker and its value (`': "`)
pub const SESSION_TOKEN_OFFSET: usize = 4;

/// Extract the value following `marker` in `text`
///
/// The value starts `offset` characters after the end of the first
/// occurrence of `marker` and runs up to (not including) the next `"`.
/// Returns `None` when the marker or the closing quote is missing, when
/// the offset runs past the end of the text, or when the value is empty.
///
/// # Example
/// ```
/// use ytcomments::crawler::token::extract_token;
///
/// let html = r#"<div data-token="EhYSC2FiYzEyMw" class="x">"#;
/// assert_eq!(extract_token(html, "data-token", 2).as_deref(), Some("EhYSC2FiYzEyMw"));
/// assert_eq!(extract_token(html, "XSRF_TOKEN", 4), None);
/// ```
pub fn extract_token(text: &str, marker: &str, offset: usize) -> Option<String> {
    let marker_end = text.find(marker)? + marker.len();

    let start = text[marker_end..]
        .char_indices()
        .nth(offset)
        .map(|(i, _)| marker_end + i)?;

    let rest = &text[start..];
    let end = rest.find('"')?;

    let value = &rest[..end];
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Tokens needed to start paginating a video's comments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitialTokens {
    pub page_token: Option<String>,
    pub session_token: Option<String>,
}

impl InitialTokens {
    /// Scan the initial page for both tokens
    pub fn extract(html: &str) -> Self {
        Self {
            page_token: extract_token(html, PAGE_TOKEN_MARKER, PAGE_TOKEN_OFFSET),
            session_token: extract_token(html, SESSION_TOKEN_MARKER, SESSION_TOKEN_OFFSET),
        }
    }
}
