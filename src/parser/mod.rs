//! HTML parsing and comment extraction
//!
//! This module turns an HTML fragment (the initial comments page or an
//! AJAX partial) into [`CommentRecord`]s and reply-thread ids.

pub mod selectors;

pub use selectors::CommentSelectors;

use scraper::{ElementRef, Html};

use crate::models::CommentRecord;
use crate::utils::error::ParseError;
use selectors::ID_ATTRIBUTE;

/// A parsed HTML fragment holding zero or more comment blocks
///
/// Extraction is lazy: [`comments`](Self::comments) and
/// [`reply_thread_ids`](Self::reply_thread_ids) walk the parsed tree on
/// demand, and can be called any number of times with the same result.
pub struct CommentFragment {
    document: Html,
    selectors: CommentSelectors,
}

impl CommentFragment {
    /// Parse raw markup
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
            selectors: CommentSelectors::new(),
        }
    }

    /// Lazily yield every well-formed comment block in document order
    ///
    /// Blocks missing a required element are logged and skipped.
    pub fn comments(&self) -> impl Iterator<Item = CommentRecord> + '_ {
        self.document
            .select(self.selectors.item)
            .filter_map(move |block| match parse_block(block, &self.selectors) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed comment block");
                    None
                }
            })
    }

    /// Lazily yield the ids of "load more replies" controls
    pub fn reply_thread_ids(&self) -> impl Iterator<Item = String> + '_ {
        self.document
            .select(self.selectors.reply_loader)
            .filter_map(|el| el.value().attr(ID_ATTRIBUTE))
            .map(str::to_string)
    }

    /// Number of comment blocks, well-formed or not
    pub fn block_count(&self) -> usize {
        self.document.select(self.selectors.item).count()
    }
}

/// Extract one comment block
///
/// Text, timestamp and author are required. Vote counts follow a four-way
/// policy checked in this order:
///
/// 1. both counts present: both literal
/// 2. neither present: both 0
/// 3. only dislikes present: likes 0
/// 4. only likes present: dislikes 0
///
/// An element counts as present when the selector matches it, even if it
/// is empty.
pub fn parse_block(
    block: ElementRef<'_>,
    selectors: &CommentSelectors,
) -> Result<CommentRecord, ParseError> {
    let id = block
        .value()
        .attr(ID_ATTRIBUTE)
        .ok_or(ParseError::MissingId)?
        .to_string();

    let required = |selector: &scraper::Selector, element: &'static str| {
        block
            .select(selector)
            .next()
            .map(text_content)
            .ok_or_else(|| ParseError::MissingElement {
                element,
                block: id.clone(),
            })
    };

    let text = required(selectors.text, "comment-text-content")?;
    let timestamp_label = required(selectors.time, "time")?.trim().to_string();
    let author = required(selectors.author, "user-name")?;

    let likes = block.select(selectors.like_count).next();
    let dislikes = block.select(selectors.dislike_count).next();

    let (like_count, dislike_count) = match (likes, dislikes) {
        (Some(like), Some(dislike)) => (parse_count(like), parse_count(dislike)),
        (None, None) => (0, 0),
        (None, Some(dislike)) => (0, parse_count(dislike)),
        (Some(like), None) => (parse_count(like), 0),
    };

    Ok(CommentRecord {
        id,
        text,
        timestamp_label,
        author,
        like_count,
        dislike_count,
    })
}

fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Read a vote-count literal; empty or unreadable literals count as 0
fn parse_count(element: ElementRef<'_>) -> u64 {
    let literal: String = element
        .text()
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();

    if literal.is_empty() {
        return 0;
    }

    literal.parse().unwrap_or_else(|_| {
        tracing::debug!(literal = %literal, "Unreadable vote count, using 0");
        0
    })
}
