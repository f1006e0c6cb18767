//! CSS selectors for comment fragments
//!
//! The initial comments page and the AJAX partials share the same block
//! markup, so one selector set covers both.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    static ref COMMENT_ITEM: Selector = parse_selector!(".comment-item");
    static ref COMMENT_TEXT: Selector = parse_selector!(".comment-text-content");
    static ref COMMENT_TIME: Selector = parse_selector!(".time");
    static ref COMMENT_AUTHOR: Selector = parse_selector!(".user-name");
    static ref LIKE_COUNT: Selector = parse_selector!(".like-count");
    static ref DISLIKE_COUNT: Selector = parse_selector!(".dislike-count");

    // "View all N replies" control under a top-level block
    static ref REPLY_LOADER: Selector = parse_selector!(".comment-replies-header > .load-comments");
}

/// Attribute carrying comment and reply-thread ids
pub const ID_ATTRIBUTE: &str = "data-cid";

/// Selectors for one comment block and its sub-elements
pub struct CommentSelectors {
    pub item: &'static Selector,
    pub text: &'static Selector,
    pub time: &'static Selector,
    pub author: &'static Selector,
    pub like_count: &'static Selector,
    pub dislike_count: &'static Selector,
    pub reply_loader: &'static Selector,
}

impl CommentSelectors {
    pub fn new() -> Self {
        Self {
            item: &COMMENT_ITEM,
            text: &COMMENT_TEXT,
            time: &COMMENT_TIME,
            author: &COMMENT_AUTHOR,
            like_count: &LIKE_COUNT,
            dislike_count: &DISLIKE_COUNT,
            reply_loader: &REPLY_LOADER,
        }
    }
}

impl Default for CommentSelectors {
    fn default() -> Self {
        Self::new()
    }
}
