//! Comment text canonicalization.
//!
//! Steps, in order: strip URLs, strip mentions and hashtags, strip digit runs,
//! strip punctuation, collapse whitespace and trim, lowercase. Text that
//! cleans to nothing maps to a sentinel, so `clean_text` is never empty.
//!
//! Every step only removes characters, and nothing the later steps leave
//! behind can match an earlier step again, so [`normalize`] is idempotent.
//! Both sentinels are plain lowercase letters and are fixed points.

use std::sync::LazyLock;

use regex::Regex;
use ysent_models::{NormalizedComment, RawComment};

/// Sentinel for a comment whose text field was absent.
pub const MISSING_TEXT: &str = "textovazio";

/// Sentinel for a comment with nothing left after cleaning.
pub const EMPTY_AFTER_CLEANING: &str = "textolimpovazio";

/// Whether `token` is one of the normalizer sentinels.
pub fn is_sentinel(token: &str) -> bool {
    token == MISSING_TEXT || token == EMPTY_AFTER_CLEANING
}

static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:[a-z][a-z0-9+.\-]*://|www\.)\S*").unwrap());
static MENTION_OR_HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@#]\w+").unwrap());
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[[:punct:]\p{P}]").unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Canonicalize raw comment text. Total and idempotent.
pub fn normalize(raw_text: Option<&str>) -> String {
    let Some(text) = raw_text else {
        return MISSING_TEXT.to_string();
    };

    let text = URL.replace_all(text, "");
    let text = MENTION_OR_HASHTAG.replace_all(&text, "");
    let text = DIGITS.replace_all(&text, "");
    let text = PUNCTUATION.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = text.trim();

    if text.is_empty() {
        EMPTY_AFTER_CLEANING.to_string()
    } else {
        text.to_lowercase()
    }
}

/// Attach `clean_text` to each comment.
pub fn normalize_all(comments: Vec<RawComment>) -> Vec<NormalizedComment> {
    comments
        .into_iter()
        .map(|raw| {
            let clean_text = normalize(raw.raw_text.as_deref());
            NormalizedComment { raw, clean_text }
        })
        .collect()
}
