//! Comment records at each pipeline stage.
//!
//! Each stage extends the previous record instead of rewriting it, so a
//! [`ClassifiedComment`] can always be traced back to its [`RawComment`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::sentiment::SentimentLabel;

/// One top-level comment as harvested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawComment {
    /// Video the comment belongs to
    pub video_id: String,

    /// Author display name
    #[serde(default)]
    pub author: String,

    /// Comment text; `None` when the platform omitted the field
    #[serde(default)]
    pub raw_text: Option<String>,

    /// Like count
    #[serde(default)]
    pub like_count: u64,

    /// Publication timestamp; `None` when missing or unparseable
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl RawComment {
    /// Create a comment with the given text.
    pub fn new(video_id: impl Into<String>, author: impl Into<String>, raw_text: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            author: author.into(),
            raw_text: Some(raw_text.into()),
            like_count: 0,
            published_at: None,
        }
    }

    /// Set like count.
    pub fn with_like_count(mut self, like_count: u64) -> Self {
        self.like_count = like_count;
        self
    }

    /// Set publication timestamp.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }
}

/// A raw comment plus its canonical text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedComment {
    #[serde(flatten)]
    pub raw: RawComment,

    /// Cleaned text; never empty, see the normalizer sentinels
    pub clean_text: String,
}

/// Output of one classifier for one comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Classifier score; `None` when undefined
    pub score: Option<f64>,

    /// Derived label
    pub label: SentimentLabel,

    /// Raw label reported by the classifier, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,
}

impl Classification {
    /// A defined classification.
    pub fn new(score: f64, label: SentimentLabel) -> Self {
        Self {
            score: Some(score),
            label,
            raw_label: None,
        }
    }

    /// The classification emitted when a classifier is unavailable or the
    /// score is undefined.
    pub fn undefined() -> Self {
        Self {
            score: None,
            label: SentimentLabel::Indefinido,
            raw_label: None,
        }
    }

    /// Attach the classifier's raw label.
    pub fn with_raw_label(mut self, raw_label: impl Into<String>) -> Self {
        self.raw_label = Some(raw_label.into());
        self
    }
}

/// A normalized comment plus one classification per classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedComment {
    #[serde(flatten)]
    pub normalized: NormalizedComment,

    /// Classifications keyed by classifier name
    pub sentiments: BTreeMap<String, Classification>,
}

impl ClassifiedComment {
    /// Label assigned by `classifier`, `Indefinido` when absent.
    pub fn label(&self, classifier: &str) -> SentimentLabel {
        self.sentiments
            .get(classifier)
            .map(|c| c.label)
            .unwrap_or(SentimentLabel::Indefinido)
    }

    /// Score assigned by `classifier`.
    pub fn score(&self, classifier: &str) -> Option<f64> {
        self.sentiments.get(classifier).and_then(|c| c.score)
    }

    /// The originating raw comment.
    pub fn raw(&self) -> &RawComment {
        &self.normalized.raw
    }

    pub fn clean_text(&self) -> &str {
        &self.normalized.clean_text
    }

    pub fn video_id(&self) -> &str {
        &self.normalized.raw.video_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classified() -> ClassifiedComment {
        let raw = RawComment::new("dQw4w9WgXcQ", "ana", "Muito bom!").with_like_count(3);
        let mut sentiments = BTreeMap::new();
        sentiments.insert("lexicon".to_string(), Classification::new(0.6, SentimentLabel::Positivo));
        ClassifiedComment {
            normalized: NormalizedComment {
                raw,
                clean_text: "muito bom".to_string(),
            },
            sentiments,
        }
    }

    #[test]
    fn test_label_lookup_defaults_to_indefinido() {
        let comment = classified();
        assert_eq!(comment.label("lexicon"), SentimentLabel::Positivo);
        assert_eq!(comment.label("model"), SentimentLabel::Indefinido);
        assert_eq!(comment.score("model"), None);
    }

    #[test]
    fn test_trace_back_to_raw() {
        let comment = classified();
        assert_eq!(comment.raw().raw_text.as_deref(), Some("Muito bom!"));
        assert_eq!(comment.video_id(), "dQw4w9WgXcQ");
        assert_eq!(comment.raw().like_count, 3);
    }

    #[test]
    fn test_flattened_serialization() {
        let json = serde_json::to_value(classified()).unwrap();
        assert_eq!(json["video_id"], "dQw4w9WgXcQ");
        assert_eq!(json["clean_text"], "muito bom");
        assert_eq!(json["sentiments"]["lexicon"]["label"], "positivo");
        assert!(json["sentiments"]["lexicon"].get("raw_label").is_none());
    }
}
