//! Text normalization, sentiment classification and aggregation.
//!
//! - [`normalize`]: deterministic, idempotent comment text cleaning
//! - [`SentimentClassifier`] with lexicon and rating-model implementations,
//!   resolved once at startup into [`ClassifierSlot`]s
//! - [`SentimentEngine`]: runs all slots over a batch
//! - [`summarize`], [`top_tokens`] and friends over the classified batch

pub mod aggregate;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod normalizer;

pub use aggregate::{summarize, summarize_by_video, top_comments, top_tokens, VideoSummary, STOPWORDS};
pub use classifier::{
    label_from_compound, label_from_stars, ClassifierSlot, LexiconClassifier, ModelClassifier, RatingModel,
    SentimentClassifier, LEXICON, MODEL,
};
pub use engine::SentimentEngine;
pub use error::{AnalysisError, AnalysisResult};
pub use lexicon::Lexicon;
pub use normalizer::{is_sentinel, normalize, normalize_all, EMPTY_AFTER_CLEANING, MISSING_TEXT};
