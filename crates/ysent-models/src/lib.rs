//! Shared data models for the comment sentiment pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Link references parsed from user input
//! - Video descriptors and selection settings
//! - Comment records at each pipeline stage
//! - Sentiment labels, summaries and frequency tables

pub mod comment;
pub mod link;
pub mod sentiment;
pub mod video;

// Re-export common types
pub use comment::{Classification, ClassifiedComment, NormalizedComment, RawComment};
pub use link::{is_channel_id, parse_link, LinkError, LinkRef};
pub use sentiment::{ClassifierSummary, FrequencyTable, SentimentLabel, SentimentSummary, TokenFrequency};
pub use video::{AnalysisMode, SelectionCriterion, VideoDescriptor};
