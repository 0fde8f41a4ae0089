//! Video descriptors and selection settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A video picked for harvesting.
///
/// `video_id` is the join key to [`crate::RawComment::video_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Platform video ID
    pub video_id: String,

    /// Video title
    pub title: String,

    /// Publication timestamp
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// View count, when statistics were fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_count: Option<u64>,

    /// Comment count, when statistics were fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
}

impl VideoDescriptor {
    /// Create a descriptor without statistics.
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            published_at: None,
            view_count: None,
            comment_count: None,
        }
    }

    /// Set publication timestamp.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Set statistics.
    pub fn with_statistics(mut self, view_count: u64, comment_count: u64) -> Self {
        self.view_count = Some(view_count);
        self.comment_count = Some(comment_count);
        self
    }

    /// Whether statistics are attached.
    pub fn has_statistics(&self) -> bool {
        self.view_count.is_some() || self.comment_count.is_some()
    }
}

/// How videos of a channel are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionCriterion {
    /// Newest first, ordered server-side
    #[default]
    Recent,
    /// Highest view count first, ranked locally
    MostViewed,
    /// Highest comment count first, ranked locally
    MostCommented,
}

impl SelectionCriterion {
    pub const ALL: &'static [SelectionCriterion] = &[
        SelectionCriterion::Recent,
        SelectionCriterion::MostViewed,
        SelectionCriterion::MostCommented,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionCriterion::Recent => "recent",
            SelectionCriterion::MostViewed => "most_viewed",
            SelectionCriterion::MostCommented => "most_commented",
        }
    }

    /// Whether ranking needs a statistics fetch.
    pub fn needs_statistics(&self) -> bool {
        !matches!(self, SelectionCriterion::Recent)
    }
}

impl fmt::Display for SelectionCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SelectionCriterion {
    type Err = SelectionCriterionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SelectionCriterion::Recent),
            "most_viewed" => Ok(SelectionCriterion::MostViewed),
            "most_commented" => Ok(SelectionCriterion::MostCommented),
            _ => Err(SelectionCriterionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown selection criterion: {0}")]
pub struct SelectionCriterionParseError(String);

/// Whether a run analyses one video or several videos of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Channel of the link; video links go through their owner
    #[default]
    Auto,
    /// Only the linked video
    Video,
    /// Several videos of the owning channel
    Channel,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::Auto => "auto",
            AnalysisMode::Video => "video",
            AnalysisMode::Channel => "channel",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = AnalysisModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(AnalysisMode::Auto),
            "video" => Ok(AnalysisMode::Video),
            "channel" => Ok(AnalysisMode::Channel),
            _ => Err(AnalysisModeParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown analysis mode: {0}")]
pub struct AnalysisModeParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_criterion_parse() {
        for criterion in SelectionCriterion::ALL {
            assert_eq!(criterion.as_str().parse::<SelectionCriterion>().unwrap(), *criterion);
        }
        assert_eq!("MOST_VIEWED".parse::<SelectionCriterion>().unwrap(), SelectionCriterion::MostViewed);
        assert!("popular".parse::<SelectionCriterion>().is_err());
    }

    #[test]
    fn test_criterion_needs_statistics() {
        assert!(!SelectionCriterion::Recent.needs_statistics());
        assert!(SelectionCriterion::MostViewed.needs_statistics());
        assert!(SelectionCriterion::MostCommented.needs_statistics());
    }

    #[test]
    fn test_analysis_mode_parse() {
        assert_eq!(" Channel ".parse::<AnalysisMode>().unwrap(), AnalysisMode::Channel);
        assert_eq!(AnalysisMode::default(), AnalysisMode::Auto);
        assert!("playlist".parse::<AnalysisMode>().is_err());
    }

    #[test]
    fn test_descriptor_statistics() {
        let video = VideoDescriptor::new("dQw4w9WgXcQ", "title");
        assert!(!video.has_statistics());

        let json = serde_json::to_value(&video).unwrap();
        assert!(json.get("view_count").is_none());

        let video = video.with_statistics(10, 2);
        assert!(video.has_statistics());
        assert_eq!(video.view_count, Some(10));
    }
}
