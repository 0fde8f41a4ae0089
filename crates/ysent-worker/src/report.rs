//! Run report handed to the presentation layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ysent_analysis::{ClassifierSlot, VideoSummary};
use ysent_models::{AnalysisMode, ClassifiedComment, FrequencyTable, SentimentSummary};
use ysent_youtube::{HarvestEnd, HarvestReport, ResolvedTarget, Selection};

/// Availability of one classifier for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifierStatus {
    pub name: String,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl From<&ClassifierSlot> for ClassifierStatus {
    fn from(slot: &ClassifierSlot) -> Self {
        match slot {
            ClassifierSlot::Available(c) => Self {
                name: c.name().to_string(),
                available: true,
                cause: None,
            },
            ClassifierSlot::Unavailable { name, cause } => Self {
                name: name.clone(),
                available: false,
                cause: Some(cause.clone()),
            },
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub link: String,
    pub mode: AnalysisMode,
    pub target: ResolvedTarget,

    /// Channel the link resolved to, or the owner of the linked video
    pub channel_id: String,

    pub selection: Selection,
    pub harvests: Vec<HarvestReport>,
    pub classifiers: Vec<ClassifierStatus>,

    pub summary: SentimentSummary,
    pub per_video: Vec<VideoSummary>,
    pub top_tokens: FrequencyTable,

    /// Frequent tokens of comments the insights classifier labelled negative
    pub negative_tokens: FrequencyTable,
    pub top_positive: Vec<ClassifiedComment>,
    pub top_negative: Vec<ClassifiedComment>,

    pub comments: Vec<ClassifiedComment>,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Whether any harvest stopped early or the ranking fell back to recency.
    pub fn is_partial(&self) -> bool {
        self.selection.degraded
            || self
                .harvests
                .iter()
                .any(|h| matches!(h.end, HarvestEnd::Failed(_) | HarvestEnd::Cancelled))
    }
}
