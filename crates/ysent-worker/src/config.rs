//! Worker configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use ysent_analysis::MODEL;
use ysent_ml_client::MlClientConfig;
use ysent_models::{AnalysisMode, SelectionCriterion};
use ysent_youtube::{YoutubeClientConfig, DEFAULT_PAGE_DELAY};

use crate::error::{PipelineError, PipelineResult};

/// Settings of one harvest-and-analyse run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Video, channel, or decide from the link
    pub mode: AnalysisMode,
    /// Ranking of channel videos
    pub criterion: SelectionCriterion,
    /// Videos taken from a channel
    pub max_videos: usize,
    /// Comment cap per video
    pub max_comments_per_video: usize,
    /// Pause between comment page requests
    pub page_delay: Duration,
    /// Videos harvested concurrently
    pub max_parallel_videos: usize,
    /// Rows of each frequency table
    pub top_tokens: usize,
    /// Rows of each most-liked comments table
    pub top_comments: usize,
    /// Classifier whose labels drive the negative-token and most-liked tables
    pub insights_classifier: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Auto,
            criterion: SelectionCriterion::Recent,
            max_videos: 5,
            max_comments_per_video: 200,
            page_delay: DEFAULT_PAGE_DELAY,
            max_parallel_videos: 1,
            top_tokens: 20,
            top_comments: 5,
            insights_classifier: MODEL.to_string(),
        }
    }
}

impl RunOptions {
    /// Create options from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            mode: parse_enum("ANALYSIS_MODE", defaults.mode)?,
            criterion: parse_enum("SELECTION_CRITERION", defaults.criterion)?,
            max_videos: std::env::var("MAX_VIDEOS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_videos),
            max_comments_per_video: std::env::var("MAX_COMMENTS_PER_VIDEO")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_comments_per_video),
            page_delay: std::env::var("HARVEST_PAGE_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.page_delay),
            max_parallel_videos: std::env::var("HARVEST_MAX_PARALLEL_VIDEOS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_parallel_videos),
            top_tokens: std::env::var("TOP_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.top_tokens),
            top_comments: std::env::var("TOP_COMMENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.top_comments),
            insights_classifier: std::env::var("INSIGHTS_CLASSIFIER")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.insights_classifier),
        })
    }
}

/// Enum setting; unset falls back to `default`, unknown values are errors.
fn parse_enum<T>(var: &str, default: T) -> PipelineResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|e| PipelineError::config(format!("{var}: {e}"))),
        _ => Ok(default),
    }
}

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Data API client settings
    pub youtube: YoutubeClientConfig,
    /// Rating-model service, `None` when not configured
    pub ml: Option<MlClientConfig>,
    /// Lexicon classifier switch
    pub lexicon_enabled: bool,
    /// VADER-format lexicon replacing the built-in one
    pub lexicon_path: Option<PathBuf>,
    /// Run settings
    pub run: RunOptions,
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        Ok(Self {
            youtube: YoutubeClientConfig::from_env()?,
            ml: MlClientConfig::from_env(),
            lexicon_enabled: std::env::var("LEXICON_ENABLED")
                .ok()
                .and_then(|s| parse_flag(&s))
                .unwrap_or(true),
            lexicon_path: std::env::var("LEXICON_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            run: RunOptions::from_env()?,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
