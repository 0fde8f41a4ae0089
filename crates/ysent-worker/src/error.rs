//! Pipeline error types.

use thiserror::Error;
use ysent_youtube::{ApiError, ResolutionError};

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Run-level failures. Everything else degrades inside the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("No videos found for {0}")]
    NoVideos(String),

    #[error("No comments found in {videos} selected video(s)")]
    NoComments { videos: usize },

    #[error("Run cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YouTube client error: {0}")]
    Api(#[from] ApiError),
}

impl PipelineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Resolution(_) | PipelineError::Config(_) => 2,
            PipelineError::Api(ApiError::MissingApiKey) => 2,
            PipelineError::NoVideos(_) | PipelineError::NoComments { .. } => 3,
            PipelineError::Cancelled => 130,
            PipelineError::Api(_) => 1,
        }
    }
}
