//! Structured run logging.
//!
//! Every lifecycle event of a run carries the run ID and the pipeline stage
//! it belongs to.

use tracing::{error, info, warn, Span};

/// Pipeline stages as they appear in logs.
pub mod stage {
    pub const RESOLVE: &str = "resolve";
    pub const SELECT: &str = "select";
    pub const HARVEST: &str = "harvest";
    pub const CLASSIFY: &str = "classify";
    pub const AGGREGATE: &str = "aggregate";
}

/// Run logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    link: String,
}

impl RunLogger {
    /// Create a logger for a run over `link`.
    pub fn new(run_id: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            link: link.into(),
        }
    }

    pub fn log_start(&self) {
        info!(run_id = %self.run_id, link = %self.link, "Run started");
    }

    pub fn log_progress(&self, stage: &str, message: &str) {
        info!(run_id = %self.run_id, stage, "{}", message);
    }

    pub fn log_warning(&self, stage: &str, message: &str) {
        warn!(run_id = %self.run_id, stage, "{}", message);
    }

    pub fn log_error(&self, stage: &str, message: &str) {
        error!(run_id = %self.run_id, stage, "Run failed: {}", message);
    }

    pub fn log_completion(&self, comments: usize, videos: usize) {
        info!(run_id = %self.run_id, comments, videos, "Run completed");
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Span covering the whole run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!("run", run_id = %self.run_id, link = %self.link)
    }
}
