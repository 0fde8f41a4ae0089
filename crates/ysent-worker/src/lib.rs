//! Comment harvest and sentiment analysis runner.
//!
//! Wires the YouTube boundary, the classifiers and the aggregation into one
//! [`Pipeline`] configured from the environment.

pub mod config;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;

pub use config::{RunOptions, WorkerConfig};
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use pipeline::{Pipeline, SINGLE_VIDEO_TITLE};
pub use report::{ClassifierStatus, RunReport};
