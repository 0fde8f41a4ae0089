//! Analysis error types.

use std::path::PathBuf;

use thiserror::Error;
use ysent_ml_client::MlError;

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Classifier {name} unavailable: {cause}")]
    ClassifierUnavailable { name: String, cause: String },

    #[error("Failed to read lexicon {path}: {source}")]
    LexiconIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon entry at {path}:{line}: {reason}")]
    LexiconFormat {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Rating model error: {0}")]
    Model(#[from] MlError),
}

impl AnalysisError {
    pub fn unavailable(name: impl Into<String>, cause: impl ToString) -> Self {
        Self::ClassifierUnavailable {
            name: name.into(),
            cause: cause.to_string(),
        }
    }
}
