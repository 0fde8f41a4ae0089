//! Sentiment classifiers and their availability slots.
//!
//! Each classifier maps clean text to a score and a label on its own; none
//! sees another's output. Availability is settled once at startup as a
//! [`ClassifierSlot`] and never re-checked per comment.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};
use ysent_ml_client::{MlClient, MlClientConfig, MlResult, Rating};
use ysent_models::{Classification, SentimentLabel};

use crate::error::{AnalysisError, AnalysisResult};
use crate::lexicon::Lexicon;

/// Name of the lexicon classifier in summaries.
pub const LEXICON: &str = "lexicon";

/// Name of the rating-model classifier in summaries.
pub const MODEL: &str = "model";

/// Compound polarity threshold for a non-neutral label.
pub const POLARITY_THRESHOLD: f64 = 0.05;

/// Label for a compound polarity score.
pub fn label_from_compound(score: f64) -> SentimentLabel {
    if score.is_nan() {
        SentimentLabel::Indefinido
    } else if score >= POLARITY_THRESHOLD {
        SentimentLabel::Positivo
    } else if score <= -POLARITY_THRESHOLD {
        SentimentLabel::Negativo
    } else {
        SentimentLabel::Neutro
    }
}

/// Label for a star rating.
pub fn label_from_stars(stars: Option<u8>) -> SentimentLabel {
    match stars {
        Some(1..=2) => SentimentLabel::Negativo,
        Some(3) => SentimentLabel::Neutro,
        Some(4..=5) => SentimentLabel::Positivo,
        _ => SentimentLabel::Indefinido,
    }
}

/// One sentiment classifier.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Key under which results are stored and summarized.
    fn name(&self) -> &str;

    /// Classify every text; the output is aligned with `texts` by position.
    async fn classify_batch(&self, texts: &[String]) -> AnalysisResult<Vec<Classification>>;

    /// Classify a single text.
    async fn classify(&self, text: &str) -> AnalysisResult<Classification> {
        let mut out = self.classify_batch(&[text.to_string()]).await?;
        out.pop()
            .ok_or_else(|| AnalysisError::unavailable(self.name(), "empty result for a single text"))
    }
}

/// A classifier resolved at startup, or the reason it is missing.
#[derive(Clone)]
pub enum ClassifierSlot {
    Available(Arc<dyn SentimentClassifier>),
    Unavailable { name: String, cause: String },
}

impl ClassifierSlot {
    pub fn available(classifier: impl SentimentClassifier + 'static) -> Self {
        Self::Available(Arc::new(classifier))
    }

    /// Unavailable slot; the cause is logged once here.
    pub fn unavailable(name: impl Into<String>, cause: impl ToString) -> Self {
        let name = name.into();
        let cause = cause.to_string();
        warn!(classifier = %name, cause = %cause, "Classifier unavailable");
        Self::Unavailable { name, cause }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Available(c) => c.name(),
            Self::Unavailable { name, .. } => name,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }

    /// Lexicon slot from settings: disabled, built-in, or loaded from a file.
    pub fn lexicon(enabled: bool, path: Option<&Path>) -> Self {
        if !enabled {
            return Self::unavailable(LEXICON, "disabled by configuration");
        }
        match path {
            None => Self::available(LexiconClassifier::new(Lexicon::builtin())),
            Some(path) => match LexiconClassifier::from_vader_file(path) {
                Ok(classifier) => Self::available(classifier),
                Err(e) => Self::unavailable(LEXICON, e),
            },
        }
    }

    /// Model slot: needs a configured and healthy rating service.
    pub async fn model(config: Option<MlClientConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable(MODEL, "ML_SERVICE_URL not configured");
        };

        let client = match MlClient::new(config) {
            Ok(client) => client,
            Err(e) => return Self::unavailable(MODEL, e),
        };

        match client.health_check().await {
            Ok(true) => {
                info!(url = client.base_url(), "Rating model service available");
                Self::available(ModelClassifier::new(Arc::new(client)))
            }
            Ok(false) => Self::unavailable(
                MODEL,
                format!("health check failed at {}", client.base_url()),
            ),
            Err(e) => Self::unavailable(MODEL, e),
        }
    }
}

impl std::fmt::Debug for ClassifierSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(c) => f.debug_tuple("Available").field(&c.name()).finish(),
            Self::Unavailable { name, cause } => f
                .debug_struct("Unavailable")
                .field("name", name)
                .field("cause", cause)
                .finish(),
        }
    }
}

/// Lexicon-based polarity classifier.
#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier {
    lexicon: Lexicon,
}

impl LexiconClassifier {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn from_vader_file(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        Ok(Self::new(Lexicon::from_vader_file(path)?))
    }

    pub fn score(&self, text: &str) -> Classification {
        let score = self.lexicon.compound(text);
        Classification::new(score, label_from_compound(score))
    }
}

#[async_trait]
impl SentimentClassifier for LexiconClassifier {
    fn name(&self) -> &str {
        LEXICON
    }

    async fn classify_batch(&self, texts: &[String]) -> AnalysisResult<Vec<Classification>> {
        Ok(texts.iter().map(|t| self.score(t)).collect())
    }
}

/// Batch star-rating backend.
#[async_trait]
pub trait RatingModel: Send + Sync {
    /// One rating per input, in input order.
    async fn rate(&self, texts: &[String]) -> MlResult<Vec<Rating>>;
}

#[async_trait]
impl RatingModel for MlClient {
    async fn rate(&self, texts: &[String]) -> MlResult<Vec<Rating>> {
        self.rate_batch(texts).await
    }
}

/// Classifier backed by a star-rating model. All texts go out in one call.
pub struct ModelClassifier {
    model: Arc<dyn RatingModel>,
}

impl ModelClassifier {
    pub fn new(model: Arc<dyn RatingModel>) -> Self {
        Self { model }
    }
}

fn classify_rating(rating: &Rating) -> Classification {
    let stars = rating.stars();
    let classification = match stars {
        Some(n) => Classification::new(f64::from(n), label_from_stars(stars)),
        None => Classification::undefined(),
    };
    classification.with_raw_label(rating.label.clone())
}

#[async_trait]
impl SentimentClassifier for ModelClassifier {
    fn name(&self) -> &str {
        MODEL
    }

    async fn classify_batch(&self, texts: &[String]) -> AnalysisResult<Vec<Classification>> {
        let ratings = self.model.rate(texts).await?;
        if ratings.len() != texts.len() {
            return Err(AnalysisError::unavailable(
                MODEL,
                format!("{} ratings for {} texts", ratings.len(), texts.len()),
            ));
        }
        Ok(ratings.iter().map(classify_rating).collect())
    }
}
