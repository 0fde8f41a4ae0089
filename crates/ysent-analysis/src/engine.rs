//! Runs every classifier slot over a batch of normalized comments.

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{info, warn};
use ysent_models::{Classification, ClassifiedComment, NormalizedComment};

use crate::classifier::ClassifierSlot;

/// Dual (or n-way) classifier runner.
///
/// An unavailable slot, or an available one whose batch call fails, yields
/// [`Classification::undefined`] for every comment under that name. Other
/// slots are unaffected.
#[derive(Debug, Clone)]
pub struct SentimentEngine {
    slots: Vec<ClassifierSlot>,
}

impl SentimentEngine {
    pub fn new(slots: Vec<ClassifierSlot>) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &[ClassifierSlot] {
        &self.slots
    }

    /// Classifier names in slot order.
    pub fn classifier_names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.name().to_string()).collect()
    }

    /// Classify `comments`. Output order matches input order.
    pub async fn classify(&self, comments: Vec<NormalizedComment>) -> Vec<ClassifiedComment> {
        let texts: Vec<String> = comments.iter().map(|c| c.clean_text.clone()).collect();

        let per_slot = join_all(self.slots.iter().map(|slot| run_slot(slot, &texts))).await;

        comments
            .into_iter()
            .enumerate()
            .map(|(i, normalized)| {
                let sentiments: BTreeMap<String, Classification> = self
                    .slots
                    .iter()
                    .zip(&per_slot)
                    .map(|(slot, results)| {
                        let classification = results
                            .as_ref()
                            .and_then(|r| r.get(i).cloned())
                            .unwrap_or_else(Classification::undefined);
                        (slot.name().to_string(), classification)
                    })
                    .collect();
                ClassifiedComment {
                    normalized,
                    sentiments,
                }
            })
            .collect()
    }
}

/// One slot's results, `None` when the slot produced nothing usable.
async fn run_slot(slot: &ClassifierSlot, texts: &[String]) -> Option<Vec<Classification>> {
    let ClassifierSlot::Available(classifier) = slot else {
        return None;
    };

    match classifier.classify_batch(texts).await {
        Ok(results) => {
            info!(classifier = classifier.name(), count = results.len(), "Classified batch");
            Some(results)
        }
        Err(e) => {
            warn!(
                classifier = classifier.name(),
                error = %e,
                "Classifier failed, marking run as undefined"
            );
            None
        }
    }
}
