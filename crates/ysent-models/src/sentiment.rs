//! Sentiment labels and aggregated outputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Three-way sentiment label, plus `Indefinido` for missing results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    Positivo,
    Neutro,
    Negativo,
    /// Classifier unavailable or score undefined
    Indefinido,
}

impl SentimentLabel {
    /// Labels that are always present in a summary.
    pub const DEFINED: &'static [SentimentLabel] = &[
        SentimentLabel::Positivo,
        SentimentLabel::Neutro,
        SentimentLabel::Negativo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positivo => "positivo",
            SentimentLabel::Neutro => "neutro",
            SentimentLabel::Negativo => "negativo",
            SentimentLabel::Indefinido => "indefinido",
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, SentimentLabel::Indefinido)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = SentimentLabelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positivo" => Ok(SentimentLabel::Positivo),
            "neutro" => Ok(SentimentLabel::Neutro),
            "negativo" => Ok(SentimentLabel::Negativo),
            "indefinido" => Ok(SentimentLabel::Indefinido),
            _ => Err(SentimentLabelParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown sentiment label: {0}")]
pub struct SentimentLabelParseError(String);

/// Label distribution for one classifier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassifierSummary {
    /// Count per label; defined labels are always present
    pub counts: BTreeMap<SentimentLabel, usize>,

    /// Percentage of the run total per label
    pub percents: BTreeMap<SentimentLabel, f64>,
}

impl ClassifierSummary {
    pub fn count(&self, label: SentimentLabel) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn percent(&self, label: SentimentLabel) -> f64 {
        self.percents.get(&label).copied().unwrap_or(0.0)
    }
}

/// Aggregated sentiment of a set of comments.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Number of comments summarized
    pub total: usize,

    /// Distribution per classifier name
    pub per_classifier: BTreeMap<String, ClassifierSummary>,
}

impl SentimentSummary {
    pub fn classifier(&self, name: &str) -> Option<&ClassifierSummary> {
        self.per_classifier.get(name)
    }
}

/// One row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFrequency {
    pub token: String,
    pub frequency: usize,
}

/// Tokens by descending frequency, ties in first-seen order.
pub type FrequencyTable = Vec<TokenFrequency>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_roundtrip_names() {
        for label in SentimentLabel::DEFINED {
            assert_eq!(label.as_str().parse::<SentimentLabel>().unwrap(), *label);
        }
        assert!(!SentimentLabel::Indefinido.is_defined());
        assert!("feliz".parse::<SentimentLabel>().is_err());
    }

    #[test]
    fn test_summary_serializes_label_keys() {
        let mut summary = ClassifierSummary::default();
        summary.counts.insert(SentimentLabel::Neutro, 2);
        summary.percents.insert(SentimentLabel::Neutro, 100.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["counts"]["neutro"], 2);
        assert_eq!(summary.count(SentimentLabel::Positivo), 0);
        assert_eq!(summary.percent(SentimentLabel::Neutro), 100.0);
    }
}
