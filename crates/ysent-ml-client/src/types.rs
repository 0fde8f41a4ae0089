//! ML service request/response types.

use serde::{Deserialize, Serialize};

/// Batch rating request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    /// Texts to rate
    pub inputs: Vec<String>,
    /// Truncate inputs longer than the model's window
    #[serde(default = "default_truncation")]
    pub truncation: bool,
}

fn default_truncation() -> bool {
    true
}

impl RateRequest {
    pub fn new(inputs: Vec<String>) -> Self {
        Self {
            inputs,
            truncation: true,
        }
    }
}

/// Top prediction for one input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Model label, e.g. `"4 stars"`
    pub label: String,
    /// Model confidence for the label
    #[serde(default)]
    pub score: f64,
}

impl Rating {
    /// Star count parsed from the label: the first digit run, if in `1..=5`.
    pub fn stars(&self) -> Option<u8> {
        let digits: String = self
            .label
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse::<u8>().ok().filter(|n| (1..=5).contains(n))
    }
}

/// Batch rating response, one prediction per input in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateResponse {
    pub predictions: Vec<Rating>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(label: &str) -> Rating {
        Rating {
            label: label.to_string(),
            score: 0.5,
        }
    }

    #[test]
    fn test_stars_from_label() {
        assert_eq!(rating("1 star").stars(), Some(1));
        assert_eq!(rating("4 stars").stars(), Some(4));
        assert_eq!(rating("LABEL_5").stars(), Some(5));
        assert_eq!(rating("0 stars").stars(), None);
        assert_eq!(rating("12 stars").stars(), None);
        assert_eq!(rating("positive").stars(), None);
        assert_eq!(rating("").stars(), None);
    }

    #[test]
    fn test_request_defaults_truncation() {
        let req: RateRequest = serde_json::from_str(r#"{"inputs":["a"]}"#).unwrap();
        assert!(req.truncation);
        assert_eq!(RateRequest::new(vec![]).inputs.len(), 0);
    }
}
