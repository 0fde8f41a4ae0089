//! Client for the rating-model inference service.
//!
//! The service wraps a pretrained multilingual review-rating model. It takes a
//! batch of texts and answers with one `"<n> stars"` label per input, in input
//! order.

pub mod client;
pub mod error;
pub mod types;

pub use client::{MlClient, MlClientConfig};
pub use error::{MlError, MlResult};
pub use types::{HealthResponse, Rating, RateRequest, RateResponse};
