//! # Model Module
//!
//! Everything between the listening profile and a validated answer from the
//! generative model.
//!
//! - [`prompt`] - Renders the profile and mood into the instruction text
//! - [`gemini`] - Client for the Gemini `generateContent` endpoint
//! - [`sanitizer`] - Extracts the JSON object from raw model text
//! - [`schema`] - Validates that object into a `RecommendationSet`
//!
//! The model call is a single request with no retry. Whatever comes back is
//! untrusted until `schema::parse_recommendations` accepts it.

pub mod gemini;
pub mod prompt;
pub mod sanitizer;
pub mod schema;

use thiserror::Error;

pub use gemini::GeminiClient;

#[derive(Debug, Clone, Error)]
pub enum ModelError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("model API error: {0}")]
    Api(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("the model returned no text")]
    EmptyResponse,
}

/// A text-in, text-out generative model.
#[allow(async_fn_in_trait)]
pub trait Generator {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
