//! The generation-service seam.
//!
//! The pipeline sees the service only through [`GenerationClient`]: one
//! prompt in, raw text out, failing as unavailable or rejected. Clients own
//! no retry logic; the stage executor decides what to do with a failure.

#[cfg(feature = "ollama")]
mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::OllamaClient;

pub use crate::errors::GenerationError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to generate with.
    pub model: String,
    /// The fully rendered prompt.
    pub prompt: String,
    /// Maximum output tokens.
    pub max_tokens: u32,
}

impl GenerationRequest {
    /// Creates a new generation request.
    #[must_use]
    pub fn new(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            max_tokens,
        }
    }
}

/// Sends prompts to a text-generation service.
#[async_trait]
pub trait GenerationClient: Send + Sync + std::fmt::Debug {
    /// Generates raw text for the request.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Unavailable`] when the service cannot be
    /// reached or times out, and [`GenerationError::Rejected`] when the
    /// service answers with an error.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GenerationError>;
}
