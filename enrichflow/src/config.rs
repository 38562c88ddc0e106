//! Configuration for the generation service and the orchestrator.
//!
//! Endpoint and model names are explicit values threaded at construction
//! time. There is no process-wide model state.

use crate::retry::RetryConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the text-generation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Generate endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model used for classification and keyword stages.
    #[serde(default = "default_primary_model")]
    pub primary_model: String,
    /// Model used for the translation stage.
    #[serde(default = "default_translation_model")]
    pub translation_model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
    /// Default max output tokens when a stage does not set its own.
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:11434/api/generate".to_string()
}

fn default_primary_model() -> String {
    "phi4:latest".to_string()
}

fn default_translation_model() -> String {
    "aya:8b".to_string()
}

fn default_timeout() -> f64 {
    60.0
}

fn default_max_tokens() -> u32 {
    200
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            primary_model: default_primary_model(),
            translation_model: default_translation_model(),
            timeout_seconds: default_timeout(),
            default_max_tokens: default_max_tokens(),
        }
    }
}

impl GenerationConfig {
    /// Creates a new generation configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint URL.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the primary model name.
    #[must_use]
    pub fn with_primary_model(mut self, model: impl Into<String>) -> Self {
        self.primary_model = model.into();
        self
    }

    /// Sets the translation model name.
    #[must_use]
    pub fn with_translation_model(mut self, model: impl Into<String>) -> Self {
        self.translation_model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Gets the timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_seconds)
    }
}

/// Configuration for pipeline runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Maximum records enriched concurrently in batch mode.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Overall per-record deadline in milliseconds, checked at stage
    /// boundaries. `None` means no deadline.
    #[serde(default)]
    pub deadline_ms: Option<u64>,
    /// Retry configuration for transient generation failures.
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_max_concurrency() -> usize {
    5
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            deadline_ms: None,
            retry: RetryConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates a new orchestrator configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the batch concurrency bound.
    #[must_use]
    pub fn with_max_concurrency(mut self, workers: usize) -> Self {
        self.max_concurrency = workers.max(1);
        self
    }

    /// Sets the per-record deadline.
    #[must_use]
    pub fn with_deadline_ms(mut self, deadline_ms: u64) -> Self {
        self.deadline_ms = Some(deadline_ms);
        self
    }

    /// Sets the retry configuration.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// The deadline as a Duration, when configured.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }
}
