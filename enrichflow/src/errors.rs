//! Error types for the enrichflow pipeline.
//!
//! The taxonomy separates failures by where they originate: chain
//! construction, record field merging, the generation service, and
//! response parsing. Stage-level failures always name their stage and
//! carry enough classification for the executor's retry decisions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The top-level error type for enrichflow operations.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// Chain construction or validation failed.
    #[error("{0}")]
    Validation(#[from] ChainValidationError),

    /// A field was written twice on the same record.
    #[error("{0}")]
    FieldConflict(#[from] FieldConflictError),

    /// A stage failed while executing.
    #[error("{0}")]
    Stage(#[from] StageError),

    /// The generation service failed outside of stage execution.
    #[error("{0}")]
    Generation(#[from] GenerationError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for EnrichError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Error raised by the generation client.
///
/// The client reports only two conditions; all retry policy lives in the
/// stage executor, never in the client itself.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    /// The service could not be reached or did not answer in time.
    #[error("Generation service unavailable: {reason}")]
    Unavailable {
        /// What went wrong at the transport level.
        reason: String,
    },

    /// The service answered but refused the request.
    #[error("Generation request rejected: {reason}")]
    Rejected {
        /// HTTP status or protocol code, when one exists.
        status: Option<u16>,
        /// What the service objected to.
        reason: String,
    },
}

impl GenerationError {
    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a rejected error without a protocol code.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            status: None,
            reason: reason.into(),
        }
    }

    /// Creates a rejected error carrying an HTTP status code.
    #[must_use]
    pub fn rejected_with_status(status: u16, reason: impl Into<String>) -> Self {
        Self::Rejected {
            status: Some(status),
            reason: reason.into(),
        }
    }

    /// Whether the executor may retry this failure with backoff.
    ///
    /// Only unavailability is retryable; a rejection will not change on
    /// resubmission.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Classification of a malformed generation response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MalformedKind {
    /// The response was empty or whitespace.
    EmptyResponse,
    /// A field the schema requires was absent.
    MissingField,
    /// A label fell outside the stage's closed vocabulary.
    VocabularyMismatch,
    /// A phrase list had too few or too many entries.
    CountOutOfBounds,
    /// A phrase exceeded the per-phrase word bound.
    PhraseTooLong,
    /// A translation contained no character of the target script.
    MissingScript,
}

impl MalformedKind {
    /// Stable snake_case label used in reports and events.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EmptyResponse => "empty_response",
            Self::MissingField => "missing_field",
            Self::VocabularyMismatch => "vocabulary_mismatch",
            Self::CountOutOfBounds => "count_out_of_bounds",
            Self::PhraseTooLong => "phrase_too_long",
            Self::MissingScript => "missing_script",
        }
    }
}

/// Error raised when a generation response does not fit its stage schema.
///
/// Always carries the raw text that failed to parse so callers can diagnose
/// the generation, not just the parse.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{} ({detail})", kind.label())]
pub struct MalformedResponse {
    /// What structural rule was violated.
    pub kind: MalformedKind,
    /// Human-readable description of the violation.
    pub detail: String,
    /// The raw response text as received from the client.
    pub raw: String,
}

impl MalformedResponse {
    /// Creates a malformed-response error.
    #[must_use]
    pub fn new(kind: MalformedKind, detail: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
            raw: raw.into(),
        }
    }

    /// The response was empty or whitespace-only.
    #[must_use]
    pub fn empty(raw: impl Into<String>) -> Self {
        Self::new(MalformedKind::EmptyResponse, "response was empty", raw)
    }

    /// A required field could not be found in the response.
    #[must_use]
    pub fn missing_field(field: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(
            MalformedKind::MissingField,
            format!("field '{}' not found in response", field.into()),
            raw,
        )
    }

    /// A label was not a member of the allowed vocabulary.
    #[must_use]
    pub fn vocabulary_mismatch(label: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(
            MalformedKind::VocabularyMismatch,
            format!("label '{}' is not in the allowed vocabulary", label.into()),
            raw,
        )
    }

    /// A phrase list fell outside its allowed count bounds.
    #[must_use]
    pub fn count_out_of_bounds(
        got: usize,
        min: usize,
        max: usize,
        raw: impl Into<String>,
    ) -> Self {
        Self::new(
            MalformedKind::CountOutOfBounds,
            format!("expected between {min} and {max} phrases, got {got}"),
            raw,
        )
    }

    /// A phrase exceeded the per-phrase word bound.
    #[must_use]
    pub fn phrase_too_long(phrase: impl Into<String>, max_words: usize, raw: impl Into<String>) -> Self {
        Self::new(
            MalformedKind::PhraseTooLong,
            format!("phrase '{}' exceeds {max_words} words", phrase.into()),
            raw,
        )
    }

    /// A translation contained no character of the target script.
    #[must_use]
    pub fn missing_script(script: impl Into<String>, raw: impl Into<String>) -> Self {
        Self::new(
            MalformedKind::MissingScript,
            format!("no {} characters found in translation", script.into()),
            raw,
        )
    }
}

/// Error raised while executing a single stage against a single record.
#[derive(Debug, Clone, Error)]
pub enum StageError {
    /// A required input field was missing or empty before the stage ran.
    ///
    /// The generation client is never invoked for this failure.
    #[error("Unmet dependency for stage '{stage}': field '{field}' is missing or empty")]
    UnmetDependency {
        /// The stage whose dependency check failed.
        stage: String,
        /// The missing or empty field.
        field: String,
    },

    /// The generation client failed after the executor's retry budget.
    #[error("Generation failed for stage '{stage}': {source}")]
    Generation {
        /// The stage whose generation call failed.
        stage: String,
        /// The underlying client error.
        source: GenerationError,
    },

    /// The response could not be parsed, even after the amended retry.
    #[error("Malformed response for stage '{stage}': {source}")]
    Malformed {
        /// The stage whose response failed to parse.
        stage: String,
        /// The classified parse failure, raw text attached.
        source: MalformedResponse,
    },

    /// The caller's deadline expired at a stage boundary.
    #[error("Deadline exceeded before stage '{stage}'")]
    DeadlineExceeded {
        /// The stage that was about to run.
        stage: String,
    },

    /// The stage tried to write a field the record already carries.
    ///
    /// Record fields are write-once, so this surfaces when a stage is
    /// re-run against an already-enriched record.
    #[error("Field conflict in stage '{stage}': {source}")]
    Conflict {
        /// The stage whose merge collided.
        stage: String,
        /// The conflicting field.
        source: FieldConflictError,
    },
}

impl StageError {
    /// Creates an unmet-dependency error.
    #[must_use]
    pub fn unmet_dependency(stage: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnmetDependency {
            stage: stage.into(),
            field: field.into(),
        }
    }

    /// Creates a generation error for a stage.
    #[must_use]
    pub fn generation(stage: impl Into<String>, source: GenerationError) -> Self {
        Self::Generation {
            stage: stage.into(),
            source,
        }
    }

    /// Creates a malformed-response error for a stage.
    #[must_use]
    pub fn malformed(stage: impl Into<String>, source: MalformedResponse) -> Self {
        Self::Malformed {
            stage: stage.into(),
            source,
        }
    }

    /// Creates a deadline-exceeded error for a stage.
    #[must_use]
    pub fn deadline_exceeded(stage: impl Into<String>) -> Self {
        Self::DeadlineExceeded {
            stage: stage.into(),
        }
    }

    /// Creates a field-conflict error for a stage.
    #[must_use]
    pub fn conflict(stage: impl Into<String>, source: FieldConflictError) -> Self {
        Self::Conflict {
            stage: stage.into(),
            source,
        }
    }

    /// The stage this error belongs to.
    #[must_use]
    pub fn stage(&self) -> &str {
        match self {
            Self::UnmetDependency { stage, .. }
            | Self::Generation { stage, .. }
            | Self::Malformed { stage, .. }
            | Self::DeadlineExceeded { stage }
            | Self::Conflict { stage, .. } => stage,
        }
    }

    /// Stable snake_case classification used in reports and events.
    #[must_use]
    pub const fn error_type(&self) -> &'static str {
        match self {
            Self::UnmetDependency { .. } => "unmet_dependency",
            Self::Generation {
                source: GenerationError::Unavailable { .. },
                ..
            } => "generation_unavailable",
            Self::Generation {
                source: GenerationError::Rejected { .. },
                ..
            } => "generation_rejected",
            Self::Malformed { .. } => "malformed_response",
            Self::DeadlineExceeded { .. } => "deadline_exceeded",
            Self::Conflict { .. } => "field_conflict",
        }
    }

    /// The raw response text, when the failure preserves one.
    #[must_use]
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::Malformed { source, .. } => Some(&source.raw),
            _ => None,
        }
    }
}

/// Error raised when a field is written twice on the same record.
///
/// Record fields are write-once; a second write is a contract bug in the
/// chain, not a data condition to repair.
#[derive(Debug, Clone, Error)]
#[error("Field conflict: '{field}' already written")]
pub struct FieldConflictError {
    /// The field that already had a value.
    pub field: String,
}

impl FieldConflictError {
    /// Creates a new field conflict error.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

/// Error raised when chain validation fails at build time.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChainValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<String>,
}

impl ChainValidationError {
    /// Creates a new chain validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<String>) -> Self {
        self.stages = stages;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error_retryability() {
        assert!(GenerationError::unavailable("connection refused").is_retryable());
        assert!(!GenerationError::rejected("bad model name").is_retryable());
        assert!(!GenerationError::rejected_with_status(500, "server error").is_retryable());
    }

    #[test]
    fn test_malformed_response_factories() {
        let err = MalformedResponse::vocabulary_mismatch("sports", "sports|confidence:90%");
        assert_eq!(err.kind, MalformedKind::VocabularyMismatch);
        assert!(err.detail.contains("sports"));
        assert_eq!(err.raw, "sports|confidence:90%");

        let err = MalformedResponse::count_out_of_bounds(3, 5, 5, "a, b, c");
        assert_eq!(err.kind, MalformedKind::CountOutOfBounds);
        assert!(err.detail.contains("got 3"));
    }

    #[test]
    fn test_stage_error_classification() {
        let err = StageError::unmet_dependency("item-category", "shopping_subcategory");
        assert_eq!(err.stage(), "item-category");
        assert_eq!(err.error_type(), "unmet_dependency");
        assert!(err.raw_response().is_none());

        let err = StageError::generation(
            "skw",
            GenerationError::unavailable("timed out after 60s"),
        );
        assert_eq!(err.error_type(), "generation_unavailable");

        let err = StageError::malformed("skw", MalformedResponse::empty(""));
        assert_eq!(err.error_type(), "malformed_response");
        assert_eq!(err.raw_response(), Some(""));
    }

    #[test]
    fn test_unmet_dependency_display_names_field() {
        let err = StageError::unmet_dependency("dsw", "item_category");
        let msg = err.to_string();
        assert!(msg.contains("dsw"));
        assert!(msg.contains("item_category"));
    }

    #[test]
    fn test_chain_validation_error_builder() {
        let err = ChainValidationError::new("stage ordering violates required inputs")
            .with_stages(vec!["skw".to_string(), "item-category".to_string()]);
        assert_eq!(err.stages.len(), 2);
        assert!(err.to_string().contains("ordering"));
    }

    #[test]
    fn test_malformed_kind_serde_labels_agree() {
        let json = serde_json::to_string(&MalformedKind::VocabularyMismatch).unwrap();
        assert_eq!(json, "\"vocabulary_mismatch\"");
        assert_eq!(MalformedKind::VocabularyMismatch.label(), "vocabulary_mismatch");
    }
}
