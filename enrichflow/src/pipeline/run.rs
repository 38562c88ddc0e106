//! Run results: per-stage outcomes rolled up per record and per batch.

use crate::contract::StageName;
use crate::errors::StageError;
use crate::executor::{StagePhase, StageReport};
use crate::parser::ParseWarning;
use crate::record::{Record, RecordKey};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Serializable view of one stage's execution for one record.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    /// The stage that ran.
    pub stage: StageName,
    /// The terminal phase.
    pub phase: StagePhase,
    /// Fields merged into the record.
    pub merged_fields: Vec<String>,
    /// Irregularities tolerated while parsing.
    pub warnings: Vec<ParseWarning>,
    /// Generation client invocations.
    pub client_calls: u32,
    /// Wall-clock duration of the stage.
    pub duration_ms: f64,
    /// Failure details, when the stage did not merge.
    pub error: Option<OutcomeError>,
}

/// A stage failure with enough detail to attribute and diagnose it.
#[derive(Debug, Clone, Serialize)]
pub struct OutcomeError {
    /// Stable classification, such as `unmet_dependency`.
    pub error_type: String,
    /// Human-readable message.
    pub message: String,
    /// The raw response text, when the failure preserves one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl From<&StageError> for OutcomeError {
    fn from(error: &StageError) -> Self {
        Self {
            error_type: error.error_type().to_string(),
            message: error.to_string(),
            raw_response: error.raw_response().map(ToString::to_string),
        }
    }
}

impl From<StageReport> for StageOutcome {
    fn from(report: StageReport) -> Self {
        Self {
            stage: report.stage,
            phase: report.phase,
            merged_fields: report.merged_fields,
            warnings: report.warnings,
            client_calls: report.client_calls,
            duration_ms: report.duration_ms,
            error: report.error.as_ref().map(OutcomeError::from),
        }
    }
}

impl StageOutcome {
    /// An outcome for a stage that could not start because the caller's
    /// deadline expired at its boundary.
    #[must_use]
    pub fn deadline_expired(stage: StageName) -> Self {
        let error = StageError::deadline_exceeded(stage.as_str());
        Self {
            stage,
            phase: StagePhase::Failed,
            merged_fields: Vec::new(),
            warnings: Vec::new(),
            client_calls: 0,
            duration_ms: 0.0,
            error: Some(OutcomeError::from(&error)),
        }
    }

    /// Whether the stage merged its outputs.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.phase == StagePhase::Merged
    }
}

/// All outcomes for one record, plus its final field state.
#[derive(Debug, Clone, Serialize)]
pub struct RecordOutcome {
    /// The record's stable identity.
    pub key: RecordKey,
    /// The record with every merged field, including partial results.
    pub record: Record,
    /// Per-stage outcomes in execution order.
    pub stages: Vec<StageOutcome>,
    /// The first failing stage, if any.
    pub failed_stage: Option<StageName>,
}

impl RecordOutcome {
    /// Whether every executed stage merged.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failed_stage.is_none()
    }

    /// The failure outcome, when one exists.
    #[must_use]
    pub fn failure(&self) -> Option<&StageOutcome> {
        self.stages.iter().find(|outcome| !outcome.succeeded())
    }
}

/// One single-item traversal of the chain.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    /// Unique id for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Total wall-clock duration.
    pub duration_ms: f64,
    /// The enriched record, partial if a stage failed.
    pub record: Record,
    /// Per-stage outcomes in execution order.
    pub stages: Vec<StageOutcome>,
    /// The first failing stage, if any.
    pub failed_stage: Option<StageName>,
}

impl PipelineRun {
    /// Whether the whole chain merged.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failed_stage.is_none()
    }
}

/// Success and failure counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Records processed.
    pub total: usize,
    /// Records with every selected stage merged.
    pub succeeded: usize,
    /// Records with at least one failed stage.
    pub failed: usize,
}

impl BatchSummary {
    /// Tallies a set of record outcomes.
    #[must_use]
    pub fn from_outcomes(outcomes: &[RecordOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        Self {
            total: outcomes.len(),
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

/// One batch traversal: per-record outcomes in original order plus a
/// summary.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRun {
    /// Unique id for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// Total wall-clock duration.
    pub duration_ms: f64,
    /// Per-record outcomes, preserving input order.
    pub outcomes: Vec<RecordOutcome>,
    /// Success and failure counts.
    pub summary: BatchSummary,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MalformedResponse;

    fn merged_outcome(stage: StageName) -> StageOutcome {
        StageOutcome {
            stage,
            phase: StagePhase::Merged,
            merged_fields: vec!["shopping_category".to_string()],
            warnings: Vec::new(),
            client_calls: 1,
            duration_ms: 1.0,
            error: None,
        }
    }

    fn failed_record(key: usize) -> RecordOutcome {
        let record = Record::from_input(
            RecordKey::Row(key),
            &crate::record::ItemInput::new("x", "", ""),
        );
        let error = StageError::malformed(
            StageName::ItemCategory.as_str(),
            MalformedResponse::empty("raw"),
        );
        RecordOutcome {
            key: RecordKey::Row(key),
            record,
            stages: vec![StageOutcome {
                stage: StageName::ItemCategory,
                phase: StagePhase::Failed,
                merged_fields: Vec::new(),
                warnings: Vec::new(),
                client_calls: 2,
                duration_ms: 1.0,
                error: Some(OutcomeError::from(&error)),
            }],
            failed_stage: Some(StageName::ItemCategory),
        }
    }

    fn merged_record(key: usize) -> RecordOutcome {
        let record = Record::from_input(
            RecordKey::Row(key),
            &crate::record::ItemInput::new("x", "", ""),
        );
        RecordOutcome {
            key: RecordKey::Row(key),
            record,
            stages: vec![merged_outcome(StageName::ShoppingCategory)],
            failed_stage: None,
        }
    }

    #[test]
    fn test_summary_tallies_outcomes() {
        let outcomes = vec![merged_record(0), failed_record(1), merged_record(2)];
        let summary = BatchSummary::from_outcomes(&outcomes);
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                succeeded: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_outcome_error_carries_attribution() {
        let outcome = failed_record(4);
        let failure = outcome.failure().unwrap();
        let error = failure.error.as_ref().unwrap();
        assert_eq!(error.error_type, "malformed_response");
        assert!(error.message.contains("item-category"));
        assert_eq!(error.raw_response.as_deref(), Some("raw"));
    }

    #[test]
    fn test_deadline_outcome_names_the_stage() {
        let outcome = StageOutcome::deadline_expired(StageName::AiAttributes);
        assert!(!outcome.succeeded());
        assert_eq!(outcome.client_calls, 0);
        let error = outcome.error.unwrap();
        assert_eq!(error.error_type, "deadline_exceeded");
        assert!(error.message.contains("ai-attributes"));
    }

    #[test]
    fn test_outcome_serializes_without_empty_raw() {
        let outcome = StageOutcome::deadline_expired(StageName::AiAttributes);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["error"]["error_type"], "deadline_exceeded");
        assert!(json["error"].get("raw_response").is_none());
    }
}
