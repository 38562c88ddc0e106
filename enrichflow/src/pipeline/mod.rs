//! Chain assembly and pipeline execution.
//!
//! This module provides:
//! - The ordered stage chain with startup validation
//! - Stage selections for partial runs
//! - The orchestrator driving single-item and batch modes
//! - Run reports for stages, records, and batches

mod chain;
mod orchestrator;
mod run;


pub use chain::{EnrichmentChain, StageSelection};
pub use orchestrator::PipelineOrchestrator;
pub use run::{BatchRun, BatchSummary, OutcomeError, PipelineRun, RecordOutcome, StageOutcome};
