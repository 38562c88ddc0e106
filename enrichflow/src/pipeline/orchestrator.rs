//! Pipeline orchestration over the enrichment chain.
//!
//! Two entry contracts share one per-record loop:
//!
//! - **Single-item mode** runs every stage for one item strictly in
//!   dependency order, halting at the first failure and returning the
//!   partial record. Fields merged by earlier stages are never rolled
//!   back.
//! - **Batch mode** runs a stage selection over many records. Records are
//!   independent, run under a bounded worker pool, and one record's
//!   failure never aborts the others. Output order always matches input
//!   order.
//!
//! A caller deadline is checked at stage boundaries only; a running
//! generation call is never interrupted mid-flight.

use crate::config::OrchestratorConfig;
use crate::errors::ChainValidationError;
use crate::events::EventSink;
use crate::executor::StageExecutor;
use crate::pipeline::chain::{EnrichmentChain, StageSelection};
use crate::pipeline::run::{BatchRun, BatchSummary, PipelineRun, RecordOutcome, StageOutcome};
use crate::record::{ItemInput, Record, RecordKey};
use chrono::Utc;
use futures::stream::{self, StreamExt};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use uuid::Uuid;

/// Sequences stage execution over records according to a validated chain.
#[derive(Debug, Clone)]
pub struct PipelineOrchestrator {
    executor: StageExecutor,
    chain: EnrichmentChain,
    config: OrchestratorConfig,
}

impl PipelineOrchestrator {
    /// Creates an orchestrator, validating the chain once.
    ///
    /// The retry policy in `config` replaces whatever the executor
    /// carried, so `config` is the single place run behavior is tuned.
    ///
    /// # Errors
    ///
    /// Returns [`ChainValidationError`] if the chain's dependency
    /// invariant does not hold.
    pub fn new(
        executor: StageExecutor,
        chain: EnrichmentChain,
        config: OrchestratorConfig,
    ) -> Result<Self, ChainValidationError> {
        chain.validate()?;
        let executor = executor.with_retry_config(config.retry.clone());
        Ok(Self {
            executor,
            chain,
            config,
        })
    }

    /// Routes lifecycle events from the orchestrator and its executor to
    /// `events`.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.executor = self.executor.with_events(events);
        self
    }

    /// The validated chain.
    #[must_use]
    pub fn chain(&self) -> &EnrichmentChain {
        &self.chain
    }

    /// The orchestrator configuration.
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Runs the whole chain for one item (single-item mode).
    pub async fn run_item(&self, input: &ItemInput) -> PipelineRun {
        let started_at = Utc::now();
        let start = Instant::now();
        let record = Record::from_input(RecordKey::Item(input.item_name.clone()), input);
        let outcome = self
            .run_record(record, &StageSelection::All, self.deadline_from_now())
            .await;
        PipelineRun {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            record: outcome.record,
            stages: outcome.stages,
            failed_stage: outcome.failed_stage,
        }
    }

    /// Runs a stage selection over a batch of records (batch mode).
    ///
    /// Records are processed independently under the configured worker
    /// pool; the returned outcomes preserve the input order.
    pub async fn run_batch(&self, records: Vec<Record>, selection: &StageSelection) -> BatchRun {
        let started_at = Utc::now();
        let start = Instant::now();
        let deadline = self.deadline_from_now();
        let concurrency = self.config.max_concurrency.max(1);

        let outcomes: Vec<RecordOutcome> = stream::iter(
            records
                .into_iter()
                .map(|record| self.run_record(record, selection, deadline)),
        )
        .buffered(concurrency)
        .collect()
        .await;

        let summary = BatchSummary::from_outcomes(&outcomes);
        info!(
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch completed"
        );
        self.executor.events().try_emit(
            "batch.completed",
            Some(json!({
                "total": summary.total,
                "succeeded": summary.succeeded,
                "failed": summary.failed,
            })),
        );

        BatchRun {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            duration_ms: start.elapsed().as_secs_f64() * 1000.0,
            outcomes,
            summary,
        }
    }

    /// Runs the selected stages for one record, halting at the first
    /// failure.
    pub async fn run_record(
        &self,
        mut record: Record,
        selection: &StageSelection,
        deadline: Option<Instant>,
    ) -> RecordOutcome {
        let mut stages: Vec<StageOutcome> = Vec::new();
        let mut failed_stage = None;

        for contract in self.chain.contracts() {
            if !selection.matches(contract.name) {
                continue;
            }
            if deadline.is_some_and(|limit| Instant::now() >= limit) {
                stages.push(StageOutcome::deadline_expired(contract.name));
                failed_stage = Some(contract.name);
                break;
            }

            let report = self.executor.execute(contract, &mut record).await;
            let merged = report.is_merged();
            stages.push(report.into());
            if !merged {
                failed_stage = Some(contract.name);
                break;
            }
        }

        self.executor.events().try_emit(
            "record.completed",
            Some(json!({
                "record": record.key().to_string(),
                "stages_run": stages.len(),
                "failed_stage": failed_stage.map(|stage| stage.as_str()),
            })),
        );

        RecordOutcome {
            key: record.key().clone(),
            record,
            stages,
            failed_stage,
        }
    }

    fn deadline_from_now(&self) -> Option<Instant> {
        self.config.deadline().map(|limit| Instant::now() + limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::contract::{StageContract, StageName};
    use crate::record::fields;
    use crate::retry::RetryConfig;
    use crate::taxonomy::CategoryTaxonomy;
    use crate::testing::{canned_reply, sample_item, ScriptedClient};

    fn fast_retry() -> RetryConfig {
        RetryConfig::new()
            .with_max_attempts(2)
            .with_base_delay_ms(1)
            .with_max_delay_ms(2)
    }

    fn orchestrator(client: ScriptedClient, config: OrchestratorConfig) -> PipelineOrchestrator {
        let executor = StageExecutor::new(
            Arc::new(client),
            Arc::new(CategoryTaxonomy::builtin()),
            GenerationConfig::default(),
        );
        PipelineOrchestrator::new(
            executor,
            EnrichmentChain::standard(),
            config.with_retry(fast_retry()),
        )
        .unwrap()
    }

    fn scripted_full_chain() -> ScriptedClient {
        // Translation runs once per non-empty source field.
        ScriptedClient::new()
            .respond_once(canned_reply(StageName::ShoppingCategory))
            .respond_once(canned_reply(StageName::ShoppingSubcategory))
            .respond_once(canned_reply(StageName::ItemCategory))
            .respond_once(canned_reply(StageName::ItemSubcategory))
            .respond_once(canned_reply(StageName::SearchKeywords))
            .respond_once(canned_reply(StageName::DescriptionSearchWords))
            .respond_once(canned_reply(StageName::AiAttributes))
            .respond_once(canned_reply(StageName::ArabicTranslation))
            .respond_once(canned_reply(StageName::ArabicTranslation))
    }

    #[tokio::test]
    async fn test_single_item_happy_path_populates_all_stages() {
        let client = scripted_full_chain();
        let orchestrator = orchestrator(client.clone(), OrchestratorConfig::default());

        let run = orchestrator.run_item(&sample_item()).await;

        assert!(run.succeeded());
        assert_eq!(run.stages.len(), 8);
        assert!(run.stages.iter().all(StageOutcome::succeeded));

        let record = &run.record;
        assert_eq!(record.get_text(fields::SHOPPING_CATEGORY), Some("fashion"));
        assert_eq!(
            record.get_text(fields::SHOPPING_SUBCATEGORY),
            Some("casual wear")
        );
        assert_eq!(record.get_text(fields::ITEM_CATEGORY), Some("top"));
        assert_eq!(record.get_text(fields::ITEM_SUBCATEGORY), Some("t-shirt"));
        assert!(record.has_nonempty(fields::SEARCH_KEYWORDS));
        assert!(record.has_nonempty(fields::DESCRIPTION_SEARCH_WORDS));
        assert!(record.has_nonempty(fields::AI_ATTRIBUTES));
        assert!(record.has_nonempty("item_name_ar"));
        assert!(record.has_nonempty("description_ar"));

        // Translation calls go to the translation model.
        let models = client.models();
        assert_eq!(models.len(), 9);
        assert!(models[..7].iter().all(|model| model == "phi4:latest"));
        assert!(models[7..].iter().all(|model| model == "aya:8b"));
    }

    #[tokio::test]
    async fn test_chain_halts_at_first_failure_and_keeps_partials() {
        let client = ScriptedClient::new()
            .respond_once(canned_reply(StageName::ShoppingCategory))
            .respond_once(canned_reply(StageName::ShoppingSubcategory))
            .respond_with("no idea what this item is");
        let orchestrator = orchestrator(client.clone(), OrchestratorConfig::default());

        let run = orchestrator.run_item(&sample_item()).await;

        assert!(!run.succeeded());
        assert_eq!(run.failed_stage, Some(StageName::ItemCategory));
        assert_eq!(run.stages.len(), 3);

        // Stages 1 and 2 keep their fields, stage 3 onward never merged.
        assert_eq!(run.record.get_text(fields::SHOPPING_CATEGORY), Some("fashion"));
        assert_eq!(
            run.record.get_text(fields::SHOPPING_SUBCATEGORY),
            Some("casual wear")
        );
        assert!(!run.record.contains(fields::ITEM_CATEGORY));
        assert!(!run.record.contains(fields::SEARCH_KEYWORDS));

        let failure = run.stages.last().unwrap();
        assert_eq!(
            failure.error.as_ref().unwrap().error_type,
            "malformed_response"
        );
        // Malformed parse consumed the clarified retry.
        assert_eq!(failure.client_calls, 2);
    }

    #[tokio::test]
    async fn test_batch_isolates_failures_and_preserves_order() {
        let client = ScriptedClient::new()
            .respond_matching("Widget 4", "not a classification at all")
            .respond_with("fashion|confidence:95%");
        let orchestrator = orchestrator(
            client.clone(),
            OrchestratorConfig::default().with_max_concurrency(4),
        );

        let records: Vec<Record> = (0..10)
            .map(|row| {
                Record::from_input(
                    RecordKey::Row(row),
                    &ItemInput::new(format!("Widget {row}"), "a widget", "Widgets"),
                )
            })
            .collect();

        let batch = orchestrator
            .run_batch(records, &StageSelection::only(StageName::ShoppingCategory))
            .await;

        assert_eq!(batch.summary.total, 10);
        assert_eq!(batch.summary.succeeded, 9);
        assert_eq!(batch.summary.failed, 1);

        for (row, outcome) in batch.outcomes.iter().enumerate() {
            assert_eq!(outcome.key, RecordKey::Row(row));
            if row == 4 {
                assert_eq!(outcome.failed_stage, Some(StageName::ShoppingCategory));
                let error = outcome.failure().unwrap().error.as_ref().unwrap();
                assert_eq!(error.error_type, "malformed_response");
                assert!(error.raw_response.is_some());
            } else {
                assert!(outcome.succeeded());
                assert_eq!(
                    outcome.record.get_text(fields::SHOPPING_CATEGORY),
                    Some("fashion")
                );
            }
        }
    }

    #[tokio::test]
    async fn test_deadline_expires_at_stage_boundary() {
        let client = scripted_full_chain();
        let orchestrator = orchestrator(
            client.clone(),
            OrchestratorConfig::default().with_deadline_ms(0),
        );

        let run = orchestrator.run_item(&sample_item()).await;

        assert!(!run.succeeded());
        assert_eq!(run.failed_stage, Some(StageName::ShoppingCategory));
        assert_eq!(run.stages.len(), 1);
        assert_eq!(
            run.stages[0].error.as_ref().unwrap().error_type,
            "deadline_exceeded"
        );
        // The deadline fires before the client is ever invoked.
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_chain_is_rejected_at_construction() {
        let executor = StageExecutor::new(
            Arc::new(ScriptedClient::new()),
            Arc::new(CategoryTaxonomy::builtin()),
            GenerationConfig::default(),
        );
        let chain = EnrichmentChain::from_contracts(vec![
            StageContract::item_category(),
            StageContract::shopping_category(),
        ]);
        let result = PipelineOrchestrator::new(executor, chain, OrchestratorConfig::default());
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_selection_range_runs_contiguous_stages() {
        let client = ScriptedClient::new()
            .respond_once(canned_reply(StageName::SearchKeywords))
            .respond_once(canned_reply(StageName::DescriptionSearchWords));
        let orchestrator = orchestrator(client.clone(), OrchestratorConfig::default());

        let mut record = Record::from_input(RecordKey::Row(0), &sample_item());
        record.insert(fields::SHOPPING_CATEGORY, "fashion").unwrap();
        record
            .insert(fields::SHOPPING_SUBCATEGORY, "casual wear")
            .unwrap();
        record.insert(fields::ITEM_CATEGORY, "top").unwrap();

        let selection = StageSelection::range(
            StageName::SearchKeywords,
            StageName::DescriptionSearchWords,
        );
        let batch = orchestrator.run_batch(vec![record], &selection).await;

        assert_eq!(batch.summary.succeeded, 1);
        let outcome = &batch.outcomes[0];
        assert_eq!(outcome.stages.len(), 2);
        assert!(outcome.record.has_nonempty(fields::SEARCH_KEYWORDS));
        assert!(outcome.record.has_nonempty(fields::DESCRIPTION_SEARCH_WORDS));
        assert!(!outcome.record.contains(fields::AI_ATTRIBUTES));
    }
}
