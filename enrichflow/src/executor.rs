//! Stage execution against a single record.
//!
//! The executor drives one (record, stage) pair through the phases
//! `DependencyCheck -> Generating -> Parsing -> Merged`, failing out with a
//! typed [`StageError`] at any phase. Transport outages are retried with
//! backoff inside the generating phase; a malformed response buys exactly
//! one regeneration with a clarified prompt before the stage fails. The
//! merge at the end is the only point at which the record is mutated.

use crate::client::{GenerationClient, GenerationRequest};
use crate::config::GenerationConfig;
use crate::contract::{ModelRole, ResponseSchema, StageContract, StageName};
use crate::errors::{GenerationError, StageError};
use crate::events::{EventSink, NoOpEventSink};
use crate::parser::{self, ParseWarning, ParsedFields};
use crate::prompt::{self, PromptStyle};
use crate::record::{fields, Record};
use crate::retry::RetryConfig;
use crate::taxonomy::CategoryTaxonomy;
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Phases of the per-(record, stage) state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePhase {
    /// Not started.
    Pending,
    /// Verifying required inputs are present and non-empty.
    DependencyCheck,
    /// Waiting on the generation client.
    Generating,
    /// Parsing and validating the raw response.
    Parsing,
    /// Terminal: produced fields written to the record.
    Merged,
    /// Terminal: stage failed with a typed error.
    Failed,
}

impl StagePhase {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::DependencyCheck => "dependency_check",
            Self::Generating => "generating",
            Self::Parsing => "parsing",
            Self::Merged => "merged",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for StagePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when one stage ran against one record.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// The stage that ran.
    pub stage: StageName,
    /// The terminal phase: [`StagePhase::Merged`] or [`StagePhase::Failed`].
    pub phase: StagePhase,
    /// Names of the fields merged into the record.
    pub merged_fields: Vec<String>,
    /// Irregularities tolerated while parsing.
    pub warnings: Vec<ParseWarning>,
    /// Generation client invocations, including transport retries.
    pub client_calls: u32,
    /// Wall-clock duration of the stage.
    pub duration_ms: f64,
    /// The failure, when the stage did not merge.
    pub error: Option<StageError>,
}

impl StageReport {
    fn pending(stage: StageName) -> Self {
        Self {
            stage,
            phase: StagePhase::Pending,
            merged_fields: Vec::new(),
            warnings: Vec::new(),
            client_calls: 0,
            duration_ms: 0.0,
            error: None,
        }
    }

    /// Whether the stage reached [`StagePhase::Merged`].
    #[must_use]
    pub fn is_merged(&self) -> bool {
        self.phase == StagePhase::Merged
    }
}

/// Runs stages against records using a shared client, taxonomy, and retry
/// policy.
#[derive(Clone)]
pub struct StageExecutor {
    client: Arc<dyn GenerationClient>,
    taxonomy: Arc<CategoryTaxonomy>,
    generation: GenerationConfig,
    retry: RetryConfig,
    events: Arc<dyn EventSink>,
}

impl std::fmt::Debug for StageExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StageExecutor")
            .field("client", &self.client)
            .field("generation", &self.generation)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl StageExecutor {
    /// Creates an executor with the default retry policy and no event sink.
    #[must_use]
    pub fn new(
        client: Arc<dyn GenerationClient>,
        taxonomy: Arc<CategoryTaxonomy>,
        generation: GenerationConfig,
    ) -> Self {
        Self {
            client,
            taxonomy,
            generation,
            retry: RetryConfig::default(),
            events: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the transport retry policy.
    #[must_use]
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// The taxonomy stages resolve their vocabularies against.
    #[must_use]
    pub fn taxonomy(&self) -> &CategoryTaxonomy {
        &self.taxonomy
    }

    /// The sink receiving lifecycle events.
    #[must_use]
    pub fn events(&self) -> &dyn EventSink {
        self.events.as_ref()
    }

    /// Runs one stage against one record.
    ///
    /// On success the produced fields are merged into `record` and the
    /// report carries their names; on failure the record is untouched and
    /// the report carries the typed error.
    pub async fn execute(&self, contract: &StageContract, record: &mut Record) -> StageReport {
        let start = Instant::now();
        let mut report = StageReport::pending(contract.name);
        self.events.try_emit(
            "stage.started",
            Some(json!({
                "stage": contract.name.as_str(),
                "record": record.key().to_string(),
            })),
        );

        let calls = AtomicU32::new(0);
        let result = self.run(contract, record, &calls, &mut report).await;
        report.client_calls = calls.load(Ordering::Relaxed);
        report.duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(merged) => {
                report.phase = StagePhase::Merged;
                report.merged_fields = merged;
                self.events.try_emit(
                    "stage.merged",
                    Some(json!({
                        "stage": contract.name.as_str(),
                        "record": record.key().to_string(),
                        "fields": report.merged_fields,
                        "client_calls": report.client_calls,
                        "duration_ms": report.duration_ms,
                    })),
                );
            }
            Err(error) => {
                report.phase = StagePhase::Failed;
                warn!(
                    stage = %contract.name,
                    record = %record.key(),
                    error_type = error.error_type(),
                    error = %error,
                    "stage failed"
                );
                self.events.try_emit(
                    "stage.failed",
                    Some(json!({
                        "stage": contract.name.as_str(),
                        "record": record.key().to_string(),
                        "error_type": error.error_type(),
                        "message": error.to_string(),
                        "client_calls": report.client_calls,
                    })),
                );
                report.error = Some(error);
            }
        }
        report
    }

    async fn run(
        &self,
        contract: &StageContract,
        record: &mut Record,
        calls: &AtomicU32,
        report: &mut StageReport,
    ) -> Result<Vec<String>, StageError> {
        report.phase = StagePhase::DependencyCheck;
        for field in &contract.required_inputs {
            if !record.has_nonempty(field) {
                return Err(StageError::unmet_dependency(contract.name.as_str(), field));
            }
        }

        let parsed = match &contract.schema {
            ResponseSchema::Translation { source_fields } => {
                self.translate_fields(contract, record, source_fields, calls, report)
                    .await?
            }
            ResponseSchema::Label { vocabulary, .. } => {
                let resolved = vocabulary
                    .resolve(&self.taxonomy, record)
                    .filter(|list| !list.is_empty());
                match resolved {
                    Some(list) => {
                        self.generate_and_parse(contract, record, Some(&list), None, calls, report)
                            .await?
                    }
                    None => {
                        // The taxonomy has no entries under this path, so
                        // there is nothing to classify into.
                        debug!(
                            stage = %contract.name,
                            record = %record.key(),
                            "no vocabulary for taxonomy path; merging empty label"
                        );
                        Self::empty_label_fields(&contract.schema)
                    }
                }
            }
            ResponseSchema::KeywordList { lead_with_field, .. } => {
                let lead = lead_with_field
                    .as_ref()
                    .and_then(|field| record.get_text(field))
                    .map(ToString::to_string);
                self.generate_and_parse(contract, record, None, lead.as_deref(), calls, report)
                    .await?
            }
            ResponseSchema::AttributeBlock { .. } => {
                self.generate_and_parse(contract, record, None, None, calls, report)
                    .await?
            }
        };

        let (produced, warnings) = parsed.into_parts();
        report.warnings.extend(warnings);
        record
            .merge(produced)
            .map_err(|source| StageError::conflict(contract.name.as_str(), source))
    }

    /// Generates, parses, and on a malformed response regenerates once with
    /// the clarified prompt.
    async fn generate_and_parse(
        &self,
        contract: &StageContract,
        record: &Record,
        vocabulary: Option<&[String]>,
        lead: Option<&str>,
        calls: &AtomicU32,
        report: &mut StageReport,
    ) -> Result<ParsedFields, StageError> {
        report.phase = StagePhase::Generating;
        let prompt = prompt::stage_prompt(contract, record, vocabulary, PromptStyle::Standard);
        let raw = self.generate(contract, prompt, calls).await?;

        report.phase = StagePhase::Parsing;
        let parsed = match parser::parse_stage_response(&contract.schema, &raw, vocabulary, lead) {
            Ok(parsed) => parsed,
            Err(malformed) => {
                warn!(
                    stage = %contract.name,
                    kind = malformed.kind.label(),
                    "malformed response; regenerating with clarified prompt"
                );
                report.phase = StagePhase::Generating;
                let prompt =
                    prompt::stage_prompt(contract, record, vocabulary, PromptStyle::Clarified);
                let raw = self.generate(contract, prompt, calls).await?;

                report.phase = StagePhase::Parsing;
                parser::parse_stage_response(&contract.schema, &raw, vocabulary, lead)
                    .map_err(|source| StageError::malformed(contract.name.as_str(), source))?
            }
        };
        for warning in parsed.warnings() {
            warn!(
                stage = %contract.name,
                field = %warning.field,
                message = %warning.message,
                "parse warning"
            );
        }
        Ok(parsed)
    }

    /// Translates each configured source field with its own generation
    /// call. Empty sources become empty translations without a call.
    async fn translate_fields(
        &self,
        contract: &StageContract,
        record: &Record,
        source_fields: &[String],
        calls: &AtomicU32,
        report: &mut StageReport,
    ) -> Result<ParsedFields, StageError> {
        let mut parsed = ParsedFields::new();
        for source in source_fields {
            let output = format!("{source}{}", fields::ARABIC_SUFFIX);
            let text = record.get_text(source).unwrap_or_default().trim().to_string();
            if text.is_empty() || text.eq_ignore_ascii_case("empty") {
                parsed.insert(output, "");
                continue;
            }

            report.phase = StagePhase::Generating;
            let raw = self
                .generate(
                    contract,
                    prompt::translation_prompt(&text, PromptStyle::Standard),
                    calls,
                )
                .await?;

            report.phase = StagePhase::Parsing;
            let translated = match parser::translation::parse(&raw) {
                Ok(translated) => translated,
                Err(malformed) => {
                    warn!(
                        stage = %contract.name,
                        source_field = %source,
                        kind = malformed.kind.label(),
                        "malformed translation; regenerating with clarified prompt"
                    );
                    report.phase = StagePhase::Generating;
                    let raw = self
                        .generate(
                            contract,
                            prompt::translation_prompt(&text, PromptStyle::Clarified),
                            calls,
                        )
                        .await?;

                    report.phase = StagePhase::Parsing;
                    parser::translation::parse(&raw)
                        .map_err(|source| StageError::malformed(contract.name.as_str(), source))?
                }
            };
            parsed.insert(output, translated);
        }
        Ok(parsed)
    }

    /// One generation call wrapped in the transport retry policy.
    async fn generate(
        &self,
        contract: &StageContract,
        prompt: String,
        calls: &AtomicU32,
    ) -> Result<String, StageError> {
        let model = match contract.role {
            ModelRole::Primary => self.generation.primary_model.clone(),
            ModelRole::Translation => self.generation.translation_model.clone(),
        };
        let max_tokens = contract
            .max_tokens
            .unwrap_or(self.generation.default_max_tokens);
        let request = GenerationRequest::new(model, prompt, max_tokens);

        crate::retry::with_retry(
            &self.retry,
            contract.name.as_str(),
            GenerationError::is_retryable,
            || {
                calls.fetch_add(1, Ordering::Relaxed);
                self.client.generate(&request)
            },
        )
        .await
        .map_err(|source| StageError::generation(contract.name.as_str(), source))
    }

    fn empty_label_fields(schema: &ResponseSchema) -> ParsedFields {
        let mut parsed = ParsedFields::new();
        if let ResponseSchema::Label {
            label_field,
            confidence_field,
            ..
        } = schema
        {
            parsed.insert(label_field.clone(), "");
            parsed.insert(confidence_field.clone(), 0_i64);
            parsed.warn(
                label_field.clone(),
                "no vocabulary entries for the record's taxonomy path",
            );
        }
        parsed
    }
}
