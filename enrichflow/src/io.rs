//! Record sources and sinks for batch runs.
//!
//! Batch mode reads base item inputs from a [`RecordSource`] and writes
//! enriched records to a [`RecordSink`]. Both sides are synchronous and
//! order-preserving: I/O happens before and after the enrichment pass,
//! never inside it, and the sink receives outcomes in input order.

use crate::errors::EnrichError;
use crate::pipeline::RecordOutcome;
use crate::record::{ItemInput, Record, RecordKey};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// A finite, restartable sequence of base item inputs.
pub trait RecordSource {
    /// Reads every input in order.
    ///
    /// Calling this again rereads the sequence from the start.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] when the underlying medium cannot be read
    /// or an entry cannot be decoded.
    fn read_all(&mut self) -> Result<Vec<ItemInput>, EnrichError>;

    /// Builds row-keyed records from the inputs, preserving order.
    ///
    /// # Errors
    ///
    /// Propagates any [`RecordSource::read_all`] failure.
    fn read_records(&mut self) -> Result<Vec<Record>, EnrichError> {
        Ok(self
            .read_all()?
            .into_iter()
            .enumerate()
            .map(|(row, input)| Record::from_input(RecordKey::Row(row), &input))
            .collect())
    }
}

/// An order-preserving consumer of enriched records.
pub trait RecordSink {
    /// Writes the outcomes' records in the order given.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] when the underlying medium cannot be
    /// written.
    fn write_all(&mut self, outcomes: &[RecordOutcome]) -> Result<(), EnrichError>;
}

/// An in-memory source over a fixed list of inputs.
#[derive(Debug, Clone, Default)]
pub struct VecSource {
    inputs: Vec<ItemInput>,
}

impl VecSource {
    /// Creates a source over `inputs`.
    #[must_use]
    pub fn new(inputs: Vec<ItemInput>) -> Self {
        Self { inputs }
    }
}

impl RecordSource for VecSource {
    fn read_all(&mut self) -> Result<Vec<ItemInput>, EnrichError> {
        Ok(self.inputs.clone())
    }
}

/// An in-memory sink collecting enriched records.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    records: Vec<Record>,
}

impl VecSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The records written so far, in write order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consumes the sink, returning the collected records.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl RecordSink for VecSink {
    fn write_all(&mut self, outcomes: &[RecordOutcome]) -> Result<(), EnrichError> {
        self.records
            .extend(outcomes.iter().map(|outcome| outcome.record.clone()));
        Ok(())
    }
}

/// A source reading one JSON object per line from a file.
///
/// Blank lines are skipped. Each object decodes to an [`ItemInput`],
/// accepting either the crate's field names or the upstream export's
/// column headers.
#[derive(Debug, Clone)]
pub struct JsonLinesSource {
    path: PathBuf,
}

impl JsonLinesSource {
    /// Creates a source over the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonLinesSource {
    fn read_all(&mut self) -> Result<Vec<ItemInput>, EnrichError> {
        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut inputs = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            inputs.push(serde_json::from_str(&line)?);
        }
        Ok(inputs)
    }
}

/// A sink writing each enriched record as one flat JSON object per line,
/// fields in merge order.
///
/// Every `write_all` call replaces the file's contents. Output lines keep
/// the batch's record order; the row index is the line position.
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    /// Creates a sink over the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSink for JsonLinesSink {
    fn write_all(&mut self, outcomes: &[RecordOutcome]) -> Result<(), EnrichError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        for outcome in outcomes {
            serde_json::to_writer(&mut writer, &outcome.record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}
