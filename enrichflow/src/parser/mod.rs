//! Response parsing and validation.
//!
//! Each response schema has an explicit typed parser instead of ad hoc
//! string scanning: [`label`] for closed-vocabulary classifications,
//! [`keywords`] for bounded phrase lists, [`attributes`] for the fixed
//! `Name: value` block, and [`translation`] for Arabic text. Parsers either
//! return the stage's typed fields or a classified [`MalformedResponse`]
//! carrying the raw text, so the executor can decide between a clarified
//! reparse and surfacing the failure.

pub mod attributes;
pub mod keywords;
pub mod label;
pub mod translation;

pub use attributes::{AttributeBlock, ATTRIBUTE_NAMES};

use crate::contract::ResponseSchema;
use crate::errors::MalformedResponse;
use crate::record::FieldValue;
use serde::Serialize;

/// A tolerated irregularity noted while parsing.
///
/// Warnings accompany accepted values the parser had to adjust, such as a
/// clamped confidence or a repaired keyword lead. They never fail a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// The output field the warning is about.
    pub field: String,
    /// What was adjusted.
    pub message: String,
}

impl ParseWarning {
    /// Creates a warning for `field`.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The typed output of a successful parse: fields to merge plus any
/// warnings raised along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFields {
    fields: Vec<(String, FieldValue)>,
    warnings: Vec<ParseWarning>,
}

impl ParsedFields {
    /// An empty parse result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an output field in merge order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Records a tolerated irregularity.
    pub fn warn(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ParseWarning::new(field, message));
    }

    /// The fields to merge, in order.
    #[must_use]
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Warnings raised while parsing.
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    /// Consumes the result, returning fields and warnings.
    #[must_use]
    pub fn into_parts(self) -> (Vec<(String, FieldValue)>, Vec<ParseWarning>) {
        (self.fields, self.warnings)
    }

    /// Returns `true` if no fields were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Parses a raw response against a non-translation schema.
///
/// `vocabulary` is the resolved closed vocabulary for label schemas;
/// `lead_value` is the value the first keyword phrase must carry when the
/// schema declares a lead field. Translation responses are parsed per field
/// by [`translation::parse`], so the translation arm produces nothing here.
///
/// # Errors
///
/// Returns [`MalformedResponse`] when the raw text does not satisfy the
/// schema's grammar or bounds.
pub fn parse_stage_response(
    schema: &ResponseSchema,
    raw: &str,
    vocabulary: Option<&[String]>,
    lead_value: Option<&str>,
) -> Result<ParsedFields, MalformedResponse> {
    match schema {
        ResponseSchema::Label {
            label_field,
            confidence_field,
            ..
        } => label::parse(raw, vocabulary.unwrap_or(&[]), label_field, confidence_field),
        ResponseSchema::KeywordList {
            field,
            min_phrases,
            max_phrases,
            max_words_per_phrase,
            lead_with_field,
        } => keywords::parse(
            raw,
            field,
            *min_phrases,
            *max_phrases,
            *max_words_per_phrase,
            lead_with_field.as_deref().and(lead_value),
        ),
        ResponseSchema::AttributeBlock { field } => attributes::parse(raw, field),
        ResponseSchema::Translation { .. } => Ok(ParsedFields::new()),
    }
}

/// Lowercases, strips quote characters, and collapses whitespace runs.
///
/// Shared by the label and keyword parsers so vocabulary comparison and
/// phrase comparison agree on what "the same text" means.
pub(crate) fn normalize_text(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    let mut last_was_space = true;
    for ch in text.trim().chars() {
        if matches!(ch, '"' | '\'' | '`') {
            continue;
        }
        if ch.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
                last_was_space = true;
            }
        } else {
            for lower in ch.to_lowercase() {
                cleaned.push(lower);
            }
            last_was_space = false;
        }
    }
    while cleaned.ends_with(' ') {
        cleaned.pop();
    }
    cleaned
}
