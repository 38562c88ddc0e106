//! Fixed-set `Name: value` attribute block parsing.
//!
//! The attribute stage replies with one line per attribute. Lines naming
//! anything outside the closed set are ignored, duplicate names keep the
//! first value, and names the model omitted come back as empty strings.
//! The merged field is the canonical block re-rendered in declaration
//! order, so downstream consumers always see all names.

use super::ParsedFields;
use crate::errors::{MalformedKind, MalformedResponse};
use serde::{Deserialize, Serialize};

/// The closed attribute set, in canonical output order.
pub const ATTRIBUTE_NAMES: [&str; 18] = [
    "Gender",
    "Age",
    "Brand",
    "Generic Name",
    "Product Name",
    "Size",
    "Measurements",
    "Features",
    "Types of Fashion Styles",
    "Gem Stones",
    "Birth Stones",
    "Material",
    "Color",
    "Pattern",
    "Occasion",
    "Activity",
    "Season",
    "Country of origin",
];

/// A parsed attribute block: every canonical name mapped to a value,
/// empty when unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBlock {
    entries: Vec<(String, String)>,
}

impl AttributeBlock {
    /// Builds a block from per-name values in canonical order. Values for
    /// names outside the closed set are discarded.
    #[must_use]
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut block = Self::empty();
        for (name, value) in values {
            block.set(name, value);
        }
        block
    }

    /// A block with every value empty.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: ATTRIBUTE_NAMES
                .iter()
                .map(|name| ((*name).to_string(), String::new()))
                .collect(),
        }
    }

    /// The value for `name`, or `None` if the name is outside the set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(name.trim()))
            .map(|(_, value)| value.as_str())
    }

    /// Sets the value for `name` if it belongs to the set. Returns whether
    /// the name was known.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(entry, _)| entry.eq_ignore_ascii_case(name.trim()))
        else {
            return false;
        };
        entry.1 = value.trim().to_string();
        true
    }

    /// Entries in canonical order.
    #[must_use]
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Names with non-empty values.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .count()
    }

    /// Renders the canonical multi-line `Name: value` text.
    #[must_use]
    pub fn render(&self) -> String {
        let lines: Vec<String> = self
            .entries
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    format!("{name}:")
                } else {
                    format!("{name}: {value}")
                }
            })
            .collect();
        lines.join("\n")
    }
}

impl Default for AttributeBlock {
    fn default() -> Self {
        Self::empty()
    }
}

/// Parses a raw attribute reply into an [`AttributeBlock`].
///
/// # Errors
///
/// Returns [`MalformedResponse`] when the reply is empty or contains no
/// line naming a known attribute.
pub fn parse_block(raw: &str) -> Result<AttributeBlock, MalformedResponse> {
    if raw.trim().is_empty() {
        return Err(MalformedResponse::empty(raw));
    }

    let mut block = AttributeBlock::empty();
    let mut seen: Vec<String> = Vec::new();
    for line in raw.lines() {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if seen.iter().any(|prior| prior.eq_ignore_ascii_case(name)) {
            // Duplicate attribute lines keep the first value.
            continue;
        }
        if block.set(name, value) {
            seen.push(name.to_string());
        }
    }

    if seen.is_empty() {
        return Err(MalformedResponse::new(
            MalformedKind::MissingField,
            "no known attribute lines found in response",
            raw,
        ));
    }
    Ok(block)
}

/// Parses an attribute reply into the stage's single output field.
///
/// # Errors
///
/// Propagates [`parse_block`] failures.
pub fn parse(raw: &str, field: &str) -> Result<ParsedFields, MalformedResponse> {
    let block = parse_block(raw)?;
    let mut parsed = ParsedFields::new();
    parsed.insert(field, block.render());
    Ok(parsed)
}
