//! Closed-vocabulary label parsing.
//!
//! Classification stages reply with one line of the form
//! `<label>|confidence:<number>%`. The label must match an entry of the
//! stage's resolved vocabulary after normalization; an empty label before
//! the marker is the sanctioned "none fit" reply and maps to an empty label
//! with the reported confidence. Out-of-range confidences are clamped and
//! flagged rather than rejected, since confidence is advisory.

use super::{normalize_text, ParsedFields};
use crate::errors::MalformedResponse;
use regex::Regex;
use std::sync::LazyLock;

static LABEL_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<label>[^|]*)\|\s*confidence\s*:?\s*(?P<value>-?\d{1,4})\s*%?\s*$")
        .expect("label grammar is a valid pattern")
});

/// Parses a classification reply into `(label, confidence)` fields.
///
/// # Errors
///
/// Returns [`MalformedResponse`] when the reply is empty, lacks the
/// `|confidence` marker, carries a non-numeric confidence, or names a label
/// outside `vocabulary`.
pub fn parse(
    raw: &str,
    vocabulary: &[String],
    label_field: &str,
    confidence_field: &str,
) -> Result<ParsedFields, MalformedResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MalformedResponse::empty(raw));
    }

    // Models occasionally prepend blank lines or wrap the reply in quotes;
    // only the first non-empty line carries the grammar.
    let line = trimmed
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .replace(['"', '\'', '`'], "");

    let Some(captures) = LABEL_LINE.captures(&line) else {
        let detail = if line.to_lowercase().contains("|confidence") {
            "confidence value is not numeric"
        } else {
            "missing '|confidence' marker"
        };
        return Err(MalformedResponse::missing_field(
            format!("{confidence_field} ({detail})"),
            raw,
        ));
    };

    let label_text = normalize_text(&captures["label"]);
    let reported: i64 = captures["value"].parse().unwrap_or(0);

    let mut parsed = ParsedFields::new();
    let label = if label_text.is_empty() {
        // The prompt instructs "|confidence:0%" when no entry fits.
        String::new()
    } else {
        match_vocabulary(&label_text, vocabulary)
            .ok_or_else(|| MalformedResponse::vocabulary_mismatch(&label_text, raw))?
    };

    let confidence = reported.clamp(0, 100);
    parsed.insert(label_field, label);
    parsed.insert(confidence_field, confidence);
    if confidence != reported {
        parsed.warn(
            confidence_field,
            format!("confidence {reported} clamped to {confidence}"),
        );
    }
    Ok(parsed)
}

/// Finds the canonical vocabulary entry for a normalized label, tolerating
/// minor punctuation variance such as a trailing period.
fn match_vocabulary(label: &str, vocabulary: &[String]) -> Option<String> {
    let exact = vocabulary
        .iter()
        .find(|entry| normalize_text(entry) == label);
    if let Some(entry) = exact {
        return Some(entry.clone());
    }
    let stripped = strip_edge_punctuation(label);
    vocabulary
        .iter()
        .find(|entry| strip_edge_punctuation(&normalize_text(entry)) == stripped)
        .cloned()
}

fn strip_edge_punctuation(text: &str) -> &str {
    text.trim_matches(|ch: char| !(ch.is_alphanumeric() || ch == '&'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn vocab(entries: &[&str]) -> Vec<String> {
        entries.iter().map(ToString::to_string).collect()
    }

    fn field<'a>(parsed: &'a ParsedFields, name: &str) -> &'a FieldValue {
        &parsed
            .fields()
            .iter()
            .find(|(field, _)| field == name)
            .unwrap()
            .1
    }

    #[test]
    fn test_well_formed_line_parses() {
        let parsed = parse(
            "fashion|confidence:95%",
            &vocab(&["fashion", "electronics"]),
            "shopping_category",
            "shopping_category_confidence",
        )
        .unwrap();
        assert_eq!(
            field(&parsed, "shopping_category").as_text(),
            Some("fashion")
        );
        assert_eq!(
            field(&parsed, "shopping_category_confidence").as_integer(),
            Some(95)
        );
        assert!(parsed.warnings().is_empty());
    }

    #[test]
    fn test_case_and_quote_variance_tolerated() {
        let parsed = parse(
            "\n\"Casual  Wear\"|confidence: 88 %\n",
            &vocab(&["casual wear", "formal wear"]),
            "shopping_subcategory",
            "shopping_subcategory_confidence",
        )
        .unwrap();
        assert_eq!(
            field(&parsed, "shopping_subcategory").as_text(),
            Some("casual wear")
        );
    }

    #[test]
    fn test_confidence_clamping_is_flagged() {
        let vocabulary = vocab(&["fashion"]);
        let high = parse("fashion|confidence:150%", &vocabulary, "c", "cc").unwrap();
        assert_eq!(field(&high, "cc").as_integer(), Some(100));
        assert_eq!(high.warnings().len(), 1);

        let low = parse("fashion|confidence:-5%", &vocabulary, "c", "cc").unwrap();
        assert_eq!(field(&low, "cc").as_integer(), Some(0));
        assert_eq!(low.warnings().len(), 1);

        let exact = parse("fashion|confidence:87%", &vocabulary, "c", "cc").unwrap();
        assert_eq!(field(&exact, "cc").as_integer(), Some(87));
        assert!(exact.warnings().is_empty());
    }

    #[test]
    fn test_none_fit_reply_yields_empty_label() {
        let parsed = parse(
            "|confidence:0%",
            &vocab(&["fashion"]),
            "shopping_category",
            "shopping_category_confidence",
        )
        .unwrap();
        assert_eq!(field(&parsed, "shopping_category").as_text(), Some(""));
        assert_eq!(
            field(&parsed, "shopping_category_confidence").as_integer(),
            Some(0)
        );
    }

    #[test]
    fn test_unknown_label_is_vocabulary_mismatch() {
        let err = parse(
            "spaceships|confidence:99%",
            &vocab(&["fashion", "electronics"]),
            "c",
            "cc",
        )
        .unwrap_err();
        assert_eq!(err.kind, crate::errors::MalformedKind::VocabularyMismatch);
        assert_eq!(err.raw, "spaceships|confidence:99%");
    }

    #[test]
    fn test_missing_marker_is_malformed() {
        let err = parse("fashion", &vocab(&["fashion"]), "c", "cc").unwrap_err();
        assert_eq!(err.kind, crate::errors::MalformedKind::MissingField);

        let err = parse("", &vocab(&["fashion"]), "c", "cc").unwrap_err();
        assert_eq!(err.kind, crate::errors::MalformedKind::EmptyResponse);
    }

    #[test]
    fn test_hyphenated_label_matches() {
        let parsed = parse(
            "T-Shirt.|confidence:91%",
            &vocab(&["t-shirt", "blouse"]),
            "item_category",
            "item_category_confidence",
        )
        .unwrap();
        assert_eq!(field(&parsed, "item_category").as_text(), Some("t-shirt"));
    }
}
