//! Bounded comma-delimited phrase list parsing for the keyword stages.
//!
//! Phrases are lowercased, digit-only and punctuation-only tokens are
//! dropped, and the phrase count must land inside the schema's hard bounds.
//! When the schema names a lead value, the first phrase must carry it; a
//! misplaced lead is moved to the front and a missing lead is prepended
//! with the tail phrase dropped, keeping the count intact.

use super::{normalize_text, ParsedFields};
use crate::errors::MalformedResponse;

/// Parses a keyword reply into a single comma-joined field.
///
/// # Errors
///
/// Returns [`MalformedResponse`] when the reply is empty, a phrase exceeds
/// `max_words`, or the phrase count falls outside `min_phrases..=max_phrases`.
pub fn parse(
    raw: &str,
    field: &str,
    min_phrases: usize,
    max_phrases: usize,
    max_words: usize,
    lead_value: Option<&str>,
) -> Result<ParsedFields, MalformedResponse> {
    if raw.trim().is_empty() {
        return Err(MalformedResponse::empty(raw));
    }

    // Replies are a single comma-separated line; stray newlines are noise.
    let flattened = raw.replace(['\n', '\r'], " ");
    let mut phrases: Vec<String> = flattened
        .split(',')
        .map(clean_phrase)
        .filter(|phrase| !phrase.is_empty())
        .collect();

    if phrases.is_empty() {
        return Err(MalformedResponse::empty(raw));
    }
    for phrase in &phrases {
        if phrase.split_whitespace().count() > max_words {
            return Err(MalformedResponse::phrase_too_long(phrase, max_words, raw));
        }
    }
    if phrases.len() < min_phrases || phrases.len() > max_phrases {
        return Err(MalformedResponse::count_out_of_bounds(
            phrases.len(),
            min_phrases,
            max_phrases,
            raw,
        ));
    }

    let mut parsed = ParsedFields::new();
    if let Some(lead) = lead_value {
        repair_lead(&mut phrases, lead, field, &mut parsed);
    }
    parsed.insert(field, phrases.join(", "));
    Ok(parsed)
}

/// Lowercases a phrase and drops tokens carrying no letters, such as
/// numbering ("1.") or stray punctuation.
fn clean_phrase(segment: &str) -> String {
    normalize_text(segment)
        .split_whitespace()
        .filter(|token| token.chars().any(char::is_alphabetic))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Ensures the first phrase equals the lead value without changing the
/// phrase count.
fn repair_lead(phrases: &mut Vec<String>, lead: &str, field: &str, parsed: &mut ParsedFields) {
    let lead_norm = normalize_text(lead);
    if phrases.first().is_some_and(|first| *first == lead_norm) {
        return;
    }
    if let Some(position) = phrases.iter().position(|phrase| *phrase == lead_norm) {
        let phrase = phrases.remove(position);
        phrases.insert(0, phrase);
        parsed.warn(field, format!("moved lead phrase '{lead_norm}' to front"));
        return;
    }
    if let Some(dropped) = phrases.pop() {
        phrases.insert(0, lead_norm.clone());
        parsed.warn(
            field,
            format!("lead phrase '{lead_norm}' was missing; prepended and dropped '{dropped}'"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::MalformedKind;

    fn joined(parsed: &ParsedFields) -> &str {
        parsed.fields()[0].1.as_text().unwrap_or_default()
    }

    #[test]
    fn test_exact_five_with_lead_in_place() {
        let parsed = parse(
            "t-shirt, cotton t-shirt, casual t-shirt, summer t-shirt, printed t-shirt",
            "search_keywords",
            5,
            5,
            3,
            Some("t-shirt"),
        )
        .unwrap();
        assert_eq!(
            joined(&parsed),
            "t-shirt, cotton t-shirt, casual t-shirt, summer t-shirt, printed t-shirt"
        );
        assert!(parsed.warnings().is_empty());
    }

    #[test]
    fn test_misplaced_lead_is_moved_to_front() {
        let parsed = parse(
            "cotton t-shirt, t-shirt, casual t-shirt, summer t-shirt, printed t-shirt",
            "search_keywords",
            5,
            5,
            3,
            Some("t-shirt"),
        )
        .unwrap();
        let phrases: Vec<&str> = joined(&parsed).split(", ").collect();
        assert_eq!(phrases.len(), 5);
        assert_eq!(phrases[0], "t-shirt");
        assert_eq!(parsed.warnings().len(), 1);
    }

    #[test]
    fn test_missing_lead_is_prepended_without_changing_count() {
        let parsed = parse(
            "cotton tee, casual tee, summer tee, printed tee, soft tee",
            "search_keywords",
            5,
            5,
            3,
            Some("t-shirt"),
        )
        .unwrap();
        let phrases: Vec<&str> = joined(&parsed).split(", ").collect();
        assert_eq!(phrases.len(), 5);
        assert_eq!(phrases[0], "t-shirt");
        assert_eq!(parsed.warnings().len(), 1);
    }

    #[test]
    fn test_count_bounds_are_hard() {
        let four = parse("a b, c d, e f, g h", "dsw", 5, 10, 3, None).unwrap_err();
        assert_eq!(four.kind, MalformedKind::CountOutOfBounds);

        let eleven = (0..11)
            .map(|i| format!("phrase {}", (b'a' + i) as char))
            .collect::<Vec<_>>()
            .join(", ");
        let err = parse(&eleven, "dsw", 5, 10, 3, None).unwrap_err();
        assert_eq!(err.kind, MalformedKind::CountOutOfBounds);
    }

    #[test]
    fn test_boundary_counts_succeed() {
        let five = "one tee, two tee, three tee, four tee, five tee";
        assert!(parse(five, "dsw", 5, 10, 3, None).is_ok());

        let ten = (0..10)
            .map(|i| format!("kind {} tee", (b'a' + i) as char))
            .collect::<Vec<_>>()
            .join(", ");
        assert!(parse(&ten, "dsw", 5, 10, 3, None).is_ok());
    }

    #[test]
    fn test_numbering_and_empty_segments_are_dropped() {
        let parsed = parse(
            "1. t-shirt,, 2. cotton t-shirt, 3. casual t-shirt, 4. soft t-shirt, 5. summer t-shirt",
            "search_keywords",
            5,
            5,
            3,
            Some("t-shirt"),
        )
        .unwrap();
        let phrases: Vec<&str> = joined(&parsed).split(", ").collect();
        assert_eq!(phrases.len(), 5);
        assert_eq!(phrases[0], "t-shirt");
        assert_eq!(phrases[1], "cotton t-shirt");
    }

    #[test]
    fn test_overlong_phrase_fails() {
        let err = parse(
            "t-shirt, very soft cotton crew tee, casual tee, summer tee, printed tee",
            "search_keywords",
            5,
            5,
            3,
            Some("t-shirt"),
        )
        .unwrap_err();
        assert_eq!(err.kind, MalformedKind::PhraseTooLong);
        assert!(err.raw.contains("very soft cotton crew tee"));
    }

    #[test]
    fn test_empty_reply_fails() {
        let err = parse("   \n", "dsw", 5, 10, 3, None).unwrap_err();
        assert_eq!(err.kind, MalformedKind::EmptyResponse);
    }
}
