//! Arabic translation validation.
//!
//! Translations carry no grammar beyond being non-empty and containing at
//! least one Arabic-script character; everything else the model says is
//! kept verbatim after trimming.

use crate::errors::MalformedResponse;

/// Unicode ranges accepted as Arabic script, including the supplement,
/// Extended-A, and the presentation forms.
const ARABIC_RANGES: [(char, char); 5] = [
    ('\u{0600}', '\u{06FF}'),
    ('\u{0750}', '\u{077F}'),
    ('\u{08A0}', '\u{08FF}'),
    ('\u{FB50}', '\u{FDFF}'),
    ('\u{FE70}', '\u{FEFF}'),
];

/// Returns `true` if `ch` falls inside an Arabic script range.
#[must_use]
pub fn is_arabic(ch: char) -> bool {
    ARABIC_RANGES
        .iter()
        .any(|(start, end)| (*start..=*end).contains(&ch))
}

/// Validates a translation reply and returns the trimmed text.
///
/// # Errors
///
/// Returns [`MalformedResponse`] when the reply is empty or contains no
/// Arabic-script character.
pub fn parse(raw: &str) -> Result<String, MalformedResponse> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MalformedResponse::empty(raw));
    }
    if !trimmed.chars().any(is_arabic) {
        return Err(MalformedResponse::missing_script("Arabic", raw));
    }
    Ok(trimmed.to_string())
}
