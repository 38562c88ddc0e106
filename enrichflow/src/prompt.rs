//! Deterministic prompt rendering.
//!
//! Every stage prompt is a pure function of the contract, the record's
//! current fields, and the resolved vocabulary. The same inputs always
//! produce the same text, so prompts can be asserted byte-for-byte in tests
//! and captured by scripted clients.

use crate::contract::{ResponseSchema, StageContract, StageName};
use crate::parser::ATTRIBUTE_NAMES;
use crate::record::{fields, Record};
use std::fmt::Write as _;

/// How strictly the format contract is restated.
///
/// The first attempt uses [`PromptStyle::Standard`]. After a malformed
/// response the single reparse attempt uses [`PromptStyle::Clarified`],
/// which appends an explicit restatement of the expected output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// The normal stage prompt.
    #[default]
    Standard,
    /// The stage prompt plus a format reminder block.
    Clarified,
}

impl PromptStyle {
    /// Returns `true` for the reparse style.
    #[must_use]
    pub const fn is_clarified(self) -> bool {
        matches!(self, Self::Clarified)
    }
}

/// Renders the prompt for a non-translation stage.
///
/// `vocabulary` carries the resolved closed vocabulary for label stages and
/// is ignored by the keyword and attribute schemas.
#[must_use]
pub fn stage_prompt(
    contract: &StageContract,
    record: &Record,
    vocabulary: Option<&[String]>,
    style: PromptStyle,
) -> String {
    let mut prompt = match &contract.schema {
        ResponseSchema::Label { .. } => {
            label_prompt(contract.name, record, vocabulary.unwrap_or(&[]))
        }
        ResponseSchema::KeywordList {
            min_phrases,
            max_phrases,
            max_words_per_phrase,
            lead_with_field,
            ..
        } => keyword_prompt(
            record,
            *min_phrases,
            *max_phrases,
            *max_words_per_phrase,
            lead_with_field.as_deref(),
        ),
        ResponseSchema::AttributeBlock { .. } => attribute_prompt(record),
        // Translation prompts are rendered per field; see translation_prompt.
        ResponseSchema::Translation { .. } => String::new(),
    };
    if style.is_clarified() {
        prompt.push_str(&format_reminder(&contract.schema));
    }
    prompt
}

/// Renders the per-field translation prompt.
#[must_use]
pub fn translation_prompt(text: &str, style: PromptStyle) -> String {
    let mut prompt = String::from(
        "You are a professional English to Arabic translator for e-commerce. \
         Translate the following text into Arabic. \
         Respond with Arabic text only, no explanations.\n\n",
    );
    prompt.push_str(text);
    if style.is_clarified() {
        prompt.push_str(
            "\n\nFORMAT REMINDER:\n\
             Reply with the Arabic translation only. \
             The reply must contain Arabic script and nothing else.",
        );
    }
    prompt
}

/// `Display name: value` lines for the fields a stage feeds the model.
fn input_lines(record: &Record, field_names: &[&str]) -> String {
    let mut block = String::new();
    for name in field_names {
        let value = record.get_text(name).unwrap_or_default();
        let _ = writeln!(block, "{}: {value}", display_name(name));
    }
    block
}

fn display_name(field: &str) -> &'static str {
    match field {
        fields::ITEM_NAME => "Item",
        fields::DESCRIPTION => "Description",
        fields::VENDOR_CATEGORY => "Vendor Category",
        fields::SHOPPING_CATEGORY => "Shopping Category",
        fields::SHOPPING_SUBCATEGORY => "Shopping Subcategory",
        fields::ITEM_CATEGORY => "Item Category",
        _ => "Field",
    }
}

fn quoted_list(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("\"{v}\"")).collect();
    format!("[{}]", quoted.join(", "))
}

fn label_prompt(stage: StageName, record: &Record, vocabulary: &[String]) -> String {
    let (noun, plural, tag, context): (&str, &str, &str, &[&str]) = match stage {
        StageName::ShoppingCategory => (
            "shopping category",
            "categories",
            "<category>",
            &[fields::ITEM_NAME, fields::DESCRIPTION, fields::VENDOR_CATEGORY],
        ),
        StageName::ShoppingSubcategory => (
            "shopping subcategory",
            "subcategories",
            "<subcategory>",
            &[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
                fields::SHOPPING_CATEGORY,
            ],
        ),
        StageName::ItemCategory => (
            "item category",
            "item categories",
            "<category>",
            &[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
                fields::SHOPPING_CATEGORY,
                fields::SHOPPING_SUBCATEGORY,
            ],
        ),
        _ => (
            "item subcategory",
            "item subcategories",
            "<subcategory>",
            &[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
                fields::SHOPPING_CATEGORY,
                fields::SHOPPING_SUBCATEGORY,
                fields::ITEM_CATEGORY,
            ],
        ),
    };

    let examples = label_examples(vocabulary);
    format!(
        "You are a strict classification bot.\n\
         Your ONLY job is to return ONE {noun} and ONE confidence.\n\
         DO NOT explain. DO NOT add reasoning. DO NOT use multiple lines.\n\n\
         {inputs}\n\
         Allowed {plural}:\n\
         {allowed}\n\n\
         Output format (MUST follow exactly):\n\
         {tag}|confidence:<number>%\n\n\
         Example valid outputs:\n\
         {examples}\n\
         If none fit, output:\n\
         |confidence:0%\n\n\
         Now output ONLY one valid line:\n",
        inputs = input_lines(record, context),
        allowed = quoted_list(vocabulary),
    )
}

/// Two example lines built from the head of the vocabulary so the model
/// sees labels it is actually allowed to return.
fn label_examples(vocabulary: &[String]) -> String {
    let first = vocabulary.first().map_or("fashion", String::as_str);
    let second = vocabulary.get(1).map_or("electronics", String::as_str);
    format!("{first}|confidence:95%\n{second}|confidence:88%\n")
}

fn keyword_prompt(
    record: &Record,
    min_phrases: usize,
    max_phrases: usize,
    max_words: usize,
    lead_with_field: Option<&str>,
) -> String {
    let item_category = record.get_text(fields::ITEM_CATEGORY).unwrap_or_default();
    let count_clause = if min_phrases == max_phrases {
        format!("exactly {min_phrases}")
    } else {
        format!("{min_phrases}-{max_phrases}")
    };

    let mut rules = String::new();
    let mut rule = 1;
    let _ = writeln!(
        rules,
        "{rule}. Output {count_clause} phrases separated by commas, no numbering or extra text"
    );
    rule += 1;
    if lead_with_field.is_some() {
        let _ = writeln!(
            rules,
            "{rule}. The first phrase must be ONLY the item category: {item_category}"
        );
        rule += 1;
        let _ = writeln!(
            rules,
            "{rule}. All other phrases must end with the item category: {item_category}"
        );
        rule += 1;
    } else {
        let _ = writeln!(
            rules,
            "{rule}. Each phrase must end with the item category: {item_category}"
        );
        rule += 1;
        let _ = writeln!(
            rules,
            "{rule}. Include exactly one phrase with only the item category"
        );
        rule += 1;
    }
    let _ = writeln!(rules, "{rule}. Each phrase must be maximum {max_words} words");
    rule += 1;
    let _ = writeln!(rules, "{rule}. Format: modifier + modifier + item category");
    rule += 1;
    let _ = writeln!(
        rules,
        "{rule}. Use tangible features, proper nouns, or item attributes as modifiers"
    );
    rule += 1;
    let _ = writeln!(
        rules,
        "{rule}. Do NOT include sentiments, numbers, dates, symbols, or extra words"
    );
    rule += 1;
    let _ = writeln!(rules, "{rule}. Return everything in lowercase");
    rule += 1;
    let _ = writeln!(
        rules,
        "{rule}. STRICTLY follow the format. Do not add explanations or newlines"
    );

    format!(
        "You are a strict e-commerce keyword generator.\n\
         Generate {count_clause} keyword phrases for the item below. \
         FOLLOW THESE RULES STRICTLY:\n\n\
         Item Data:\n\
         {inputs}\n\
         Rules:\n\
         {rules}\n\
         Output ONLY:\n",
        inputs = input_lines(
            record,
            &[fields::ITEM_NAME, fields::DESCRIPTION, fields::ITEM_CATEGORY]
        ),
    )
}

fn attribute_prompt(record: &Record) -> String {
    let mut names_block = String::new();
    for name in ATTRIBUTE_NAMES {
        let _ = writeln!(names_block, "{name}:");
    }
    format!(
        "You are a strict AI attribute extractor for e-commerce products.\n\
         Analyze the item below and extract ONLY attributes that can be clearly inferred.\n\
         Do NOT guess, do NOT add explanations, do NOT include extra text.\n\
         Leave unknown attributes empty.\n\n\
         {inputs}\n\
         INSTRUCTIONS:\n\
         - Fill only known attributes; leave others empty\n\
         - Use concise English values\n\
         - Gender: choose strictly from [\"Women\", \"Men\", \"Unisex women, Unisex men\", \
         \"Girls\", \"Boys\", \"Unisex girls, unisex boys\"]\n\
         - Generic Name: use the item category if possible\n\
         - Color: infer from name or description\n\
         - Product Name: concise, not verbatim copy of item name\n\n\
         OUTPUT FORMAT (exactly, no deviations):\n\n\
         {names_block}\n\
         Output ONLY the above format. NO extra lines or explanations.\n",
        inputs = input_lines(
            record,
            &[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
                fields::SHOPPING_CATEGORY,
                fields::SHOPPING_SUBCATEGORY,
                fields::ITEM_CATEGORY,
            ]
        ),
    )
}

/// The block appended on the single reparse attempt.
fn format_reminder(schema: &ResponseSchema) -> String {
    match schema {
        ResponseSchema::Label { .. } => String::from(
            "\nFORMAT REMINDER:\n\
             Your reply must be exactly one line of the form:\n\
             <label>|confidence:<number>%\n\
             The label must be copied verbatim from the allowed list. \
             No other words, no quotes, no explanations.\n",
        ),
        ResponseSchema::KeywordList {
            min_phrases,
            max_phrases,
            max_words_per_phrase,
            ..
        } => {
            let count_clause = if min_phrases == max_phrases {
                format!("exactly {min_phrases}")
            } else {
                format!("between {min_phrases} and {max_phrases}")
            };
            format!(
                "\nFORMAT REMINDER:\n\
                 Your reply must be a single line of {count_clause} comma-separated \
                 phrases, each at most {max_words_per_phrase} words, all lowercase. \
                 No numbering, no explanations.\n"
            )
        }
        ResponseSchema::AttributeBlock { .. } => String::from(
            "\nFORMAT REMINDER:\n\
             Your reply must repeat the attribute list above, one 'Name: value' \
             line per attribute, in the same order, values left empty when unknown. \
             No extra lines.\n",
        ),
        ResponseSchema::Translation { .. } => String::from(
            "\nFORMAT REMINDER:\n\
             Reply with the Arabic translation only.\n",
        ),
    }
}
