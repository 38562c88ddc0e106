//! Stage contracts: the static definition of each pipeline stage.
//!
//! A contract names a stage's inputs, outputs, response schema, model role,
//! and token budget. Contracts are pure data; prompt text lives in
//! [`crate::prompt`] and parsing in [`crate::parser`]. The chain builder
//! assembles the eight contracts in dependency order and validates them once
//! at startup.

use crate::errors::ChainValidationError;
use crate::record::{fields, Record};
use crate::taxonomy::CategoryTaxonomy;
use serde::{Deserialize, Serialize};

/// The eight fixed stages, in dependency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageName {
    /// Level 1: shopping category classification.
    ShoppingCategory,
    /// Level 2: shopping subcategory classification.
    ShoppingSubcategory,
    /// Level 3: item category classification.
    ItemCategory,
    /// Level 4: item subcategory classification.
    ItemSubcategory,
    /// Search keyword generation (exactly five phrases).
    SearchKeywords,
    /// Description search word generation (five to ten phrases).
    DescriptionSearchWords,
    /// Fixed-set attribute extraction.
    AiAttributes,
    /// Arabic translation of configured fields.
    ArabicTranslation,
}

impl StageName {
    /// All stages in dependency order.
    pub const ALL: [Self; 8] = [
        Self::ShoppingCategory,
        Self::ShoppingSubcategory,
        Self::ItemCategory,
        Self::ItemSubcategory,
        Self::SearchKeywords,
        Self::DescriptionSearchWords,
        Self::AiAttributes,
        Self::ArabicTranslation,
    ];

    /// Stable kebab-case name used in reports, events, and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ShoppingCategory => "shopping-category",
            Self::ShoppingSubcategory => "shopping-subcategory",
            Self::ItemCategory => "item-category",
            Self::ItemSubcategory => "item-subcategory",
            Self::SearchKeywords => "search-keywords",
            Self::DescriptionSearchWords => "description-search-words",
            Self::AiAttributes => "ai-attributes",
            Self::ArabicTranslation => "arabic-translation",
        }
    }

    /// Zero-based position in the dependency order.
    #[must_use]
    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|stage| *stage == self)
            .unwrap_or(0)
    }

    /// Parses a kebab-case stage name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == name.trim().to_lowercase())
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which configured model a stage generates with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    /// The classification/keyword model.
    #[default]
    Primary,
    /// The translation model.
    Translation,
}

/// How a classification stage's closed vocabulary is resolved.
///
/// Levels 2 through 4 key into the taxonomy with labels merged by earlier
/// stages; an unmapped path resolves to `None`, meaning the hierarchy has no
/// vocabulary there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VocabularySource {
    /// The level-1 shopping category list.
    ShoppingCategories,
    /// Level-2 subcategories under the record's shopping category.
    Subcategories,
    /// Level-3 item categories under the record's (category, subcategory).
    ItemCategories,
    /// Level-4 item subcategories under the record's (category, item category).
    ItemSubcategories,
}

impl VocabularySource {
    /// Resolves the allowed labels for a record's current path.
    #[must_use]
    pub fn resolve(self, taxonomy: &CategoryTaxonomy, record: &Record) -> Option<Vec<String>> {
        match self {
            Self::ShoppingCategories => Some(taxonomy.shopping_categories().to_vec()),
            Self::Subcategories => {
                let category = record.get_text(fields::SHOPPING_CATEGORY)?;
                taxonomy.subcategories_of(category).map(<[String]>::to_vec)
            }
            Self::ItemCategories => {
                let category = record.get_text(fields::SHOPPING_CATEGORY)?;
                let subcategory = record.get_text(fields::SHOPPING_SUBCATEGORY)?;
                taxonomy
                    .item_categories_of(category, subcategory)
                    .map(<[String]>::to_vec)
            }
            Self::ItemSubcategories => {
                let category = record.get_text(fields::SHOPPING_CATEGORY)?;
                let item_category = record.get_text(fields::ITEM_CATEGORY)?;
                taxonomy
                    .item_subcategories_of(category, item_category)
                    .map(<[String]>::to_vec)
            }
        }
    }
}

/// The shape a stage's raw response must parse into.
///
/// One tagged variant per output family, so each parser is an explicit
/// typed function instead of ad hoc string scanning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResponseSchema {
    /// A single label from a closed vocabulary plus a 0..=100 confidence.
    Label {
        /// Output field for the label.
        label_field: String,
        /// Output field for the confidence integer.
        confidence_field: String,
        /// Where the allowed labels come from.
        vocabulary: VocabularySource,
    },
    /// A comma-delimited phrase list with count and word bounds.
    KeywordList {
        /// Output field for the comma-joined list.
        field: String,
        /// Minimum phrase count, inclusive.
        min_phrases: usize,
        /// Maximum phrase count, inclusive.
        max_phrases: usize,
        /// Maximum words per phrase.
        max_words_per_phrase: usize,
        /// Record field whose value must lead the list, when set.
        lead_with_field: Option<String>,
    },
    /// The fixed-set `Name: value` attribute block.
    AttributeBlock {
        /// Output field for the normalized block.
        field: String,
    },
    /// Per-field Arabic translations.
    Translation {
        /// Record fields to translate; each produces `<field>_ar`.
        source_fields: Vec<String>,
    },
}

/// Static definition of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageContract {
    /// The stage this contract defines.
    pub name: StageName,
    /// Fields that must exist and be non-empty before the stage runs.
    pub required_inputs: Vec<String>,
    /// Fields the stage reads when present; absence is not a failure.
    pub optional_inputs: Vec<String>,
    /// Fields the stage merges into the record on success.
    pub produced_outputs: Vec<String>,
    /// The response shape and its parse rules.
    pub schema: ResponseSchema,
    /// Which configured model generates for this stage.
    pub role: ModelRole,
    /// Per-stage max output tokens; `None` uses the configured default.
    pub max_tokens: Option<u32>,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

impl StageContract {
    /// Level-1 shopping category classification.
    #[must_use]
    pub fn shopping_category() -> Self {
        Self {
            name: StageName::ShoppingCategory,
            required_inputs: owned(&[fields::ITEM_NAME]),
            optional_inputs: owned(&[fields::DESCRIPTION, fields::VENDOR_CATEGORY]),
            produced_outputs: owned(&[
                fields::SHOPPING_CATEGORY,
                fields::SHOPPING_CATEGORY_CONFIDENCE,
            ]),
            schema: ResponseSchema::Label {
                label_field: fields::SHOPPING_CATEGORY.to_string(),
                confidence_field: fields::SHOPPING_CATEGORY_CONFIDENCE.to_string(),
                vocabulary: VocabularySource::ShoppingCategories,
            },
            role: ModelRole::Primary,
            max_tokens: None,
        }
    }

    /// Level-2 shopping subcategory classification.
    #[must_use]
    pub fn shopping_subcategory() -> Self {
        Self {
            name: StageName::ShoppingSubcategory,
            required_inputs: owned(&[fields::SHOPPING_CATEGORY]),
            optional_inputs: owned(&[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
            ]),
            produced_outputs: owned(&[
                fields::SHOPPING_SUBCATEGORY,
                fields::SHOPPING_SUBCATEGORY_CONFIDENCE,
            ]),
            schema: ResponseSchema::Label {
                label_field: fields::SHOPPING_SUBCATEGORY.to_string(),
                confidence_field: fields::SHOPPING_SUBCATEGORY_CONFIDENCE.to_string(),
                vocabulary: VocabularySource::Subcategories,
            },
            role: ModelRole::Primary,
            max_tokens: None,
        }
    }

    /// Level-3 item category classification.
    #[must_use]
    pub fn item_category() -> Self {
        Self {
            name: StageName::ItemCategory,
            required_inputs: owned(&[fields::SHOPPING_CATEGORY, fields::SHOPPING_SUBCATEGORY]),
            optional_inputs: owned(&[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
            ]),
            produced_outputs: owned(&[fields::ITEM_CATEGORY, fields::ITEM_CATEGORY_CONFIDENCE]),
            schema: ResponseSchema::Label {
                label_field: fields::ITEM_CATEGORY.to_string(),
                confidence_field: fields::ITEM_CATEGORY_CONFIDENCE.to_string(),
                vocabulary: VocabularySource::ItemCategories,
            },
            role: ModelRole::Primary,
            max_tokens: None,
        }
    }

    /// Level-4 item subcategory classification.
    #[must_use]
    pub fn item_subcategory() -> Self {
        Self {
            name: StageName::ItemSubcategory,
            required_inputs: owned(&[
                fields::SHOPPING_CATEGORY,
                fields::SHOPPING_SUBCATEGORY,
                fields::ITEM_CATEGORY,
            ]),
            optional_inputs: owned(&[
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
            ]),
            produced_outputs: owned(&[
                fields::ITEM_SUBCATEGORY,
                fields::ITEM_SUBCATEGORY_CONFIDENCE,
            ]),
            schema: ResponseSchema::Label {
                label_field: fields::ITEM_SUBCATEGORY.to_string(),
                confidence_field: fields::ITEM_SUBCATEGORY_CONFIDENCE.to_string(),
                vocabulary: VocabularySource::ItemSubcategories,
            },
            role: ModelRole::Primary,
            max_tokens: None,
        }
    }

    /// Search keyword generation: exactly five phrases led by the item
    /// category.
    #[must_use]
    pub fn search_keywords() -> Self {
        Self {
            name: StageName::SearchKeywords,
            required_inputs: owned(&[fields::ITEM_CATEGORY]),
            optional_inputs: owned(&[fields::ITEM_NAME, fields::DESCRIPTION]),
            produced_outputs: owned(&[fields::SEARCH_KEYWORDS]),
            schema: ResponseSchema::KeywordList {
                field: fields::SEARCH_KEYWORDS.to_string(),
                min_phrases: 5,
                max_phrases: 5,
                max_words_per_phrase: 3,
                lead_with_field: Some(fields::ITEM_CATEGORY.to_string()),
            },
            role: ModelRole::Primary,
            max_tokens: None,
        }
    }

    /// Description search word generation: five to ten phrases.
    #[must_use]
    pub fn description_search_words() -> Self {
        Self {
            name: StageName::DescriptionSearchWords,
            required_inputs: owned(&[fields::ITEM_CATEGORY]),
            optional_inputs: owned(&[fields::ITEM_NAME, fields::DESCRIPTION]),
            produced_outputs: owned(&[fields::DESCRIPTION_SEARCH_WORDS]),
            schema: ResponseSchema::KeywordList {
                field: fields::DESCRIPTION_SEARCH_WORDS.to_string(),
                min_phrases: 5,
                max_phrases: 10,
                max_words_per_phrase: 3,
                lead_with_field: None,
            },
            role: ModelRole::Primary,
            max_tokens: None,
        }
    }

    /// Fixed-set attribute extraction.
    #[must_use]
    pub fn ai_attributes() -> Self {
        Self {
            name: StageName::AiAttributes,
            required_inputs: owned(&[fields::ITEM_NAME]),
            optional_inputs: owned(&[
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY,
                fields::SHOPPING_CATEGORY,
                fields::SHOPPING_SUBCATEGORY,
                fields::ITEM_CATEGORY,
            ]),
            produced_outputs: owned(&[fields::AI_ATTRIBUTES]),
            schema: ResponseSchema::AttributeBlock {
                field: fields::AI_ATTRIBUTES.to_string(),
            },
            role: ModelRole::Primary,
            // The 18-line block needs a larger budget than one-line replies.
            max_tokens: Some(300),
        }
    }

    /// Arabic translation of the configured source fields.
    ///
    /// An empty or missing source field yields an empty translation without
    /// a generation call, so this stage has no hard requirements.
    #[must_use]
    pub fn arabic_translation<I, S>(translate_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let source_fields: Vec<String> = translate_fields.into_iter().map(Into::into).collect();
        let produced_outputs = source_fields
            .iter()
            .map(|field| format!("{field}{}", fields::ARABIC_SUFFIX))
            .collect();
        Self {
            name: StageName::ArabicTranslation,
            required_inputs: Vec::new(),
            optional_inputs: source_fields.clone(),
            produced_outputs,
            schema: ResponseSchema::Translation { source_fields },
            role: ModelRole::Translation,
            max_tokens: None,
        }
    }

    /// Checks the contract's internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ChainValidationError`] if the contract produces nothing or
    /// reads one of its own outputs.
    pub fn validate(&self) -> Result<(), ChainValidationError> {
        if self.produced_outputs.is_empty() {
            return Err(ChainValidationError::new(format!(
                "stage '{}' produces no outputs",
                self.name
            ))
            .with_stages(vec![self.name.as_str().to_string()]));
        }
        for input in self.required_inputs.iter().chain(&self.optional_inputs) {
            if self.produced_outputs.contains(input) {
                return Err(ChainValidationError::new(format!(
                    "stage '{}' reads its own output '{input}'",
                    self.name
                ))
                .with_stages(vec![self.name.as_str().to_string()]));
            }
        }
        Ok(())
    }

    /// Every field the stage may read, required then optional.
    #[must_use]
    pub fn declared_inputs(&self) -> Vec<&str> {
        self.required_inputs
            .iter()
            .chain(&self.optional_inputs)
            .map(String::as_str)
            .collect()
    }
}
