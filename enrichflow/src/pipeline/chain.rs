//! The fixed eight-stage enrichment chain.
//!
//! A chain is an ordered list of stage contracts validated once at
//! startup: every stage's declared inputs must be producible by the base
//! input fields or an earlier stage, and no field may have two producers.
//! Per-request code never re-validates.

use crate::contract::{StageContract, StageName};
use crate::errors::ChainValidationError;
use crate::record::fields;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which stages of the chain a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StageSelection {
    /// Every stage in the chain.
    #[default]
    All,
    /// A single stage.
    Only {
        /// The stage to run.
        stage: StageName,
    },
    /// An inclusive range of stages in dependency order.
    Range {
        /// First stage to run.
        from: StageName,
        /// Last stage to run.
        to: StageName,
    },
}

impl StageSelection {
    /// Selects a single stage.
    #[must_use]
    pub const fn only(stage: StageName) -> Self {
        Self::Only { stage }
    }

    /// Selects an inclusive range of stages.
    #[must_use]
    pub const fn range(from: StageName, to: StageName) -> Self {
        Self::Range { from, to }
    }

    /// Whether `stage` falls inside the selection.
    #[must_use]
    pub fn matches(&self, stage: StageName) -> bool {
        match self {
            Self::All => true,
            Self::Only { stage: only } => *only == stage,
            Self::Range { from, to } => {
                (from.index()..=to.index()).contains(&stage.index())
            }
        }
    }
}

/// The validated, ordered list of stage contracts for one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentChain {
    contracts: Vec<StageContract>,
}

impl EnrichmentChain {
    /// The standard eight-stage chain, translating `item_name` and
    /// `description`.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_translate_fields([fields::ITEM_NAME, fields::DESCRIPTION])
    }

    /// The standard chain with a custom set of translation source fields.
    #[must_use]
    pub fn with_translate_fields<I, S>(translate_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            contracts: vec![
                StageContract::shopping_category(),
                StageContract::shopping_subcategory(),
                StageContract::item_category(),
                StageContract::item_subcategory(),
                StageContract::search_keywords(),
                StageContract::description_search_words(),
                StageContract::ai_attributes(),
                StageContract::arabic_translation(translate_fields),
            ],
        }
    }

    /// Builds a chain from explicit contracts, in dependency order.
    #[must_use]
    pub fn from_contracts(contracts: Vec<StageContract>) -> Self {
        Self { contracts }
    }

    /// Checks the chain's static dependency invariant.
    ///
    /// Every declared input (required and optional) of stage `i` must be a
    /// base input field or an output of a stage before `i`, and no output
    /// field may be produced twice.
    ///
    /// # Errors
    ///
    /// Returns [`ChainValidationError`] naming the offending stage.
    pub fn validate(&self) -> Result<(), ChainValidationError> {
        let mut available: HashSet<&str> = [
            fields::ITEM_NAME,
            fields::DESCRIPTION,
            fields::VENDOR_CATEGORY,
        ]
        .into_iter()
        .collect();

        for contract in &self.contracts {
            contract.validate()?;
            for input in contract.required_inputs.iter().chain(&contract.optional_inputs) {
                if !available.contains(input.as_str()) {
                    return Err(ChainValidationError::new(format!(
                        "stage '{}' reads '{input}', which no earlier stage produces",
                        contract.name
                    ))
                    .with_stages(vec![contract.name.as_str().to_string()]));
                }
            }
            for output in &contract.produced_outputs {
                if !available.insert(output.as_str()) {
                    return Err(ChainValidationError::new(format!(
                        "field '{output}' has two producers; second is stage '{}'",
                        contract.name
                    ))
                    .with_stages(vec![contract.name.as_str().to_string()]));
                }
            }
        }
        Ok(())
    }

    /// The contracts in dependency order.
    #[must_use]
    pub fn contracts(&self) -> &[StageContract] {
        &self.contracts
    }

    /// Looks up a stage's contract.
    #[must_use]
    pub fn get(&self, stage: StageName) -> Option<&StageContract> {
        self.contracts.iter().find(|contract| contract.name == stage)
    }

    /// Contracts matching a selection, in dependency order.
    #[must_use]
    pub fn select(&self, selection: &StageSelection) -> Vec<&StageContract> {
        self.contracts
            .iter()
            .filter(|contract| selection.matches(contract.name))
            .collect()
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    /// Whether the chain has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl Default for EnrichmentChain {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_chain_is_valid() {
        let chain = EnrichmentChain::standard();
        assert_eq!(chain.len(), 8);
        chain.validate().unwrap();
    }

    #[test]
    fn test_chain_order_matches_dependency_order() {
        let chain = EnrichmentChain::standard();
        let names: Vec<StageName> = chain.contracts().iter().map(|c| c.name).collect();
        assert_eq!(names, StageName::ALL.to_vec());
    }

    #[test]
    fn test_out_of_order_chain_fails_validation() {
        // Item category before shopping category reads unproduced fields.
        let chain = EnrichmentChain::from_contracts(vec![
            StageContract::item_category(),
            StageContract::shopping_category(),
        ]);
        let error = chain.validate().unwrap_err();
        assert!(error.message.contains("item-category"));
        assert_eq!(error.stages, vec!["item-category".to_string()]);
    }

    #[test]
    fn test_duplicate_producer_fails_validation() {
        let chain = EnrichmentChain::from_contracts(vec![
            StageContract::shopping_category(),
            StageContract::shopping_category(),
        ]);
        let error = chain.validate().unwrap_err();
        assert!(error.message.contains("two producers"));
    }

    #[test]
    fn test_typoed_translate_field_fails_validation() {
        let chain = EnrichmentChain::with_translate_fields(["item_nmae"]);
        assert!(chain.validate().is_err());
    }

    #[test]
    fn test_selection_matches() {
        assert!(StageSelection::All.matches(StageName::AiAttributes));

        let only = StageSelection::only(StageName::ItemCategory);
        assert!(only.matches(StageName::ItemCategory));
        assert!(!only.matches(StageName::ItemSubcategory));

        let range = StageSelection::range(StageName::ItemCategory, StageName::SearchKeywords);
        assert!(range.matches(StageName::ItemSubcategory));
        assert!(!range.matches(StageName::ShoppingCategory));
        assert!(!range.matches(StageName::DescriptionSearchWords));
    }

    #[test]
    fn test_select_preserves_dependency_order() {
        let chain = EnrichmentChain::standard();
        let selection = StageSelection::range(StageName::ItemCategory, StageName::AiAttributes);
        let selected = chain.select(&selection);
        assert_eq!(selected.len(), 5);
        assert_eq!(selected[0].name, StageName::ItemCategory);
        assert_eq!(selected[4].name, StageName::AiAttributes);
    }

    #[test]
    fn test_translation_chain_respects_custom_fields() {
        let chain = EnrichmentChain::with_translate_fields(["item_name"]);
        chain.validate().unwrap();
        let translation = chain.get(StageName::ArabicTranslation).unwrap();
        assert_eq!(translation.produced_outputs, vec!["item_name_ar".to_string()]);
    }
}
