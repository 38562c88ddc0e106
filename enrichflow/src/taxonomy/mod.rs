//! Category hierarchy reference data.
//!
//! Four levels: shopping category, shopping subcategory, item category, item
//! subcategory. Classification stages bound their closed vocabularies with
//! these lookups. Level 3 is keyed by (category, subcategory); level 4 by
//! (category, item category), matching the upstream hierarchy tables.

mod data;

use crate::errors::EnrichError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only lookup over the four-level category hierarchy.
///
/// Keys are stored and matched lowercase. A missing path returns `None`,
/// which classification stages treat as "no vocabulary for this path".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTaxonomy {
    /// Level 1: the closed set of shopping categories.
    shopping_categories: Vec<String>,
    /// Level 2: subcategories per shopping category.
    subcategories: HashMap<String, Vec<String>>,
    /// Level 3: item categories per (shopping category, subcategory).
    item_categories: HashMap<String, HashMap<String, Vec<String>>>,
    /// Level 4: item subcategories per (shopping category, item category).
    item_subcategories: HashMap<String, HashMap<String, Vec<String>>>,
}

fn norm(key: &str) -> String {
    key.trim().to_lowercase()
}

impl CategoryTaxonomy {
    /// Creates an empty taxonomy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in hierarchy snapshot.
    #[must_use]
    pub fn builtin() -> Self {
        data::builtin()
    }

    /// Loads a taxonomy from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the JSON does not match the
    /// four-level shape.
    pub fn from_json_str(json: &str) -> Result<Self, EnrichError> {
        let taxonomy: Self = serde_json::from_str(json)?;
        Ok(taxonomy)
    }

    /// Sets the level-1 shopping categories.
    #[must_use]
    pub fn with_shopping_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shopping_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Adds the level-2 subcategories for one shopping category.
    pub fn add_subcategories<I, S>(&mut self, category: &str, subcategories: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subcategories.insert(
            norm(category),
            subcategories.into_iter().map(Into::into).collect(),
        );
    }

    /// Adds the level-3 item categories for one (category, subcategory) path.
    pub fn add_item_categories<I, S>(&mut self, category: &str, subcategory: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_categories
            .entry(norm(category))
            .or_default()
            .insert(norm(subcategory), items.into_iter().map(Into::into).collect());
    }

    /// Adds the level-4 item subcategories for one (category, item category)
    /// path.
    pub fn add_item_subcategories<I, S>(&mut self, category: &str, item_category: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_subcategories
            .entry(norm(category))
            .or_default()
            .insert(
                norm(item_category),
                items.into_iter().map(Into::into).collect(),
            );
    }

    /// The closed set of level-1 shopping categories.
    #[must_use]
    pub fn shopping_categories(&self) -> &[String] {
        &self.shopping_categories
    }

    /// Valid subcategories under a shopping category.
    #[must_use]
    pub fn subcategories_of(&self, category: &str) -> Option<&[String]> {
        self.subcategories.get(&norm(category)).map(Vec::as_slice)
    }

    /// Valid item categories under a (category, subcategory) path.
    #[must_use]
    pub fn item_categories_of(&self, category: &str, subcategory: &str) -> Option<&[String]> {
        self.item_categories
            .get(&norm(category))
            .and_then(|by_subcat| by_subcat.get(&norm(subcategory)))
            .map(Vec::as_slice)
    }

    /// Valid item subcategories under a (category, item category) path.
    #[must_use]
    pub fn item_subcategories_of(&self, category: &str, item_category: &str) -> Option<&[String]> {
        self.item_subcategories
            .get(&norm(category))
            .and_then(|by_item| by_item.get(&norm(item_category)))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_levels_connect() {
        let taxonomy = CategoryTaxonomy::builtin();
        assert!(taxonomy
            .shopping_categories()
            .iter()
            .any(|c| c == "fashion"));

        let subcats = taxonomy.subcategories_of("fashion").unwrap();
        assert!(subcats.iter().any(|s| s == "casual wear"));

        let items = taxonomy.item_categories_of("fashion", "casual wear").unwrap();
        assert!(items.iter().any(|i| i == "top"));
        assert!(items.iter().any(|i| i == "t-shirt"));

        let subitems = taxonomy.item_subcategories_of("fashion", "top").unwrap();
        assert!(subitems.iter().any(|s| s == "t-shirt"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let taxonomy = CategoryTaxonomy::builtin();
        assert!(taxonomy.subcategories_of("Fashion").is_some());
        assert!(taxonomy.item_categories_of("FASHION", "Casual Wear").is_some());
    }

    #[test]
    fn test_unmapped_path_returns_none() {
        let taxonomy = CategoryTaxonomy::builtin();
        // Level 3 has no tables for restaurants in the snapshot.
        assert!(taxonomy.item_categories_of("restaurants", "pizza").is_none());
        assert!(taxonomy.subcategories_of("nonexistent").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let mut taxonomy = CategoryTaxonomy::new().with_shopping_categories(["fashion"]);
        taxonomy.add_subcategories("fashion", ["casual wear"]);
        taxonomy.add_item_categories("fashion", "casual wear", ["top"]);
        taxonomy.add_item_subcategories("fashion", "top", ["t-shirt"]);

        let json = serde_json::to_string(&taxonomy).unwrap();
        let loaded = CategoryTaxonomy::from_json_str(&json).unwrap();
        assert_eq!(
            loaded.item_subcategories_of("fashion", "top"),
            Some(["t-shirt".to_string()].as_slice())
        );
    }

    #[test]
    fn test_from_json_str_rejects_wrong_shape() {
        let result = CategoryTaxonomy::from_json_str("{\"shopping_categories\": 3}");
        assert!(result.is_err());
    }
}
