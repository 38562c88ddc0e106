//! Product records and their accumulated field state.
//!
//! A [`Record`] is one item moving through the pipeline: the base fields it
//! arrived with plus every field merged by completed stages, in merge order.
//! Fields are write-once; a second write to the same name is a
//! [`FieldConflictError`], which signals a chain contract bug rather than a
//! data condition to repair.

use crate::errors::FieldConflictError;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Canonical field names used across stage contracts.
pub mod fields {
    /// The product's display name (base field).
    pub const ITEM_NAME: &str = "item_name";
    /// The product's free-text description (base field).
    pub const DESCRIPTION: &str = "description";
    /// The vendor-supplied category/department label (base field).
    pub const VENDOR_CATEGORY: &str = "vendor_category";
    /// Top-level shopping category label.
    pub const SHOPPING_CATEGORY: &str = "shopping_category";
    /// Confidence for the shopping category, 0..=100.
    pub const SHOPPING_CATEGORY_CONFIDENCE: &str = "shopping_category_confidence";
    /// Shopping subcategory label.
    pub const SHOPPING_SUBCATEGORY: &str = "shopping_subcategory";
    /// Confidence for the shopping subcategory, 0..=100.
    pub const SHOPPING_SUBCATEGORY_CONFIDENCE: &str = "shopping_subcategory_confidence";
    /// Item category label.
    pub const ITEM_CATEGORY: &str = "item_category";
    /// Confidence for the item category, 0..=100.
    pub const ITEM_CATEGORY_CONFIDENCE: &str = "item_category_confidence";
    /// Item subcategory label.
    pub const ITEM_SUBCATEGORY: &str = "item_subcategory";
    /// Confidence for the item subcategory, 0..=100.
    pub const ITEM_SUBCATEGORY_CONFIDENCE: &str = "item_subcategory_confidence";
    /// Comma-joined search keyword phrases (exactly five).
    pub const SEARCH_KEYWORDS: &str = "search_keywords";
    /// Comma-joined description search word phrases (five to ten).
    pub const DESCRIPTION_SEARCH_WORDS: &str = "description_search_words";
    /// The normalized attribute block, one `Name: value` line per attribute.
    pub const AI_ATTRIBUTES: &str = "ai_attributes";
    /// Suffix appended to a source field name for its Arabic translation.
    pub const ARABIC_SUFFIX: &str = "_ar";
}

/// Identity of a record within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKey {
    /// Slot index in a batch; also the output order key.
    Row(usize),
    /// Item name, used in single-item mode.
    Item(String),
}

impl std::fmt::Display for RecordKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Row(index) => write!(f, "row {index}"),
            Self::Item(name) => write!(f, "item '{name}'"),
        }
    }
}

/// A single field value: free text or an integer (confidence scores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// An integer value, e.g. a confidence score.
    Integer(i64),
    /// A text value.
    Text(String),
}

impl FieldValue {
    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// The text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    /// The integer content, if this is an integer value.
    #[must_use]
    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether the value is empty for dependency purposes.
    ///
    /// Only whitespace-free empty text counts as empty; integers never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Integer(_) => false,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

/// The base fields one item arrives with.
///
/// Field aliases accept the upstream export's original column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInput {
    /// The product's display name.
    #[serde(alias = "Item (EN)")]
    pub item_name: String,
    /// The product's free-text description.
    #[serde(alias = "Description (EN)", default)]
    pub description: String,
    /// The vendor-supplied category/department label.
    #[serde(alias = "Category/Department (EN)", default)]
    pub vendor_category: String,
}

impl ItemInput {
    /// Creates a new item input.
    #[must_use]
    pub fn new(
        item_name: impl Into<String>,
        description: impl Into<String>,
        vendor_category: impl Into<String>,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            description: description.into(),
            vendor_category: vendor_category.into(),
        }
    }
}

/// One product item's accumulated field state.
///
/// Fields keep their merge order. Mutation happens only through
/// [`Record::insert`] and [`Record::merge`], which enforce write-once.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: RecordKey,
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Creates a record from one item's base fields.
    #[must_use]
    pub fn from_input(key: RecordKey, input: &ItemInput) -> Self {
        let fields = vec![
            (
                fields::ITEM_NAME.to_string(),
                FieldValue::text(&input.item_name),
            ),
            (
                fields::DESCRIPTION.to_string(),
                FieldValue::text(&input.description),
            ),
            (
                fields::VENDOR_CATEGORY.to_string(),
                FieldValue::text(&input.vendor_category),
            ),
        ];
        Self { key, fields }
    }

    /// This record's identity.
    #[must_use]
    pub const fn key(&self) -> &RecordKey {
        &self.key
    }

    /// Looks up a field value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Looks up a text field by name.
    #[must_use]
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    /// Whether a field exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether a field exists and is non-empty.
    ///
    /// This is the dependency-check predicate: a stage's required input must
    /// satisfy it before the stage may run.
    #[must_use]
    pub fn has_nonempty(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }

    /// Writes a new field.
    ///
    /// # Errors
    ///
    /// Returns [`FieldConflictError`] if the field already exists, even with
    /// an empty value.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Result<(), FieldConflictError> {
        let name = name.into();
        if self.contains(&name) {
            return Err(FieldConflictError::new(name));
        }
        self.fields.push((name, value.into()));
        Ok(())
    }

    /// Writes a set of produced fields in order.
    ///
    /// Nothing is written if any name conflicts; the merge is all-or-nothing
    /// so a failed stage cannot leave half its outputs behind.
    ///
    /// # Errors
    ///
    /// Returns [`FieldConflictError`] naming the first conflicting field.
    pub fn merge(
        &mut self,
        produced: Vec<(String, FieldValue)>,
    ) -> Result<Vec<String>, FieldConflictError> {
        for (name, _) in &produced {
            if self.contains(name) {
                return Err(FieldConflictError::new(name.clone()));
            }
        }
        let mut merged = Vec::with_capacity(produced.len());
        for (name, value) in produced {
            merged.push(name.clone());
            self.fields.push((name, value));
        }
        Ok(merged)
    }

    /// Field names in merge order.
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Iterates fields in merge order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    /// Serializes as a flat field map in merge order. The key travels on the
    /// surrounding outcome, not inside the map.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_input() -> ItemInput {
        ItemInput::new(
            "Cotton T-Shirt",
            "Soft breathable cotton t-shirt for everyday wear",
            "Apparel",
        )
    }

    #[test]
    fn test_record_starts_with_base_fields_in_order() {
        let record = Record::from_input(RecordKey::Row(0), &sample_input());
        assert_eq!(
            record.field_names(),
            vec![
                fields::ITEM_NAME,
                fields::DESCRIPTION,
                fields::VENDOR_CATEGORY
            ]
        );
        assert_eq!(record.get_text(fields::ITEM_NAME), Some("Cotton T-Shirt"));
    }

    #[test]
    fn test_insert_conflict_on_rewrite() {
        let mut record = Record::from_input(RecordKey::Row(0), &sample_input());
        record
            .insert(fields::SHOPPING_CATEGORY, "fashion")
            .unwrap();

        let result = record.insert(fields::SHOPPING_CATEGORY, "electronics");
        assert!(result.is_err());
        assert_eq!(record.get_text(fields::SHOPPING_CATEGORY), Some("fashion"));
    }

    #[test]
    fn test_merge_is_all_or_nothing() {
        let mut record = Record::from_input(RecordKey::Row(0), &sample_input());
        record.insert("a", "1").unwrap();

        let result = record.merge(vec![
            ("b".to_string(), FieldValue::text("2")),
            ("a".to_string(), FieldValue::text("3")),
        ]);
        assert!(result.is_err());
        assert!(!record.contains("b"));
    }

    #[test]
    fn test_merge_returns_names_in_order() {
        let mut record = Record::from_input(RecordKey::Row(1), &sample_input());
        let merged = record
            .merge(vec![
                (
                    fields::SHOPPING_CATEGORY.to_string(),
                    FieldValue::text("fashion"),
                ),
                (
                    fields::SHOPPING_CATEGORY_CONFIDENCE.to_string(),
                    FieldValue::Integer(92),
                ),
            ])
            .unwrap();
        assert_eq!(
            merged,
            vec![
                fields::SHOPPING_CATEGORY.to_string(),
                fields::SHOPPING_CATEGORY_CONFIDENCE.to_string()
            ]
        );
    }

    #[test]
    fn test_has_nonempty_semantics() {
        let mut record = Record::from_input(
            RecordKey::Row(0),
            &ItemInput::new("Ring", "", "Jewellery"),
        );
        assert!(record.has_nonempty(fields::ITEM_NAME));
        assert!(!record.has_nonempty(fields::DESCRIPTION));
        assert!(!record.has_nonempty(fields::SHOPPING_CATEGORY));

        record.insert("confidence", 0i64).unwrap();
        assert!(record.has_nonempty("confidence"));
    }

    #[test]
    fn test_serializes_as_flat_map_in_merge_order() {
        let mut record = Record::from_input(RecordKey::Row(0), &sample_input());
        record.insert(fields::SHOPPING_CATEGORY, "fashion").unwrap();
        record
            .insert(fields::SHOPPING_CATEGORY_CONFIDENCE, 88i64)
            .unwrap();

        let json = serde_json::to_string(&record).unwrap();
        let name_pos = json.find("item_name").unwrap();
        let category_pos = json.find("shopping_category").unwrap();
        assert!(name_pos < category_pos);
        assert!(json.contains("\"shopping_category_confidence\":88"));
    }

    #[test]
    fn test_item_input_accepts_original_column_headers() {
        let input: ItemInput = serde_json::from_str(
            r#"{"Item (EN)": "Gold Necklace", "Description (EN)": "18k gold", "Category/Department (EN)": "Jewellery"}"#,
        )
        .unwrap();
        assert_eq!(input.item_name, "Gold Necklace");
        assert_eq!(input.vendor_category, "Jewellery");
    }

    #[test]
    fn test_record_key_display() {
        assert_eq!(RecordKey::Row(4).to_string(), "row 4");
        assert_eq!(
            RecordKey::Item("Cotton T-Shirt".to_string()).to_string(),
            "item 'Cotton T-Shirt'"
        );
    }
}
