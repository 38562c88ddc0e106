//! Canned inputs and replies for pipeline tests.

use crate::contract::StageName;
use crate::record::ItemInput;

/// The standard test item.
#[must_use]
pub fn sample_item() -> ItemInput {
    ItemInput::new(
        "Cotton T-Shirt",
        "Comfortable casual cotton t-shirt for men",
        "Clothing",
    )
}

/// A well-formed reply for each stage, following the builtin taxonomy path
/// `fashion -> casual wear -> top -> t-shirt` for [`sample_item`].
///
/// The translation stage reply is a single translated field; queue it once
/// per non-empty source field.
#[must_use]
pub fn canned_reply(stage: StageName) -> String {
    match stage {
        StageName::ShoppingCategory => "fashion|confidence:95%".to_string(),
        StageName::ShoppingSubcategory => "casual wear|confidence:93%".to_string(),
        StageName::ItemCategory => "top|confidence:91%".to_string(),
        StageName::ItemSubcategory => "t-shirt|confidence:90%".to_string(),
        StageName::SearchKeywords => {
            "top, cotton top, casual top, summer top, printed top".to_string()
        }
        StageName::DescriptionSearchWords => {
            "top, cotton top, casual top, breathable top, summer top, soft top".to_string()
        }
        StageName::AiAttributes => "Gender: Men\n\
             Age: Adult\n\
             Brand:\n\
             Generic Name: top\n\
             Product Name: Cotton Tee\n\
             Size:\n\
             Measurements:\n\
             Features: breathable\n\
             Types of Fashion Styles: casual\n\
             Gem Stones:\n\
             Birth Stones:\n\
             Material: cotton\n\
             Color:\n\
             Pattern: solid\n\
             Occasion: daily wear\n\
             Activity:\n\
             Season: summer\n\
             Country of origin:"
            .to_string(),
        StageName::ArabicTranslation => "قميص قطني مريح".to_string(),
    }
}
