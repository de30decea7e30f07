//! Clothing item data structure
//!
//! An item is created by its owner via upload and carries denormalized owner
//! display fields so a card can be rendered without a second lookup.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// A clothing item in a user's closet.
///
/// Snapshots of this struct are embedded in matches, likes and requests;
/// those copies are not updated automatically when the owner edits the item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClothingItem {
    pub id: Uuid,
    /// Owning user. Always threaded through item operations; ownership is
    /// never resolved by scanning user documents.
    pub user_id: Uuid,
    pub user_name: String,
    pub user_avatar: String,
    pub image_urls: Vec<String>,
    pub category: String,
    pub color: String,
    /// Ordered, deduplicated style tags.
    #[serde(rename = "style_tags")]
    pub style_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Estimated secondhand price, whole currency units.
    pub estimated_price: i64,
}

/// Fields a user submits when uploading or editing an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub image_urls: Vec<String>,
    pub category: String,
    pub color: String,
    #[serde(rename = "style_tags")]
    pub style_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub estimated_price: i64,
}

impl ItemFields {
    /// Validate user-submitted form fields. Failures block submission.
    pub fn validate(&self) -> Result<(), SharedError> {
        if self.category.trim().is_empty() {
            return Err(SharedError::validation("category", "category cannot be empty"));
        }
        if self.color.trim().is_empty() {
            return Err(SharedError::validation("color", "color cannot be empty"));
        }
        if self.estimated_price < 0 {
            return Err(SharedError::validation(
                "estimatedPrice",
                "estimated price cannot be negative",
            ));
        }
        Ok(())
    }

    /// Build the full item for `owner`, stamping a fresh id and the
    /// denormalized owner display fields.
    pub fn into_item(self, owner_id: Uuid, owner_name: &str, owner_avatar: &str) -> ClothingItem {
        let mut style_tags = Vec::with_capacity(self.style_tags.len());
        for tag in self.style_tags {
            if !style_tags.contains(&tag) {
                style_tags.push(tag);
            }
        }
        ClothingItem {
            id: Uuid::new_v4(),
            user_id: owner_id,
            user_name: owner_name.to_string(),
            user_avatar: owner_avatar.to_string(),
            image_urls: self.image_urls,
            category: self.category,
            color: self.color,
            style_tags,
            description: self.description,
            estimated_price: self.estimated_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> ItemFields {
        ItemFields {
            image_urls: vec!["https://img.example/1.jpg".into()],
            category: "Jacket".into(),
            color: "Brown".into(),
            style_tags: vec!["Vintage".into(), "Biker".into(), "Vintage".into()],
            description: None,
            estimated_price: 2500,
        }
    }

    #[test]
    fn test_validate_rejects_empty_category() {
        let mut f = fields();
        f.category = "  ".into();
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price() {
        let mut f = fields();
        f.estimated_price = -1;
        assert!(f.validate().is_err());
    }

    #[test]
    fn test_into_item_dedups_tags_and_stamps_owner() {
        let owner = Uuid::new_v4();
        let item = fields().into_item(owner, "David", "https://img.example/a.jpg");
        assert_eq!(item.user_id, owner);
        assert_eq!(item.user_name, "David");
        assert_eq!(item.style_tags, vec!["Vintage".to_string(), "Biker".to_string()]);
    }

    #[test]
    fn test_wire_format_field_names() {
        let item = fields().into_item(Uuid::new_v4(), "D", "a");
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("userId").is_some());
        assert!(json.get("imageUrls").is_some());
        // style_tags keeps its historical snake_case name in documents
        assert!(json.get("style_tags").is_some());
        assert!(json.get("estimatedPrice").is_some());
    }
}
