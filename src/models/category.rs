//! Category items: the selectable values of a `Category` field.

use serde::{Deserialize, Serialize};

use super::generate_ulid;

/// One selectable value of a `Category` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryItem {
    /// Unique identifier (ULID).
    #[serde(default = "generate_ulid")]
    pub id: String,
    /// Display value (e.g., "News", "Opinion").
    pub name: String,
    /// Ordering hint among the field's items.
    #[serde(default)]
    pub position: i32,
}

impl CategoryItem {
    /// Creates a new item with a generated ULID.
    pub fn new(name: impl Into<String>, position: i32) -> Self {
        Self {
            id: generate_ulid(),
            name: name.into(),
            position,
        }
    }
}

/// Returns the items sorted by position, keeping declaration order for ties.
pub fn ordered_items(items: &[CategoryItem]) -> Vec<CategoryItem> {
    let mut ordered = items.to_vec();
    ordered.sort_by_key(|item| item.position);
    ordered
}
