//! Definition files describing a parent and its custom fields.

use serde::{Deserialize, Serialize};

use super::category::CategoryItem;

/// A parent declared in a definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Definition {
    /// Parent name (e.g., "Article").
    pub name: String,
    /// Association the fields are grouped under; config default if absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<String>,
    /// Last counter value already handed out, for fields named earlier.
    #[serde(default)]
    pub counter: u64,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

/// A field declared in a definition file.
///
/// `label` and `kind` default to empty so that omissions surface as
/// validation issues rather than parse errors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldDefinition {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Internal name assigned earlier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<CategoryItem>,
}
