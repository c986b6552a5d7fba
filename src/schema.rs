//! Target schemas custom fields are materialized on.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::CategoryItem;
use crate::registry::TypeRef;

/// Names a field is reachable under on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'a> {
    /// Internal name, the attribute key.
    pub name: &'a str,
    /// Alias callers may use instead of the internal name. May be empty.
    pub alias: &'a str,
}

/// A schema that accepts typed attributes.
///
/// Adding an attribute under an existing name replaces it.
pub trait TargetSchema {
    fn add_typed_attribute(&mut self, name: &str, type_ref: TypeRef);

    /// Wiring for `Category` fields; `items` are already ordered.
    fn apply_category_wiring(&mut self, binding: &Binding<'_>, items: &[CategoryItem]);

    /// Wiring for every other kind.
    fn apply_default_wiring(&mut self, _binding: &Binding<'_>) {}
}

/// A typed attribute of a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    /// Allowed values, set by category wiring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// In-memory schema of a class of documents.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    pub name: String,
    attributes: BTreeMap<String, Attribute>,
    /// alias → internal name
    accessors: BTreeMap<String, String>,
}

impl Schema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    /// Finds an attribute by internal name or alias.
    pub fn resolve(&self, key: &str) -> Option<&Attribute> {
        self.attributes.get(key).or_else(|| {
            self.accessors
                .get(key)
                .and_then(|name| self.attributes.get(name))
        })
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    pub fn accessors(&self) -> &BTreeMap<String, String> {
        &self.accessors
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    fn register_accessor(&mut self, binding: &Binding<'_>) {
        if binding.alias.is_empty() || binding.alias == binding.name {
            return;
        }
        if let Some(previous) = self
            .accessors
            .insert(binding.alias.to_string(), binding.name.to_string())
        {
            if previous != binding.name {
                tracing::warn!(
                    schema = %self.name,
                    alias = %binding.alias,
                    previous = %previous,
                    name = %binding.name,
                    "Alias rebound to another attribute"
                );
            }
        }
    }
}

impl TargetSchema for Schema {
    fn add_typed_attribute(&mut self, name: &str, type_ref: TypeRef) {
        self.attributes.insert(
            name.to_string(),
            Attribute {
                name: name.to_string(),
                type_ref,
                options: None,
            },
        );
    }

    fn apply_category_wiring(&mut self, binding: &Binding<'_>, items: &[CategoryItem]) {
        self.register_accessor(binding);
        if let Some(attribute) = self.attributes.get_mut(binding.name) {
            attribute.options = Some(items.iter().map(|item| item.name.clone()).collect());
        }
    }

    fn apply_default_wiring(&mut self, binding: &Binding<'_>) {
        self.register_accessor(binding);
    }
}
