//! Name → type registry used to resolve non-base field kinds.
//!
//! The registry is populated once at startup (built-ins plus the `[[types]]`
//! entries of the configuration) and is read-only afterwards.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TypeEntry;

/// Physical representation an attribute is stored with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Json,
}

impl StorageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageType::Text => "text",
            StorageType::Integer => "integer",
            StorageType::Float => "float",
            StorageType::Boolean => "boolean",
            StorageType::Date => "date",
            StorageType::DateTime => "date_time",
            StorageType::Json => "json",
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(StorageType::Text),
            "integer" => Ok(StorageType::Integer),
            "float" => Ok(StorageType::Float),
            "boolean" => Ok(StorageType::Boolean),
            "date" => Ok(StorageType::Date),
            "date_time" => Ok(StorageType::DateTime),
            "json" => Ok(StorageType::Json),
            _ => Err(format!(
                "Invalid storage type '{}'. Valid values: text, integer, float, boolean, date, date_time, json",
                s
            )),
        }
    }
}

/// A concrete type an attribute can be declared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    /// Registered type name (e.g., "String", "Date", "Rating").
    pub name: String,
    pub storage: StorageType,
}

/// Name of the generic text type the base kinds resolve to.
pub const TEXT_TYPE_NAME: &str = "String";

impl TypeRef {
    pub fn new(name: &str, storage: StorageType) -> Self {
        Self {
            name: name.to_string(),
            storage,
        }
    }

    /// The generic text/string storage type.
    pub fn text() -> Self {
        Self::new(TEXT_TYPE_NAME, StorageType::Text)
    }
}

/// Registry of concrete types addressable by name from a field's `kind`.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeRef>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (name, storage) in [
            (TEXT_TYPE_NAME, StorageType::Text),
            ("Integer", StorageType::Integer),
            ("Float", StorageType::Float),
            ("Boolean", StorageType::Boolean),
            ("Date", StorageType::Date),
            ("DateTime", StorageType::DateTime),
            ("Hash", StorageType::Json),
        ] {
            registry.register(name, storage);
        }
        registry
    }

    /// Creates a registry with the built-ins plus configured entries.
    ///
    /// Configured entries replace built-ins of the same name.
    pub fn from_entries(entries: &[TypeEntry]) -> Self {
        let mut registry = Self::with_builtins();
        for entry in entries {
            registry.register(&entry.name, entry.storage);
        }
        registry
    }

    /// Registers (or replaces) a type under `name`.
    pub fn register(&mut self, name: &str, storage: StorageType) -> &mut Self {
        self.types
            .insert(name.to_string(), TypeRef::new(name, storage));
        self
    }

    /// Looks up a type by its exact name.
    pub fn lookup(&self, name: &str) -> Option<TypeRef> {
        self.types.get(name).cloned()
    }

    /// Iterates registered types in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
