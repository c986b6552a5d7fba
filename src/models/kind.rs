//! Field kinds: the built-in base kinds plus registry-resolved extensions.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of kinds every application understands.
///
/// All three are stored as plain text; `Category` additionally gets
/// category wiring on the target schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseKind {
    String,
    Text,
    Category,
}

impl BaseKind {
    /// Returns a static slice of all base kinds.
    pub fn all() -> &'static [BaseKind] {
        &[BaseKind::String, BaseKind::Text, BaseKind::Category]
    }

    /// The name used in field declarations.
    pub fn as_str(&self) -> &'static str {
        match self {
            BaseKind::String => "String",
            BaseKind::Text => "Text",
            BaseKind::Category => "Category",
        }
    }
}

impl std::fmt::Display for BaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BaseKind {
    type Err = String;

    /// Matching is exact: `"string"` is not a base kind, it names a custom type.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(BaseKind::String),
            "Text" => Ok(BaseKind::Text),
            "Category" => Ok(BaseKind::Category),
            _ => Err(format!(
                "Invalid base kind '{}'. Valid values: String, Text, Category",
                s
            )),
        }
    }
}

/// A parsed, non-empty field kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Base(BaseKind),
    /// Names a concrete type that must be found in the type registry.
    Custom(String),
}

impl FieldKind {
    /// Parses a declared kind. Returns `None` for an empty declaration.
    pub fn parse(kind: &str) -> Option<Self> {
        if kind.is_empty() {
            return None;
        }
        Some(match kind.parse::<BaseKind>() {
            Ok(base) => FieldKind::Base(base),
            Err(_) => FieldKind::Custom(kind.to_string()),
        })
    }

    /// Post-processing hook this kind dispatches to after the attribute is added.
    pub fn wiring(&self) -> Wiring {
        match self {
            FieldKind::Base(BaseKind::Category) => Wiring::Category,
            _ => Wiring::Default,
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Base(base) => base.fmt(f),
            FieldKind::Custom(name) => f.write_str(name),
        }
    }
}

/// Kind-specific post-processing applied to a target schema.
///
/// New kinds that need extra wiring add a variant here and a method on
/// [`crate::schema::TargetSchema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wiring {
    Default,
    Category,
}
