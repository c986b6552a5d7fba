//! Field descriptor: a runtime-declared, typed custom field of a parent.
//!
//! A descriptor goes through `validate` → `ensure_internal_name` → `apply`.
//! Validation failures are collected and returned, never raised. `apply`
//! on an invalid descriptor does nothing and reports
//! [`ApplyOutcome::Skipped`]; callers that need a hard failure must check
//! the outcome. Only an unknown kind or a foreign parent is an error.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use super::category::{ordered_items, CategoryItem};
use super::kind::{BaseKind, FieldKind, Wiring};
use super::parameterize;
use crate::error::{FieldError, ValidationError, ValidationErrors};
use crate::parent::ParentContext;
use crate::registry::{TypeRef, TypeRegistry};
use crate::schema::{Binding, TargetSchema};

/// Prefix of generated internal names (`custom_field_1`, `custom_field_2`, ...).
pub const INTERNAL_NAME_PREFIX: &str = "custom_field_";

/// Generates a new ULID string.
pub fn generate_ulid() -> String {
    Ulid::new().to_string()
}

/// Non-owning reference to the parent a descriptor belongs to.
///
/// The parent itself is passed to each operation; this only records which
/// parent and association the descriptor is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentRef {
    pub parent_id: String,
    /// Name of the collection on the parent (e.g., "custom_fields").
    pub association: String,
}

impl ParentRef {
    pub fn new(parent_id: impl Into<String>, association: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            association: association.into(),
        }
    }
}

/// A custom field declared on a parent at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Unique identifier (ULID).
    pub id: String,
    /// Human-readable display name. Unique among siblings.
    pub label: String,
    /// Declared kind: a base kind or the name of a registered type.
    pub kind: String,
    /// Ordering hint among siblings.
    #[serde(default)]
    pub position: i32,
    pub parent_ref: ParentRef,
    /// Selectable values, only meaningful for `Category` fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub category_items: Vec<CategoryItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    internal_name: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    alias: String,
}

/// What `apply` did to the target schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied(AppliedField),
    /// The descriptor failed validation; the target was not touched.
    Skipped(ValidationErrors),
}

impl ApplyOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ApplyOutcome::Applied(_))
    }
}

/// Attribute added to a target by a successful `apply`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedField {
    pub id: String,
    pub name: String,
    pub alias: String,
    pub type_ref: TypeRef,
    #[serde(skip)]
    pub wiring: Wiring,
}

impl FieldDescriptor {
    /// Creates a new descriptor with a generated ULID.
    pub fn new(parent_ref: ParentRef, label: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: generate_ulid(),
            label: label.into(),
            kind: kind.into(),
            position: 0,
            parent_ref,
            category_items: Vec::new(),
            internal_name: None,
            alias: String::new(),
        }
    }

    pub fn with_position(mut self, position: i32) -> Self {
        self.position = position;
        self
    }

    /// Explicit alias override; normalized on the next `safe_alias`.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Restores an internal name assigned earlier (e.g., loaded from storage).
    pub fn with_internal_name(mut self, name: impl Into<String>) -> Self {
        self.internal_name = Some(name.into());
        self
    }

    pub fn with_category_items(mut self, items: Vec<CategoryItem>) -> Self {
        self.category_items = items;
        self
    }

    pub fn internal_name(&self) -> Option<&str> {
        self.internal_name.as_deref()
    }

    /// Current alias as stored, without computing it.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn set_alias(&mut self, alias: impl Into<String>) {
        self.alias = alias.into();
    }

    /// Parsed kind, `None` if the declaration is empty.
    pub fn field_kind(&self) -> Option<FieldKind> {
        FieldKind::parse(&self.kind)
    }

    pub fn is_kind(&self, kind: BaseKind) -> bool {
        self.kind == kind.as_str()
    }

    pub fn is_string(&self) -> bool {
        self.is_kind(BaseKind::String)
    }

    pub fn is_text(&self) -> bool {
        self.is_kind(BaseKind::Text)
    }

    pub fn is_category(&self) -> bool {
        self.is_kind(BaseKind::Category)
    }

    /// Category items sorted by position.
    pub fn ordered_category_items(&self) -> Vec<CategoryItem> {
        ordered_items(&self.category_items)
    }

    /// Checks presence of label and kind, and label uniqueness among the
    /// siblings `parent` reports for this descriptor's association.
    pub fn validate<P: ParentContext + ?Sized>(&self, parent: &P) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.label.is_empty() {
            errors.push(ValidationError::MissingLabel);
        }
        if self.kind.is_empty() {
            errors.push(ValidationError::MissingKind);
        }

        if !self.label.is_empty() {
            let duplicate = parent
                .siblings(&self.parent_ref.association)
                .iter()
                .any(|f| f.label == self.label && f.id != self.id);
            if duplicate {
                errors.push(ValidationError::DuplicateLabel {
                    label: self.label.clone(),
                });
            }
        }

        errors.into_result()
    }

    /// Maps the declared kind to the type the attribute is stored with.
    ///
    /// Base kinds are plain text; anything else must be registered. A blank
    /// kind only reaches here on an unvalidated descriptor.
    pub fn resolve_storage_type(&self, registry: &TypeRegistry) -> Result<TypeRef, FieldError> {
        match self.field_kind() {
            Some(FieldKind::Base(_)) => Ok(TypeRef::text()),
            Some(FieldKind::Custom(name)) => registry
                .lookup(&name)
                .ok_or(FieldError::UnknownKind(name)),
            None => Err(FieldError::BlankKind),
        }
    }

    /// Returns the internal name, generating `custom_field_<n>` on first call.
    ///
    /// Generation consumes one tick of the parent's counter for this
    /// descriptor's association; later calls never touch the counter.
    pub fn ensure_internal_name<P: ParentContext + ?Sized>(
        &mut self,
        parent: &P,
    ) -> Result<&str, FieldError> {
        self.check_parent(parent)?;

        let id = &self.id;
        let association = &self.parent_ref.association;
        let name = self.internal_name.get_or_insert_with(|| {
            let name = format!("{}{}", INTERNAL_NAME_PREFIX, parent.next_counter(association));
            tracing::debug!(field_id = %id, name = %name, "Generated internal name");
            name
        });

        Ok(name.as_str())
    }

    /// Computes the alias from the current alias, or the label if unset.
    ///
    /// Returns the stored alias unchanged (possibly empty) when both label
    /// and alias are empty. Does not store the result; see [`Self::safe_alias`].
    pub fn compute_alias(&self) -> String {
        if self.label.is_empty() && self.alias.is_empty() {
            return self.alias.clone();
        }
        let source = if self.alias.is_empty() {
            &self.label
        } else {
            &self.alias
        };
        parameterize(source)
    }

    /// Computes and stores the alias, then returns it.
    pub fn safe_alias(&mut self) -> &str {
        self.alias = self.compute_alias();
        &self.alias
    }

    /// Adds this field as a typed attribute of `target`.
    ///
    /// Invalid descriptors are skipped without touching `target`. The kind
    /// is resolved before a name is generated, so an unknown kind neither
    /// mutates the target nor consumes a counter tick. Applying twice
    /// re-adds the same attribute.
    pub fn apply<P, T>(
        &mut self,
        parent: &P,
        registry: &TypeRegistry,
        target: &mut T,
    ) -> Result<ApplyOutcome, FieldError>
    where
        P: ParentContext + ?Sized,
        T: TargetSchema + ?Sized,
    {
        self.check_parent(parent)?;

        if let Err(errors) = self.validate(parent) {
            tracing::debug!(field_id = %self.id, label = %self.label, %errors, "Skipping invalid field");
            return Ok(ApplyOutcome::Skipped(errors));
        }

        let type_ref = self.resolve_storage_type(registry)?;
        let name = self.ensure_internal_name(parent)?.to_string();
        let alias = self.safe_alias().to_string();

        target.add_typed_attribute(&name, type_ref.clone());

        let binding = Binding {
            name: &name,
            alias: &alias,
        };
        let wiring = self
            .field_kind()
            .map(|kind| kind.wiring())
            .unwrap_or(Wiring::Default);
        match wiring {
            Wiring::Category => {
                target.apply_category_wiring(&binding, &self.ordered_category_items())
            }
            Wiring::Default => target.apply_default_wiring(&binding),
        }

        tracing::debug!(
            field_id = %self.id,
            name = %name,
            alias = %alias,
            type_name = %type_ref.name,
            "Applied field"
        );

        Ok(ApplyOutcome::Applied(AppliedField {
            id: self.id.clone(),
            name,
            alias,
            type_ref,
            wiring,
        }))
    }

    fn check_parent<P: ParentContext + ?Sized>(&self, parent: &P) -> Result<(), FieldError> {
        if parent.id() != self.parent_ref.parent_id {
            return Err(FieldError::ParentMismatch {
                expected: self.parent_ref.parent_id.clone(),
                actual: parent.id().to_string(),
            });
        }
        Ok(())
    }
}
