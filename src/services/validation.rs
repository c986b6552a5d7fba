//! Validation service for checking every field of a parent.

use std::sync::Arc;

use serde::Serialize;

use crate::context::Context;
use crate::di::FromRef;
use crate::error::FieldError;
use crate::models::FieldDescriptor;
use crate::parent::{FieldSet, ParentContext};
use crate::registry::TypeRegistry;

/// A problem found with one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// Field ID.
    pub field_id: String,
    /// Field label (may be empty).
    pub label: String,
    pub association: String,
    /// Description of the issue.
    pub issue: String,
}

impl ValidationIssue {
    fn new(field: &FieldDescriptor, issue: impl Into<String>) -> Self {
        Self {
            field_id: field.id.clone(),
            label: field.label.clone(),
            association: field.parent_ref.association.clone(),
            issue: issue.into(),
        }
    }
}

/// Service for validating the fields of a parent.
///
/// Reports descriptor validation failures, aliases two fields would both
/// claim, and kinds that would fail to resolve on apply.
#[derive(Clone)]
pub struct ValidationService {
    registry: Arc<TypeRegistry>,
}

impl FromRef<Context> for ValidationService {
    fn from_ref(ctx: &Context) -> Self {
        Self {
            registry: FromRef::from_ref(ctx),
        }
    }
}

impl ValidationService {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Every issue of every field, grouped by association, fields in position order.
    pub fn find_issues(&self, parent: &FieldSet) -> Vec<ValidationIssue> {
        parent
            .associations()
            .iter()
            .flat_map(|association| {
                let fields = parent.ordered(association);
                fields
                    .iter()
                    .flat_map(|field| self.field_issues(parent, &fields, field))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn field_issues(
        &self,
        parent: &dyn ParentContext,
        siblings: &[FieldDescriptor],
        field: &FieldDescriptor,
    ) -> Vec<ValidationIssue> {
        let mut issues: Vec<ValidationIssue> = match field.validate(parent) {
            Ok(()) => Vec::new(),
            Err(errors) => errors
                .iter()
                .map(|e| ValidationIssue::new(field, e.to_string()))
                .collect(),
        };

        // Equal labels are already reported as duplicates.
        let alias = field.compute_alias();
        if !alias.is_empty() {
            let shared: Vec<&str> = siblings
                .iter()
                .filter(|f| f.id != field.id && f.label != field.label)
                .filter(|f| f.compute_alias() == alias)
                .map(|f| f.label.as_str())
                .collect();
            if !shared.is_empty() {
                issues.push(ValidationIssue::new(
                    field,
                    format!("alias '{}' is shared with '{}'", alias, shared.join("', '")),
                ));
            }
        }

        if field.kind.is_empty() {
            return issues;
        }
        if let Err(e @ FieldError::UnknownKind(_)) = field.resolve_storage_type(&self.registry) {
            issues.push(ValidationIssue::new(field, e.to_string()));
        }
        issues
    }
}
