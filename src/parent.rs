//! Parents own custom field descriptors and hand out their internal names.
//!
//! [`ParentContext`] is the contract descriptors rely on. [`FieldSet`] is an
//! in-memory, thread-safe parent.

use std::collections::{BTreeMap, HashMap};

use parking_lot::{Mutex, RwLock};

use crate::error::FieldError;
use crate::models::{generate_ulid, FieldDescriptor, ParentRef};

/// The entity custom fields are declared on.
pub trait ParentContext: Send + Sync {
    /// Identifier descriptors reference through [`ParentRef::parent_id`].
    fn id(&self) -> &str;

    /// All descriptors of `association`, including the caller if stored.
    fn siblings(&self, association: &str) -> Vec<FieldDescriptor>;

    /// Increments and returns the naming counter of `association`.
    ///
    /// Starts at 1. Concurrent calls on the same association must never
    /// return the same value.
    fn next_counter(&self, association: &str) -> u64;
}

/// In-memory parent holding descriptors grouped by association.
#[derive(Debug)]
pub struct FieldSet {
    id: String,
    name: String,
    fields: RwLock<BTreeMap<String, Vec<FieldDescriptor>>>,
    counters: Mutex<HashMap<String, u64>>,
}

impl FieldSet {
    /// Creates an empty parent with a generated ULID.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(generate_ulid(), name)
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            fields: RwLock::new(BTreeMap::new()),
            counters: Mutex::new(HashMap::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Builds a descriptor scoped to this parent. It is not stored until
    /// [`FieldSet::insert`] is called.
    pub fn new_field(
        &self,
        association: &str,
        label: impl Into<String>,
        kind: impl Into<String>,
    ) -> FieldDescriptor {
        FieldDescriptor::new(ParentRef::new(&self.id, association), label, kind)
    }

    /// Stores a descriptor under its association.
    pub fn insert(&self, field: FieldDescriptor) -> Result<(), FieldError> {
        self.check_owner(&field)?;
        self.fields
            .write()
            .entry(field.parent_ref.association.clone())
            .or_default()
            .push(field);
        Ok(())
    }

    /// Replaces the stored descriptor with the same id. Returns `false` if
    /// no such descriptor exists.
    pub fn update(&self, field: FieldDescriptor) -> bool {
        let mut fields = self.fields.write();
        let Some(slot) = fields
            .get_mut(&field.parent_ref.association)
            .and_then(|list| list.iter_mut().find(|f| f.id == field.id))
        else {
            return false;
        };
        *slot = field;
        true
    }

    /// Removes a descriptor by id. Its internal name is not handed out again.
    pub fn remove(&self, association: &str, id: &str) -> Option<FieldDescriptor> {
        let mut fields = self.fields.write();
        let list = fields.get_mut(association)?;
        let index = list.iter().position(|f| f.id == id)?;
        Some(list.remove(index))
    }

    /// Descriptors of `association` in insertion order.
    pub fn fields(&self, association: &str) -> Vec<FieldDescriptor> {
        self.fields
            .read()
            .get(association)
            .cloned()
            .unwrap_or_default()
    }

    /// Descriptors of `association` sorted by position, insertion order for ties.
    pub fn ordered(&self, association: &str) -> Vec<FieldDescriptor> {
        let mut fields = self.fields(association);
        fields.sort_by_key(|f| f.position);
        fields
    }

    /// Associations holding at least one descriptor, in name order.
    pub fn associations(&self) -> Vec<String> {
        self.fields
            .read()
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Last counter value handed out for `association` (0 if none).
    pub fn counter(&self, association: &str) -> u64 {
        self.counters.lock().get(association).copied().unwrap_or(0)
    }

    /// Restores a persisted counter. Never moves a counter backwards.
    pub fn restore_counter(&self, association: &str, value: u64) {
        let mut counters = self.counters.lock();
        let counter = counters.entry(association.to_string()).or_insert(0);
        *counter = (*counter).max(value);
    }

    fn check_owner(&self, field: &FieldDescriptor) -> Result<(), FieldError> {
        if field.parent_ref.parent_id != self.id {
            return Err(FieldError::ParentMismatch {
                expected: field.parent_ref.parent_id.clone(),
                actual: self.id.clone(),
            });
        }
        Ok(())
    }
}

impl ParentContext for FieldSet {
    fn id(&self) -> &str {
        &self.id
    }

    fn siblings(&self, association: &str) -> Vec<FieldDescriptor> {
        self.fields(association)
    }

    fn next_counter(&self, association: &str) -> u64 {
        let mut counters = self.counters.lock();
        let counter = counters.entry(association.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_per_association() {
        let parent = FieldSet::new("Article");

        assert_eq!(parent.next_counter("custom_fields"), 1);
        assert_eq!(parent.next_counter("custom_fields"), 2);
        assert_eq!(parent.next_counter("asset_fields"), 1);
        assert_eq!(parent.counter("custom_fields"), 2);
    }

    #[test]
    fn test_restore_counter_never_decreases() {
        let parent = FieldSet::new("Article");
        parent.restore_counter("custom_fields", 5);
        parent.restore_counter("custom_fields", 3);

        assert_eq!(parent.next_counter("custom_fields"), 6);
    }

    #[test]
    fn test_insert_rejects_foreign_field() {
        let parent = FieldSet::new("Article");
        let other = FieldSet::new("Asset");
        let field = other.new_field("custom_fields", "Author", "String");

        assert!(matches!(
            parent.insert(field),
            Err(FieldError::ParentMismatch { .. })
        ));
    }

    #[test]
    fn test_ordered_by_position() {
        let parent = FieldSet::new("Article");
        for (label, position) in [("c", 2), ("a", 0), ("b", 1)] {
            parent
                .insert(
                    parent
                        .new_field("custom_fields", label, "String")
                        .with_position(position),
                )
                .unwrap();
        }

        let labels: Vec<_> = parent
            .ordered("custom_fields")
            .into_iter()
            .map(|f| f.label)
            .collect();
        assert_eq!(labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_update_and_remove() {
        let parent = FieldSet::new("Article");
        let mut field = parent.new_field("custom_fields", "Author", "String");
        parent.insert(field.clone()).unwrap();

        field.label = "Writer".to_string();
        assert!(parent.update(field.clone()));
        assert_eq!(parent.fields("custom_fields")[0].label, "Writer");

        assert!(parent.remove("custom_fields", &field.id).is_some());
        assert!(!parent.update(field));
        assert!(parent.associations().is_empty());
    }
}
