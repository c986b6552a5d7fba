//! Domain models for custom field definitions.

mod alias;
mod category;
mod definition;
mod field;
mod kind;

pub use alias::{parameterize, ALIAS_SEPARATOR};
pub use category::{ordered_items, CategoryItem};
pub use definition::{Definition, FieldDefinition};
pub use field::{
    generate_ulid, AppliedField, ApplyOutcome, FieldDescriptor, ParentRef, INTERNAL_NAME_PREFIX,
};
pub use kind::{BaseKind, FieldKind, Wiring};
