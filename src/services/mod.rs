//! Services orchestrating parents, registries and schemas.
//!
//! Services are extracted from the application context with `FromRef`.

mod field;
mod validation;

pub use field::{ApplyReport, FieldService, SkippedField};
pub use validation::{ValidationIssue, ValidationService};
