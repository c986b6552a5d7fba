//! Error types for field descriptors and the surrounding application.

use thiserror::Error;

/// A single validation failure of a field descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("label can't be blank")]
    MissingLabel,

    #[error("kind can't be blank")]
    MissingKind,

    #[error("label '{label}' is already taken")]
    DuplicateLabel { label: String },
}

/// All validation failures collected for one descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, error: &ValidationError) -> bool {
        self.0.contains(error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    /// Human-readable messages, one per failure.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Hard failures while naming, resolving or applying a descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Unknown field kind: {0}")]
    UnknownKind(String),

    #[error("Field kind is blank, nothing to resolve")]
    BlankKind,

    #[error("Field belongs to parent {expected}, got {actual}")]
    ParentMismatch { expected: String, actual: String },
}

/// Application-level errors.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Field(#[from] FieldError),

    // Definition file errors
    #[error("Definition file not found: {0}")]
    DefinitionNotFound(String),

    #[error("Unsupported definition format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid definition: {0}")]
    Definition(String),
}
