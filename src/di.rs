//! Dependency injection infrastructure.
//!
//! Services are extracted from the application [`Context`](crate::context::Context)
//! through `FromRef`, so each one declares only the dependencies it uses.
//!
//! ```ignore
//! let ctx = Context::new(config);
//! let service = FieldService::from_ref(&ctx);
//! ```

/// Trait for extracting a value from a reference to another type.
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

/// Blanket implementation: any Clone type can be extracted from itself.
impl<T: Clone> FromRef<T> for T {
    fn from_ref(input: &T) -> Self {
        input.clone()
    }
}
