//! custom-fields - runtime custom field definitions
//!
//! A parent declares named, typed custom fields at runtime; each field is
//! validated, given a stable internal name and an alias, and applied to a
//! target schema as a typed attribute.

pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod models;
pub mod parent;
pub mod registry;
pub mod schema;
pub mod services;

pub use di::FromRef;
