//! modelspec — declarative checks for relational data models.
//!
//! This is the main entry point for the modelspec library, providing
//! a convenient API for generating validation, persistence, and
//! relationship checks against a model layer.

pub use modelspec_core::*;

// Re-export derive macros when available
#[cfg(feature = "derive")]
pub use modelspec_derive::*;
