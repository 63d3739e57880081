//! Core functionality for modelspec model testing.
//!
//! This crate provides the building blocks for generating named check
//! cases against a relational model layer: the collaborator traits, the
//! check builder, and case registration and reporting.

pub mod case;
pub mod checks;
pub mod error;
pub mod model;
pub mod reflect;
pub mod value;

#[cfg(test)]
pub(crate) mod testutil;

// Re-export the main types
pub use case::*;
pub use checks::*;
pub use error::*;
pub use model::*;
pub use reflect::*;
pub use value::*;
