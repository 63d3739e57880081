//! Error and verdict types for modelspec checks.

use thiserror::Error;

/// Main error type for check generation and registration.
///
/// Every variant is a suite-configuration fault: it aborts suite
/// construction rather than becoming a failing case.
#[derive(Error, Debug)]
pub enum ModelSpecError {
    /// The class resolver had no class for the derived name.
    #[error("could not resolve model class `{class_name}`")]
    ClassResolution { class_name: String },

    /// Reflection returned nothing for a named association.
    #[error("no association named `{association}` on `{class_name}`")]
    UnknownAssociation {
        class_name: String,
        association: String,
    },

    /// A case with this name is already registered.
    #[error("a case named `{name}` is already registered")]
    DuplicateCase { name: String },
}

/// Result type for modelspec operations.
pub type Result<T> = std::result::Result<T, ModelSpecError>;

/// Outcome of one executed check case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The checked condition held.
    Pass,

    /// The checked condition did not hold; the message names the
    /// attribute or association and what was expected versus observed.
    Fail { message: String },
}

impl Verdict {
    /// A passing verdict.
    pub fn pass() -> Self {
        Verdict::Pass
    }

    /// A failing verdict with the given message.
    pub fn fail(message: impl Into<String>) -> Self {
        Verdict::Fail {
            message: message.into(),
        }
    }

    /// Whether this verdict is a pass.
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Pass => None,
            Verdict::Fail { message } => Some(message),
        }
    }
}
