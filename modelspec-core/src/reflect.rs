//! Association reflection data returned by the model collaborator.

use std::fmt;

/// The declared kind of a model relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    HasMany,
    HasOne,
    BelongsTo,
    HasAndBelongsToMany,
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = match self {
            AssociationKind::HasMany => "has many",
            AssociationKind::HasOne => "has one",
            AssociationKind::BelongsTo => "belongs to",
            AssociationKind::HasAndBelongsToMany => "has and belongs to many",
        };
        write!(f, "{}", phrase)
    }
}

/// Reflected metadata for one named association on a model class.
///
/// The only declaration option the checks consume is the through-target,
/// so it is carried as a typed field rather than an options map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub kind: AssociationKind,
    pub through: Option<String>,
}

impl Association {
    /// Reflection data for a plain association with no options.
    pub fn new(kind: AssociationKind) -> Self {
        Association {
            kind,
            through: None,
        }
    }

    /// Attach a through-target to this association.
    pub fn through(mut self, target: impl Into<String>) -> Self {
        self.through = Some(target.into());
        self
    }
}
