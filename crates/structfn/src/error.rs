//! Error types for the structfn crate.

use thiserror::Error;

/// Errors raised when a factory-built function is applied to an object, or
/// when a class descriptor is built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructError {
    /// A property name did not resolve against the object's class, or a
    /// feature handle does not belong to it.
    #[error("class '{class}' has no feature named '{feature}'")]
    MissingFeature { class: String, feature: String },

    /// The object's class declares no identifying attribute, or it is unset.
    #[error("object class '{class}' has no identifying attribute")]
    NoIdentifier { class: String },

    /// The stored value is not of the type the accessor expects.
    #[error("type mismatch on feature '{feature}': expected {expected}, got {actual}")]
    TypeMismatch {
        feature: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A primitive read found no value.
    #[error("feature '{feature}' is null, expected {expected}")]
    NullValue {
        feature: String,
        expected: &'static str,
    },

    /// Two values have no natural ordering between them.
    #[error("cannot order values of feature '{feature}': {left} against {right}")]
    NotComparable {
        feature: String,
        left: &'static str,
        right: &'static str,
    },

    /// A class declares the same feature name twice.
    #[error("class '{class}' declares feature '{feature}' more than once")]
    DuplicateFeature { class: String, feature: String },

    /// The designated identifying feature is not a single-valued attribute.
    #[error("feature '{feature}' of class '{class}' cannot identify objects")]
    InvalidIdentifier { class: String, feature: String },
}

/// Coarse classification of a [`StructError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A precondition of the call was violated.
    Precondition,
    /// A property does not exist on the object's class.
    MissingFeature,
    /// A value had the wrong runtime type.
    TypeMismatch,
}

impl StructError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StructError::MissingFeature { .. } => ErrorKind::MissingFeature,
            StructError::TypeMismatch { .. }
            | StructError::NullValue { .. }
            | StructError::NotComparable { .. } => ErrorKind::TypeMismatch,
            StructError::NoIdentifier { .. }
            | StructError::DuplicateFeature { .. }
            | StructError::InvalidIdentifier { .. } => ErrorKind::Precondition,
        }
    }
}

/// Result type for structfn operations.
pub type Result<T> = std::result::Result<T, StructError>;
