//! Inspection errors

use std::error::Error as StdError;

use super::types::TypeRef;

/// Failure of the call underlying a field write, getter, setter or method
#[derive(Debug, thiserror::Error)]
pub enum CallError {
    /// Wrong number of arguments
    #[error("expected {expected} argument(s), got {found}")]
    Arity { expected: usize, found: usize },

    /// Argument not convertible to the declared parameter type
    #[error("argument {index}: expected {expected}, found {found}")]
    Argument {
        index: usize,
        expected: TypeRef,
        found: TypeRef,
    },

    /// Method takes `&mut self` but only a shared reference was available
    #[error("method requires a mutable receiver")]
    ExclusiveReceiver,

    /// The target itself reported an error
    #[error(transparent)]
    Failed(Box<dyn StdError + Send + Sync>),
}

/// Kind of registry a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Attribute,
    Method,
}

impl std::fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryKind::Attribute => f.write_str("attribute"),
            RegistryKind::Method => f.write_str("method"),
        }
    }
}

/// Structural problem with a getter or setter signature
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeFault {
    #[error("getter should return something")]
    GetterReturnsUnit,

    #[error("getter should not have parameters (has {0})")]
    GetterHasParameters(usize),

    #[error("getter must take a shared receiver")]
    GetterNeedsMutableReceiver,

    #[error("setter should not return a value (returns {0})")]
    SetterReturnsValue(TypeRef),

    #[error("setter should have exactly one parameter (has {0})")]
    SetterParameterCount(usize),
}

/// Error building or using an inspection registry
#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    // Construction faults
    /// Attribute-marked method is neither a getter nor a setter
    #[error("method `{method}` is neither a getter nor a setter")]
    Classification { method: String },

    /// Getter is marked read-only but a setter for the same attribute exists
    #[error("getter specifies `{attribute}` as read only, but a setter was found")]
    ReadOnlyConflict { attribute: String },

    /// Setter without a matching getter
    #[error("no getter for setter `{setter}` (attribute `{attribute}`)")]
    OrphanSetter { setter: String, attribute: String },

    /// Getter with an invalid signature
    #[error("invalid getter `{method}`: {fault}")]
    InvalidGetter { method: String, fault: ShapeFault },

    /// Setter with an invalid signature
    #[error("invalid setter `{method}`: {fault}")]
    InvalidSetter { method: String, fault: ShapeFault },

    /// Setter parameter type differs from the getter return type
    #[error("setter for `{attribute}` takes {setter}, but the getter returns {getter}")]
    SetterTypeMismatch {
        attribute: String,
        getter: TypeRef,
        setter: TypeRef,
    },

    /// Two members resolve to the same display name
    #[error("duplicate {kind} name `{name}`")]
    DuplicateName { kind: RegistryKind, name: String },

    // Access faults
    /// No attribute with this display name
    #[error("no such attribute `{0}`")]
    UnknownAttribute(String),

    /// Write attempted on a read-only attribute
    #[error("attribute `{attribute}` is read only")]
    ReadOnly { attribute: String },

    /// Value not assignable to the attribute type
    #[error("attribute `{attribute}` has type {expected}, got a value of type {found}")]
    TypeMismatch {
        attribute: String,
        expected: TypeRef,
        found: TypeRef,
    },

    /// Reading or writing the attribute failed
    #[error("accessing attribute `{attribute}` failed")]
    Access {
        attribute: String,
        #[source]
        source: CallError,
    },

    // Invocation faults
    /// No method with this display name
    #[error("no such method `{0}`")]
    NoSuchMethod(String),

    /// Method invocation failed
    #[error("invocation of `{method}` failed")]
    Invocation {
        method: String,
        #[source]
        source: CallError,
    },
}

impl InspectionError {
    /// Whether this error aborts registry construction
    pub fn is_construction_fault(&self) -> bool {
        matches!(
            self,
            InspectionError::Classification { .. }
                | InspectionError::ReadOnlyConflict { .. }
                | InspectionError::OrphanSetter { .. }
                | InspectionError::InvalidGetter { .. }
                | InspectionError::InvalidSetter { .. }
                | InspectionError::SetterTypeMismatch { .. }
                | InspectionError::DuplicateName { .. }
        )
    }
}
