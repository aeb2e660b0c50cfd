use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable classification.
/// Configuration and capability errors are raised to the immediate caller;
/// corruption and invariant errors are never retried inside this crate.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an aggregate-origin illegal argument (construction time).
    pub(crate) fn aggregate_illegal_argument(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::IllegalArgument,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct an aggregate-origin unsupported error.
    pub(crate) fn aggregate_unsupported(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Unsupported,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct an aggregate-origin invariant violation (caller bug).
    pub(crate) fn aggregate_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Aggregate,
            message.into(),
        )
    }

    /// Construct a slot-origin corruption error.
    pub(crate) fn slot_corruption(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Corruption, ErrorOrigin::Slot, message.into())
    }

    /// Construct a serialize-origin corruption error.
    pub(crate) fn serialize_corruption(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::Corruption,
            ErrorOrigin::Serialize,
            message.into(),
        )
    }

    /// Construct a serialize-origin internal error.
    pub(crate) fn serialize_internal(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Internal, ErrorOrigin::Serialize, message.into())
    }

    /// Construct a compile-origin unsupported error.
    pub(crate) fn compile_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Compile, message.into())
    }

    /// Construct a compile-origin invariant violation.
    pub(crate) fn compile_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Compile,
            message.into(),
        )
    }

    /// Construct a column-origin invariant violation.
    pub(crate) fn column_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Column,
            message.into(),
        )
    }

    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self.class, ErrorClass::Corruption)
    }

    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self.class, ErrorClass::Unsupported)
    }
}

///
/// ErrorClass
/// Error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    IllegalArgument,
    Unsupported,
    Corruption,
    InvariantViolation,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::IllegalArgument => "illegal_argument",
            Self::Unsupported => "unsupported",
            Self::Corruption => "corruption",
            Self::InvariantViolation => "invariant_violation",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Aggregate,
    Slot,
    Serialize,
    Compile,
    Column,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Aggregate => "aggregate",
            Self::Slot => "slot",
            Self::Serialize => "serialize",
            Self::Compile => "compile",
            Self::Column => "column",
        };
        write!(f, "{label}")
    }
}
