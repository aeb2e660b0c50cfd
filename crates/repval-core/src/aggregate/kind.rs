use crate::error::InternalError;
use std::fmt;

///
/// AggregateKind
///
/// The representative-value aggregate functions, by canonical name.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum AggregateKind {
    Min,
    Max,
    Any,
    AnyLast,
    AnyHeavy,
    SingleValueOrNull,
}

impl AggregateKind {
    pub const ALL: [Self; 6] = [
        Self::Min,
        Self::Max,
        Self::Any,
        Self::AnyLast,
        Self::AnyHeavy,
        Self::SingleValueOrNull,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Any => "any",
            Self::AnyLast => "anyLast",
            Self::AnyHeavy => "anyHeavy",
            Self::SingleValueOrNull => "singleValueOrNull",
        }
    }

    /// Resolve a canonical function name.
    pub fn from_name(name: &str) -> Result<Self, InternalError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or_else(|| {
                InternalError::aggregate_unsupported(format!("unknown aggregate function '{name}'"))
            })
    }

    /// Whether the function needs a total order over its argument values.
    #[must_use]
    pub const fn requires_ordering(self) -> bool {
        matches!(self, Self::Min | Self::Max)
    }

    /// Whether a populated state can never change again within one batch.
    #[must_use]
    pub const fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }

    #[must_use]
    pub const fn result_is_nullable(self) -> bool {
        matches!(self, Self::SingleValueOrNull)
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
