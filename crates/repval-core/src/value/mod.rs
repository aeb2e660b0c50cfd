mod compare;


use repval_primitives::ScalarKind;
use serde::{Deserialize, Serialize};

// re-exports
pub use compare::strict_order_cmp;

///
/// Value
///
/// Boxed dynamically-typed value held by generic aggregate slots.
///
/// Null        → no value recorded; the empty state of a generic slot.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float64(f64),
    Text(String),
    Blob(Vec<u8>),
    List(Vec<Self>),
    Tuple(Vec<Self>),
    Map(Vec<(Self, Self)>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Default value emitted for an empty state of the given scalar kind.
    #[must_use]
    pub const fn default_for(kind: ScalarKind) -> Self {
        match kind {
            ScalarKind::Tuple => Self::Tuple(Vec::new()),
            ScalarKind::Map | ScalarKind::Object => Self::Map(Vec::new()),
            _ => Self::List(Vec::new()),
        }
    }
}
