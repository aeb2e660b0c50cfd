//! State engine for the representative-value aggregate functions (`min`,
//! `max`, `any`, `anyLast`, `anyHeavy`, `singleValueOrNull`): slots, policies,
//! the aggregator adapter, state serialization and the optional native
//! compilation capability.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregate;
pub mod arena;
pub mod column;
pub mod compile;
pub mod error;
pub mod obs;
pub mod policy;
pub mod serialize;
pub mod slot;
pub mod value;

///
/// Prelude
///
/// Vocabulary needed to build an aggregator and drive its states.
///

pub mod prelude {
    pub use crate::{
        aggregate::{AggregateKind, SingleValueAggregate},
        arena::Arena,
        column::{Column, NullableColumn, PrimitiveColumn, StringColumn, ValueColumn},
        policy::{Any, AnyHeavy, AnyLast, Max, Min, OrNull, Policy},
        serialize::{ReadBuffer, WriteBuffer},
        slot::{FixedSlot, GenericSlot, Slot, StringSlot},
        value::Value,
    };
    pub use repval_primitives::ScalarKind;
}
