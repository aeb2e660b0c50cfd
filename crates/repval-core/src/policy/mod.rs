//! Module: policy
//! Responsibility: decide whether and how a slot changes for one candidate
//! row or one candidate state.
//! Does not own: value storage or encoding (slot layer), batch iteration and
//! range validation (aggregate adapter).
//! Boundary: every policy wraps exactly one slot and derefs to it.

/// Stateless policy over one slot primitive pair.
macro_rules! slot_policy {
    ($(#[$meta:meta])* $name:ident, $kind:ident, $row:ident, $merge:ident, $condition:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default, derive_more::Deref, derive_more::DerefMut)]
        pub struct $name<S>(S);

        impl<S> $name<S> {
            #[must_use]
            pub const fn new(slot: S) -> Self {
                Self(slot)
            }

            #[must_use]
            pub fn into_inner(self) -> S {
                self.0
            }
        }

        impl<'a, S: $crate::slot::Slot<'a>> $crate::policy::Policy<'a> for $name<S> {
            type Slot = S;
            type Output = S::Column;

            const KIND: $crate::aggregate::AggregateKind = $crate::aggregate::AggregateKind::$kind;

            fn slot(&self) -> &S {
                &self.0
            }

            fn change_if_better(
                &mut self,
                column: &S::Column,
                row: usize,
                arena: &'a $crate::arena::Arena,
            ) -> bool {
                self.0.$row(column, row, arena)
            }

            fn change_if_better_from(&mut self, source: &Self, arena: &'a $crate::arena::Arena) -> bool {
                self.0.$merge(&source.0, arena)
            }

            fn insert_result_into(&self, output: &mut S::Column) {
                self.0.insert_result_into(output);
            }

            fn read(
                &mut self,
                buf: &mut $crate::serialize::ReadBuffer<'_>,
                arena: &'a $crate::arena::Arena,
            ) -> Result<(), $crate::error::InternalError> {
                self.0.read(buf, arena)
            }

            fn change_condition() -> Option<$crate::compile::ChangeCondition> {
                Some($crate::compile::ChangeCondition::$condition)
            }
        }
    };
}

mod any;
mod heavy;
mod min_max;
mod or_null;

#[cfg(test)]
mod tests;

use crate::{
    aggregate::AggregateKind,
    arena::Arena,
    column::Column,
    compile::ChangeCondition,
    error::InternalError,
    serialize::{ReadBuffer, WriteBuffer},
    slot::Slot,
};

// re-exports
pub use any::{Any, AnyLast};
pub use heavy::AnyHeavy;
pub use min_max::{Max, Min};
pub use or_null::OrNull;

/// Row column type a policy reads.
pub type InputColumn<'a, P> = <<P as Policy<'a>>::Slot as Slot<'a>>::Column;

///
/// Policy
///
/// `changeIfBetter` layer composed over a [`Slot`].
///

pub trait Policy<'a>: Default {
    type Slot: Slot<'a>;

    /// Column the final result is emitted into.
    type Output: Column;

    const KIND: AggregateKind;

    fn slot(&self) -> &Self::Slot;

    /// Apply the per-row rule; returns whether the stored value changed.
    fn change_if_better(
        &mut self,
        column: &<Self::Slot as Slot<'a>>::Column,
        row: usize,
        arena: &'a Arena,
    ) -> bool;

    /// Apply the merge rule with `source` as the candidate state.
    fn change_if_better_from(&mut self, source: &Self, arena: &'a Arena) -> bool;

    /// Apply the row at index 0 for a run of `length` identical rows.
    ///
    /// Repetition cannot change the outcome of most policies, so the default
    /// applies the row once.
    fn add_many_defaults(
        &mut self,
        column: &<Self::Slot as Slot<'a>>::Column,
        _length: usize,
        arena: &'a Arena,
    ) {
        self.change_if_better(column, 0, arena);
    }

    fn insert_result_into(&self, output: &mut Self::Output);

    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        self.slot().write(buf)
    }

    fn read(&mut self, buf: &mut ReadBuffer<'_>, arena: &'a Arena) -> Result<(), InternalError>;

    fn has(&self) -> bool {
        self.slot().has()
    }

    /// Comparison gate used by generated code; `None` when not compilable.
    #[must_use]
    fn change_condition() -> Option<ChangeCondition> {
        None
    }
}
