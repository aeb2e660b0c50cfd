//! Module: slot
//! Responsibility: raw storage of one aggregate state value and the primitive
//! change/compare/serialize operations over it.
//! Does not own: the decision of when a change happens (policy layer).
//! Boundary: policies call these primitives; nothing else mutates slot bytes.

mod fixed;
mod generic;
mod string;


use crate::{
    arena::Arena,
    column::Column,
    compile::StateLayout,
    error::InternalError,
    serialize::{ReadBuffer, WriteBuffer},
};
use repval_primitives::SlotStorage;
use std::cmp::Ordering;

// re-exports
pub use fixed::{Decimal32, Decimal64, Decimal128, FixedSlot, FixedValue};
pub use generic::GenericSlot;
pub use string::{AUTOMATIC_STORAGE_SIZE, MAX_SMALL_STRING_SIZE, StringSlot};

///
/// Slot
///
/// Storage contract shared by fixed-width, string and generic slots.
///
/// `'a` is the lifetime of the arena overflow storage may borrow from. Every
/// `change*` primitive only ever replaces the stored value as a whole.
///

pub trait Slot<'a>: Default {
    /// Column type rows are read from and results are emitted into.
    type Column: Column;

    const STORAGE: SlotStorage;

    /// In-state width of the value for fixed storage.
    const FIXED_WIDTH: Option<usize> = None;

    fn has(&self) -> bool;

    /// Overwrite the stored value with one input row.
    fn change(&mut self, column: &Self::Column, row: usize, arena: &'a Arena);

    /// Overwrite the stored value with another slot's stored value.
    fn change_from(&mut self, source: &Self, arena: &'a Arena);

    /// Order of the candidate row relative to the stored value.
    ///
    /// `None` when the slot is empty or the two values are unordered.
    fn compare_row(&self, column: &Self::Column, row: usize) -> Option<Ordering>;

    /// Order of `source`'s value relative to the stored value.
    fn compare_slot(&self, source: &Self) -> Option<Ordering>;

    /// Structural equality; always false while this slot is empty.
    fn is_equal_to(&self, column: &Self::Column, row: usize) -> bool;

    /// Structural equality; false unless both slots hold a value.
    fn is_equal_to_slot(&self, source: &Self) -> bool;

    /// Emit the stored value, or the column default while empty.
    fn insert_result_into(&self, output: &mut Self::Column);

    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError>;

    fn read(&mut self, buf: &mut ReadBuffer<'_>, arena: &'a Arena) -> Result<(), InternalError>;

    /// Whether states of this slot may hold arena-owned memory.
    #[must_use]
    fn allocates_memory_in_arena() -> bool {
        false
    }

    /// Native state layout for generated code, when the slot supports it.
    #[must_use]
    fn native_layout() -> Option<StateLayout> {
        None
    }

    fn change_first_time(&mut self, column: &Self::Column, row: usize, arena: &'a Arena) -> bool {
        if self.has() {
            return false;
        }

        self.change(column, row, arena);
        true
    }

    fn change_first_time_from(&mut self, source: &Self, arena: &'a Arena) -> bool {
        if self.has() || !source.has() {
            return false;
        }

        self.change_from(source, arena);
        true
    }

    fn change_every_time(&mut self, column: &Self::Column, row: usize, arena: &'a Arena) -> bool {
        self.change(column, row, arena);
        true
    }

    fn change_every_time_from(&mut self, source: &Self, arena: &'a Arena) -> bool {
        if !source.has() {
            return false;
        }

        self.change_from(source, arena);
        true
    }

    // Ties never change the state: the first value written wins.

    fn change_if_less(&mut self, column: &Self::Column, row: usize, arena: &'a Arena) -> bool {
        if self.has() && self.compare_row(column, row) != Some(Ordering::Less) {
            return false;
        }

        self.change(column, row, arena);
        true
    }

    fn change_if_less_from(&mut self, source: &Self, arena: &'a Arena) -> bool {
        if !source.has() || (self.has() && self.compare_slot(source) != Some(Ordering::Less)) {
            return false;
        }

        self.change_from(source, arena);
        true
    }

    fn change_if_greater(&mut self, column: &Self::Column, row: usize, arena: &'a Arena) -> bool {
        if self.has() && self.compare_row(column, row) != Some(Ordering::Greater) {
            return false;
        }

        self.change(column, row, arena);
        true
    }

    fn change_if_greater_from(&mut self, source: &Self, arena: &'a Arena) -> bool {
        if !source.has() || (self.has() && self.compare_slot(source) != Some(Ordering::Greater)) {
            return false;
        }

        self.change_from(source, arena);
        true
    }
}
