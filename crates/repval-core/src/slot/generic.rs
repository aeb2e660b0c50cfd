use crate::{
    arena::Arena,
    column::{Column, ValueColumn},
    error::InternalError,
    serialize::{self, ReadBuffer, WriteBuffer},
    slot::Slot,
    value::{Value, strict_order_cmp},
};
use repval_primitives::SlotStorage;
use std::cmp::Ordering;

///
/// GenericSlot
///
/// Boxed dynamic value; [`Value::Null`] is the empty state. Ordering,
/// equality and encoding are delegated to the value itself.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenericSlot {
    value: Value,
}

impl GenericSlot {
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }
}

impl<'a> Slot<'a> for GenericSlot {
    type Column = ValueColumn;

    const STORAGE: SlotStorage = SlotStorage::Generic;

    fn has(&self) -> bool {
        !self.value.is_null()
    }

    fn change(&mut self, column: &Self::Column, row: usize, _arena: &'a Arena) {
        self.value = column.get(row).clone();
    }

    fn change_from(&mut self, source: &Self, _arena: &'a Arena) {
        self.value = source.value.clone();
    }

    fn compare_row(&self, column: &Self::Column, row: usize) -> Option<Ordering> {
        if !self.has() {
            return None;
        }

        strict_order_cmp(column.get(row), &self.value)
    }

    fn compare_slot(&self, source: &Self) -> Option<Ordering> {
        strict_order_cmp(&source.value, &self.value)
    }

    fn is_equal_to(&self, column: &Self::Column, row: usize) -> bool {
        self.has() && *column.get(row) == self.value
    }

    fn is_equal_to_slot(&self, source: &Self) -> bool {
        self.has() && source.value == self.value
    }

    fn insert_result_into(&self, output: &mut Self::Column) {
        if self.has() {
            output.push(self.value.clone());
        } else {
            output.push_default();
        }
    }

    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        buf.write_bool(self.has());
        if self.has() {
            buf.write_bytes(&serialize::serialize(&self.value)?);
        }

        Ok(())
    }

    fn read(&mut self, buf: &mut ReadBuffer<'_>, _arena: &'a Arena) -> Result<(), InternalError> {
        if !buf.read_bool()? {
            self.value = Value::Null;
            return Ok(());
        }

        let max_bytes = buf.limits().max_value_bytes;
        let (value, consumed) = serialize::deserialize_prefix::<Value>(buf.peek_rest(), max_bytes)?;
        buf.advance(consumed)?;
        self.value = value;

        Ok(())
    }
}
