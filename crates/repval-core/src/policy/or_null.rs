use crate::{
    aggregate::AggregateKind,
    arena::Arena,
    column::NullableColumn,
    error::InternalError,
    policy::Policy,
    serialize::{ReadBuffer, WriteBuffer},
    slot::Slot,
};
use derive_more::{Deref, DerefMut};

const FLAG_SEEN: u8 = 0b01;
const FLAG_CONFLICT: u8 = 0b10;

///
/// OrNull
///
/// The first value seen becomes the candidate; any later unequal value sets
/// a conflict that is never cleared. Emits null on conflict or when nothing
/// was seen.
///
/// Wire layout: the wrapped slot payload followed by one flags byte
/// (bit 0: a value was seen, bit 1: conflict).
///

#[derive(Debug, Default, Deref, DerefMut)]
pub struct OrNull<S> {
    #[deref]
    #[deref_mut]
    slot: S,
    seen: bool,
    conflict: bool,
}

impl<S> OrNull<S> {
    #[must_use]
    pub const fn is_conflicted(&self) -> bool {
        self.conflict
    }
}

impl<'a, S: Slot<'a>> Policy<'a> for OrNull<S> {
    type Slot = S;
    type Output = NullableColumn<S::Column>;

    const KIND: AggregateKind = AggregateKind::SingleValueOrNull;

    fn slot(&self) -> &S {
        &self.slot
    }

    fn change_if_better(&mut self, column: &S::Column, row: usize, arena: &'a Arena) -> bool {
        if !self.seen {
            self.seen = true;
            self.slot.change(column, row, arena);
            return true;
        }

        if !self.slot.is_equal_to(column, row) {
            self.conflict = true;
        }

        false
    }

    // Conflicts OR together, so merge order never matters.
    fn change_if_better_from(&mut self, source: &Self, arena: &'a Arena) -> bool {
        if !source.seen {
            return false;
        }

        self.conflict |= source.conflict;

        if !self.seen {
            self.seen = true;
            self.slot.change_from(&source.slot, arena);
            return true;
        }

        if !self.slot.is_equal_to_slot(&source.slot) {
            self.conflict = true;
        }

        false
    }

    fn insert_result_into(&self, output: &mut Self::Output) {
        if self.conflict || !self.seen {
            output.push_null();
        } else {
            output.push_with(|nested| self.slot.insert_result_into(nested));
        }
    }

    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        self.slot.write(buf)?;

        let mut flags = 0;
        if self.seen {
            flags |= FLAG_SEEN;
        }
        if self.conflict {
            flags |= FLAG_CONFLICT;
        }
        buf.write_u8(flags);

        Ok(())
    }

    fn read(&mut self, buf: &mut ReadBuffer<'_>, arena: &'a Arena) -> Result<(), InternalError> {
        self.slot.read(buf, arena)?;

        let flags = buf.read_u8()?;
        if flags & !(FLAG_SEEN | FLAG_CONFLICT) != 0 {
            return Err(InternalError::slot_corruption(format!(
                "invalid singleValueOrNull flags byte {flags:#04x}"
            )));
        }

        self.seen = flags & FLAG_SEEN != 0;
        self.conflict = flags & FLAG_CONFLICT != 0;

        Ok(())
    }
}
