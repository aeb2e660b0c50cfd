use crate::{
    aggregate::AggregateKind,
    arena::Arena,
    error::InternalError,
    policy::Policy,
    serialize::{ReadBuffer, WriteBuffer},
    slot::Slot,
};
use derive_more::{Deref, DerefMut};

///
/// AnyHeavy
///
/// Single-candidate majority vote. A value occurring in more than half of
/// the rows one state sees is always the reported value; otherwise the
/// result is some value from the input. Merging is approximate: the larger
/// counter wins, and merge order may change the result when there is no
/// strict majority.
///

#[derive(Debug, Default, Deref, DerefMut)]
pub struct AnyHeavy<S> {
    #[deref]
    #[deref_mut]
    slot: S,
    counter: u64,
}

impl<S> AnyHeavy<S> {
    #[must_use]
    pub const fn counter(&self) -> u64 {
        self.counter
    }
}

impl<'a, S: Slot<'a>> Policy<'a> for AnyHeavy<S> {
    type Slot = S;
    type Output = S::Column;

    const KIND: AggregateKind = AggregateKind::AnyHeavy;

    fn slot(&self) -> &S {
        &self.slot
    }

    fn change_if_better(&mut self, column: &S::Column, row: usize, arena: &'a Arena) -> bool {
        if self.slot.is_equal_to(column, row) {
            self.counter = self.counter.saturating_add(1);
            return false;
        }

        if self.counter == 0 {
            self.slot.change(column, row, arena);
            self.counter = 1;
            return true;
        }

        self.counter -= 1;
        false
    }

    // An empty destination counts as zero votes.
    fn change_if_better_from(&mut self, source: &Self, arena: &'a Arena) -> bool {
        if self.slot.is_equal_to_slot(&source.slot) {
            self.counter = self.counter.saturating_add(source.counter);
            return false;
        }

        if source.slot.has() && (!self.slot.has() || self.counter < source.counter) {
            self.slot.change_from(&source.slot, arena);
            self.counter = source.counter;
            return true;
        }

        self.counter = self.counter.saturating_sub(source.counter);
        false
    }

    // Every repetition is a vote.
    fn add_many_defaults(&mut self, column: &S::Column, length: usize, arena: &'a Arena) {
        for _ in 0..length {
            self.change_if_better(column, 0, arena);
        }
    }

    fn insert_result_into(&self, output: &mut S::Column) {
        self.slot.insert_result_into(output);
    }

    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        self.slot.write(buf)?;
        buf.write_u64(self.counter);

        Ok(())
    }

    fn read(&mut self, buf: &mut ReadBuffer<'_>, arena: &'a Arena) -> Result<(), InternalError> {
        self.slot.read(buf, arena)?;
        self.counter = buf.read_u64()?;

        Ok(())
    }
}
