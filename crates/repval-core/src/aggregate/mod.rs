//! Module: aggregate
//! Responsibility: the uniform entry point an aggregation framework calls
//! per row, per batch, per merge and per (de)serialization.
//! Does not own: group assignment, state memory lifetime, arena lifetime.
//! Boundary: every decision is delegated to the policy/slot pair `P`.

mod kind;
mod spec;

#[cfg(test)]
mod tests;

use crate::{
    arena::Arena,
    column::Column,
    compile::{NativeCompiler, StateProgram},
    error::InternalError,
    obs::sink::{self, MetricsEvent},
    policy::{InputColumn, Policy},
    serialize::{ReadBuffer, WriteBuffer},
    slot::Slot,
};
use repval_primitives::ScalarKind;
use std::{fmt, marker::PhantomData, ops::Range};

// re-exports
pub use kind::AggregateKind;
pub use spec::AggregateSpec;

///
/// SingleValueAggregate
///
/// Aggregator adapter over one policy/slot pair. States are plain `P`
/// values owned by the caller; the adapter itself is stateless apart from
/// its validated [`AggregateSpec`].
///
/// One state must not be mutated by two workers at once; merging
/// independently built states is always allowed.
///

pub struct SingleValueAggregate<'a, P> {
    spec: AggregateSpec,
    _marker: PhantomData<fn(&'a Arena) -> P>,
}

impl<'a, P: Policy<'a>> SingleValueAggregate<'a, P> {
    /// Build the adapter for an argument of kind `scalar`.
    ///
    /// Fails with an illegal-argument error when the function needs ordering
    /// the kind does not have, or when the policy's slot cannot store it.
    pub fn try_new(scalar: ScalarKind) -> Result<Self, InternalError> {
        let spec = AggregateSpec::new(P::KIND, scalar)?;
        spec.check_storage(
            <P::Slot as Slot<'a>>::STORAGE,
            <P::Slot as Slot<'a>>::FIXED_WIDTH,
        )?;

        Ok(Self {
            spec,
            _marker: PhantomData,
        })
    }

    #[must_use]
    pub const fn spec(&self) -> AggregateSpec {
        self.spec
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        P::KIND.name()
    }

    #[must_use]
    pub const fn result_is_nullable(&self) -> bool {
        P::KIND.result_is_nullable()
    }

    #[must_use]
    pub fn create_state(&self) -> P {
        P::default()
    }

    #[must_use]
    pub fn allocates_memory_in_arena(&self) -> bool {
        <P::Slot as Slot<'a>>::allocates_memory_in_arena()
    }

    /// Fold one row into `state`. Panics when `row` is out of range, or when
    /// a string row does not fit the 32-bit state length.
    pub fn add(&self, state: &mut P, column: &InputColumn<'a, P>, row: usize, arena: &'a Arena) {
        state.change_if_better(column, row, arena);
    }

    /// Fold a run of `length` rows that all equal row 0 of `column`.
    pub fn add_many_defaults(
        &self,
        state: &mut P,
        column: &InputColumn<'a, P>,
        length: usize,
        arena: &'a Arena,
    ) {
        state.add_many_defaults(column, length, arena);
    }

    /// Fold `rows` of `column` into `state`, skipping rows whose filter flag
    /// is false or whose null flag is true.
    pub fn add_batch(
        &self,
        state: &mut P,
        column: &InputColumn<'a, P>,
        rows: Range<usize>,
        arena: &'a Arena,
        filter: Option<&[bool]>,
        null_map: Option<&[bool]>,
    ) -> Result<(), InternalError> {
        check_rows(&rows, column.len(), "input column")?;
        if let Some(filter) = filter {
            check_rows(&rows, filter.len(), "filter")?;
        }
        if let Some(null_map) = null_map {
            check_rows(&rows, null_map.len(), "null map")?;
        }

        let kind = P::KIND;
        if kind.is_any() && state.has() {
            sink::record(MetricsEvent::Batch {
                kind,
                rows_scanned: 0,
                short_circuited: true,
            });
            return Ok(());
        }

        let end = rows.end;
        let mut rows_scanned = 0u64;
        let mut short_circuited = false;

        for row in rows {
            rows_scanned += 1;

            if filter.is_some_and(|flags| !flags[row]) || null_map.is_some_and(|nulls| nulls[row])
            {
                continue;
            }

            state.change_if_better(column, row, arena);
            if kind.is_any() {
                short_circuited = row + 1 < end;
                break;
            }
        }

        sink::record(MetricsEvent::Batch {
            kind,
            rows_scanned,
            short_circuited,
        });

        Ok(())
    }

    /// Merge `src` into `dst`.
    pub fn merge(&self, dst: &mut P, src: &P, arena: &'a Arena) {
        dst.change_if_better_from(src, arena);
        sink::record(MetricsEvent::Merge { kind: P::KIND });
    }

    pub fn serialize(&self, state: &P, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        let start = buf.len();
        state.write(buf)?;

        sink::record(MetricsEvent::Serialize {
            kind: P::KIND,
            bytes: (buf.len() - start) as u64,
        });

        Ok(())
    }

    /// Replace `state` with one read from `buf`.
    ///
    /// Corrupt input is fatal for this state and is not retried here.
    pub fn deserialize(
        &self,
        state: &mut P,
        buf: &mut ReadBuffer<'_>,
        arena: &'a Arena,
    ) -> Result<(), InternalError> {
        let start = buf.position();

        if let Err(err) = state.read(buf, arena) {
            if err.is_corruption() {
                tracing::warn!(
                    kind = self.name(),
                    offset = start,
                    error = %err,
                    "corrupt aggregate state"
                );
            }
            return Err(err);
        }

        sink::record(MetricsEvent::Deserialize {
            kind: P::KIND,
            bytes: (buf.position() - start) as u64,
        });

        Ok(())
    }

    /// Emit the final value of `state` into `output`.
    pub fn insert_result_into(&self, state: &P, output: &mut P::Output) {
        state.insert_result_into(output);
    }

    // compilation

    #[must_use]
    pub fn is_compilable(&self) -> bool {
        self.native_compiler().is_some()
    }

    /// Emission strategy, when the policy, the slot and the argument kind
    /// all have a native form.
    #[must_use]
    pub fn native_compiler(&self) -> Option<NativeCompiler> {
        let condition = P::change_condition()?;
        let layout = <P::Slot as Slot<'a>>::native_layout()?;
        let native = self.spec.scalar().native()?;

        (native == layout.native()).then(|| NativeCompiler::new(P::KIND, condition, layout))
    }

    pub fn compile_create(&self) -> Result<StateProgram, InternalError> {
        Ok(self.require_compiler()?.compile_create())
    }

    pub fn compile_add(&self) -> Result<StateProgram, InternalError> {
        Ok(self.require_compiler()?.compile_add())
    }

    pub fn compile_merge(&self) -> Result<StateProgram, InternalError> {
        Ok(self.require_compiler()?.compile_merge())
    }

    pub fn compile_get_result(&self) -> Result<StateProgram, InternalError> {
        Ok(self.require_compiler()?.compile_get_result())
    }

    fn require_compiler(&self) -> Result<NativeCompiler, InternalError> {
        self.native_compiler().ok_or_else(|| {
            InternalError::compile_unsupported(format!(
                "{} over {} is not compilable",
                self.name(),
                self.spec.scalar()
            ))
        })
    }
}

impl<P> fmt::Debug for SingleValueAggregate<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleValueAggregate")
            .field("spec", &self.spec)
            .finish()
    }
}

fn check_rows(rows: &Range<usize>, len: usize, what: &str) -> Result<(), InternalError> {
    if rows.start > rows.end || rows.end > len {
        return Err(InternalError::aggregate_invariant(format!(
            "row range {}..{} out of bounds for {what} of length {len}",
            rows.start, rows.end
        )));
    }

    Ok(())
}
