//! Module: compile
//! Responsibility: optional native-code emission for fixed-width states.
//! Does not own: machine code generation; programs are handed to an external
//! backend, and `StateProgram::run` is only the reference interpreter.
//! Boundary: the adapter exposes a `NativeCompiler` only when the policy has
//! a change condition and the slot has a native layout; callers must check.

mod emit;
mod ir;
mod layout;
mod program;


use crate::{
    aggregate::AggregateKind,
    obs::sink::{self, MetricsEvent},
};

// re-exports
pub use emit::{
    ChangeCondition, emit_change, emit_change_if, emit_change_if_merge, emit_change_merge,
    emit_create, emit_get_result,
};
pub use ir::{Expr, StatePtr, Stmt};
pub use layout::{NativeScalar, StateLayout};
pub use program::{ProgramEnv, StateProgram, StateProgramBuilder};

///
/// NativeCompiler
///
/// Emission strategy for one compilable aggregate: the four state
/// transitions as programs over a fixed state layout.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NativeCompiler {
    kind: AggregateKind,
    condition: ChangeCondition,
    layout: StateLayout,
}

impl NativeCompiler {
    pub(crate) const fn new(
        kind: AggregateKind,
        condition: ChangeCondition,
        layout: StateLayout,
    ) -> Self {
        Self {
            kind,
            condition,
            layout,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub const fn condition(&self) -> ChangeCondition {
        self.condition
    }

    #[must_use]
    pub const fn layout(&self) -> StateLayout {
        self.layout
    }

    /// Zero-initialise a state.
    #[must_use]
    pub fn compile_create(&self) -> StateProgram {
        self.emit("create", emit_create)
    }

    /// Fold one row argument into a state.
    #[must_use]
    pub fn compile_add(&self) -> StateProgram {
        let arg = Expr::Arg(self.layout.native());
        self.emit("add", |b| emit_change_if(b, self.condition, arg))
    }

    /// Merge a source state into a destination state.
    #[must_use]
    pub fn compile_merge(&self) -> StateProgram {
        self.emit("merge", |b| emit_change_if_merge(b, self.condition))
    }

    /// Load the stored value; an empty state yields the zero value.
    #[must_use]
    pub fn compile_get_result(&self) -> StateProgram {
        self.emit("get_result", emit_get_result)
    }

    fn emit(
        &self,
        stage: &'static str,
        body: impl FnOnce(&mut StateProgramBuilder),
    ) -> StateProgram {
        let mut builder = StateProgramBuilder::new(self.layout);
        body(&mut builder);
        let program = builder.build();

        sink::record(MetricsEvent::ProgramEmitted { kind: self.kind });
        tracing::trace!(kind = self.kind.name(), stage, %program, "emitted state program");

        program
    }
}
