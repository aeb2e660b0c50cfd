use crate::{aggregate::AggregateKind, error::InternalError};
use repval_primitives::{ScalarKind, SlotStorage};

///
/// AggregateSpec
///
/// Validated pairing of one aggregate function with its argument scalar
/// kind. Construction fails before any state exists.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AggregateSpec {
    kind: AggregateKind,
    scalar: ScalarKind,
}

impl AggregateSpec {
    pub fn new(kind: AggregateKind, scalar: ScalarKind) -> Result<Self, InternalError> {
        if kind.requires_ordering() && !scalar.supports_ordering() {
            return Err(InternalError::aggregate_illegal_argument(format!(
                "illegal type {scalar} of argument of aggregate function {kind}: values of that type are not comparable"
            )));
        }

        Ok(Self { kind, scalar })
    }

    #[must_use]
    pub const fn kind(&self) -> AggregateKind {
        self.kind
    }

    #[must_use]
    pub const fn scalar(&self) -> ScalarKind {
        self.scalar
    }

    /// Check that a slot with `storage` and `fixed_width` can hold the
    /// argument scalar kind.
    pub fn check_storage(
        &self,
        storage: SlotStorage,
        fixed_width: Option<usize>,
    ) -> Result<(), InternalError> {
        if storage != self.scalar.storage() || fixed_width != self.scalar.fixed_width() {
            return Err(InternalError::aggregate_illegal_argument(format!(
                "aggregate function {} over {} needs {:?} storage of width {:?}, slot provides {storage:?} of width {fixed_width:?}",
                self.kind,
                self.scalar,
                self.scalar.storage(),
                self.scalar.fixed_width(),
            )));
        }

        Ok(())
    }
}
