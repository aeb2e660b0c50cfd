//! Module: column
//! Responsibility: minimal indexable input/output columns consumed by slots.
//! Does not own: physical vector layout policy of the host query engine.
//! Boundary: slots read rows through these types and emit results into them.

use crate::{error::InternalError, value::Value};
use repval_primitives::ScalarKind;

///
/// Column
///
/// Output-side contract shared by every column a slot can emit into.
///

pub trait Column {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append the type-appropriate default value.
    fn push_default(&mut self);
}

///
/// PrimitiveColumn
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimitiveColumn<T> {
    data: Vec<T>,
}

impl<T: Copy + Default> PrimitiveColumn<T> {
    #[must_use]
    pub const fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Read one row; panics when `row` is out of range (caller bug).
    #[must_use]
    pub fn get(&self, row: usize) -> T {
        self.data[row]
    }

    pub fn push(&mut self, value: T) {
        self.data.push(value);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl<T> From<Vec<T>> for PrimitiveColumn<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T: Copy + Default> Column for PrimitiveColumn<T> {
    fn len(&self) -> usize {
        self.data.len()
    }

    fn push_default(&mut self) {
        self.data.push(T::default());
    }
}

///
/// StringColumn
///
/// Byte strings stored back to back; `offsets[i]` is the end of row `i`.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StringColumn {
    offsets: Vec<usize>,
    bytes: Vec<u8>,
}

impl StringColumn {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offsets: Vec::new(),
            bytes: Vec::new(),
        }
    }

    /// Return the bytes of one row; panics when `row` is out of range.
    #[must_use]
    pub fn get(&self, row: usize) -> &[u8] {
        let start = if row == 0 { 0 } else { self.offsets[row - 1] };
        &self.bytes[start..self.offsets[row]]
    }

    pub fn push(&mut self, value: &[u8]) {
        self.bytes.extend_from_slice(value);
        self.offsets.push(self.bytes.len());
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        (0..self.len()).map(|row| self.get(row))
    }
}

impl<S: AsRef<[u8]>> FromIterator<S> for StringColumn {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut column = Self::new();
        for value in iter {
            column.push(value.as_ref());
        }

        column
    }
}

impl Column for StringColumn {
    fn len(&self) -> usize {
        self.offsets.len()
    }

    fn push_default(&mut self) {
        self.offsets.push(self.bytes.len());
    }
}

///
/// ValueColumn
///
/// Boxed dynamic values; the declared scalar kind picks the default value.
///

#[derive(Clone, Debug, PartialEq)]
pub struct ValueColumn {
    kind: ScalarKind,
    values: Vec<Value>,
}

impl ValueColumn {
    #[must_use]
    pub const fn new(kind: ScalarKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub const fn from_values(kind: ScalarKind, values: Vec<Value>) -> Self {
        Self { kind, values }
    }

    #[must_use]
    pub const fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// Borrow one row; panics when `row` is out of range.
    #[must_use]
    pub fn get(&self, row: usize) -> &Value {
        &self.values[row]
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

impl Column for ValueColumn {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn push_default(&mut self) {
        self.values.push(Value::default_for(self.kind));
    }
}

///
/// NullableColumn
///
/// Nested column plus a null map; a null row still occupies a default slot
/// in the nested column so row indexes stay aligned.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct NullableColumn<C> {
    nested: C,
    null_map: Vec<bool>,
}

impl<C: Column> NullableColumn<C> {
    pub fn new(nested: C) -> Result<Self, InternalError> {
        if !nested.is_empty() {
            return Err(InternalError::column_invariant(format!(
                "nullable column must wrap an empty nested column (len={})",
                nested.len()
            )));
        }

        Ok(Self {
            nested,
            null_map: Vec::new(),
        })
    }

    /// Assemble a nullable column from parts of equal length.
    pub fn from_parts(nested: C, null_map: Vec<bool>) -> Result<Self, InternalError> {
        if nested.len() != null_map.len() {
            return Err(InternalError::column_invariant(format!(
                "nullable column parts disagree: nested={} null_map={}",
                nested.len(),
                null_map.len()
            )));
        }

        Ok(Self { nested, null_map })
    }

    #[must_use]
    pub const fn nested(&self) -> &C {
        &self.nested
    }

    #[must_use]
    pub fn null_map(&self) -> &[bool] {
        &self.null_map
    }

    #[must_use]
    pub fn is_null(&self, row: usize) -> bool {
        self.null_map[row]
    }

    pub fn push_null(&mut self) {
        self.nested.push_default();
        self.null_map.push(true);
    }

    /// Append one non-null row produced by `emit` into the nested column.
    pub(crate) fn push_with(&mut self, emit: impl FnOnce(&mut C)) {
        emit(&mut self.nested);
        self.null_map.push(false);
    }
}

impl<C: Column> Column for NullableColumn<C> {
    fn len(&self) -> usize {
        self.null_map.len()
    }

    fn push_default(&mut self) {
        self.push_null();
    }
}

///
/// TESTS
///
