use crate::error::InternalError;
use repval_primitives::NativeKind;
use std::{cmp::Ordering, ops::Range};

///
/// NativeScalar
///
/// Machine value flowing through an emitted program. Integers are widened;
/// the declared [`NativeKind`] decides the width they are stored back with.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NativeScalar {
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
}

impl NativeScalar {
    /// Compare two scalars of the same machine type.
    ///
    /// Floats compare ordered, so any NaN operand yields `None`.
    pub(crate) fn native_cmp(self, other: Self) -> Result<Option<Ordering>, InternalError> {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => Ok(Some(a.cmp(&b))),
            (Self::Int(a), Self::Int(b)) => Ok(Some(a.cmp(&b))),
            (Self::UInt(a), Self::UInt(b)) => Ok(Some(a.cmp(&b))),
            (Self::F32(a), Self::F32(b)) => Ok(a.partial_cmp(&b)),
            (Self::F64(a), Self::F64(b)) => Ok(a.partial_cmp(&b)),
            (a, b) => Err(InternalError::compile_invariant(format!(
                "comparison between mismatched native operands {a:?} and {b:?}"
            ))),
        }
    }

    pub(crate) fn as_bool(self) -> Result<bool, InternalError> {
        match self {
            Self::Bool(value) => Ok(value),
            other => Err(InternalError::compile_invariant(format!(
                "expected a boolean operand, found {other:?}"
            ))),
        }
    }
}

///
/// StateLayout
///
/// Byte layout of a fixed-width aggregate state as seen by generated code:
/// the `has` flag at offset 0 and the value at `value_offset`.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StateLayout {
    native: NativeKind,
    value_offset: usize,
    size: usize,
}

impl StateLayout {
    pub const FLAG_OFFSET: usize = 0;

    #[must_use]
    pub const fn new(native: NativeKind, value_offset: usize, size: usize) -> Self {
        Self {
            native,
            value_offset,
            size,
        }
    }

    #[must_use]
    pub const fn native(&self) -> NativeKind {
        self.native
    }

    #[must_use]
    pub const fn value_offset(&self) -> usize {
        self.value_offset
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// All-zero state image; equal to an empty slot.
    #[must_use]
    pub fn zeroed(&self) -> Vec<u8> {
        vec![0; self.size]
    }

    /// Build a state image holding `has` and `value`.
    pub fn encode(&self, has: bool, value: NativeScalar) -> Result<Vec<u8>, InternalError> {
        let mut image = self.zeroed();
        self.store_flag(&mut image, has)?;
        self.store_value(&mut image, value)?;

        Ok(image)
    }

    pub fn load_flag(&self, image: &[u8]) -> Result<bool, InternalError> {
        self.check_image(image)?;

        Ok(image[Self::FLAG_OFFSET] != 0)
    }

    pub fn store_flag(&self, image: &mut [u8], has: bool) -> Result<(), InternalError> {
        self.check_image(image)?;
        image[Self::FLAG_OFFSET] = u8::from(has);

        Ok(())
    }

    pub fn load_value(&self, image: &[u8]) -> Result<NativeScalar, InternalError> {
        self.check_image(image)?;
        let raw = &image[self.value_range()];

        let value = match self.native {
            NativeKind::Bool => NativeScalar::Bool(raw[0] != 0),
            NativeKind::I8 => NativeScalar::Int(i8::from_le_bytes(array(raw)?).into()),
            NativeKind::I16 => NativeScalar::Int(i16::from_le_bytes(array(raw)?).into()),
            NativeKind::I32 => NativeScalar::Int(i32::from_le_bytes(array(raw)?).into()),
            NativeKind::I64 => NativeScalar::Int(i64::from_le_bytes(array(raw)?)),
            NativeKind::U8 => NativeScalar::UInt(raw[0].into()),
            NativeKind::U16 => NativeScalar::UInt(u16::from_le_bytes(array(raw)?).into()),
            NativeKind::U32 => NativeScalar::UInt(u32::from_le_bytes(array(raw)?).into()),
            NativeKind::U64 => NativeScalar::UInt(u64::from_le_bytes(array(raw)?)),
            NativeKind::F32 => NativeScalar::F32(f32::from_le_bytes(array(raw)?)),
            NativeKind::F64 => NativeScalar::F64(f64::from_le_bytes(array(raw)?)),
        };

        Ok(value)
    }

    pub fn store_value(&self, image: &mut [u8], value: NativeScalar) -> Result<(), InternalError> {
        self.check_image(image)?;

        let bytes = match (self.native, value) {
            (NativeKind::Bool, NativeScalar::Bool(v)) => vec![u8::from(v)],
            (NativeKind::I8, NativeScalar::Int(v)) => narrow_int::<i8>(v)?.to_le_bytes().to_vec(),
            (NativeKind::I16, NativeScalar::Int(v)) => narrow_int::<i16>(v)?.to_le_bytes().to_vec(),
            (NativeKind::I32, NativeScalar::Int(v)) => narrow_int::<i32>(v)?.to_le_bytes().to_vec(),
            (NativeKind::I64, NativeScalar::Int(v)) => v.to_le_bytes().to_vec(),
            (NativeKind::U8, NativeScalar::UInt(v)) => narrow_uint::<u8>(v)?.to_le_bytes().to_vec(),
            (NativeKind::U16, NativeScalar::UInt(v)) => {
                narrow_uint::<u16>(v)?.to_le_bytes().to_vec()
            }
            (NativeKind::U32, NativeScalar::UInt(v)) => {
                narrow_uint::<u32>(v)?.to_le_bytes().to_vec()
            }
            (NativeKind::U64, NativeScalar::UInt(v)) => v.to_le_bytes().to_vec(),
            (NativeKind::F32, NativeScalar::F32(v)) => v.to_le_bytes().to_vec(),
            (NativeKind::F64, NativeScalar::F64(v)) => v.to_le_bytes().to_vec(),
            (native, value) => {
                return Err(InternalError::compile_invariant(format!(
                    "cannot store {value:?} into a {native} state"
                )));
            }
        };

        image[self.value_range()].copy_from_slice(&bytes);

        Ok(())
    }

    const fn value_range(&self) -> Range<usize> {
        self.value_offset..self.value_offset + self.native.width()
    }

    fn check_image(&self, image: &[u8]) -> Result<(), InternalError> {
        if image.len() != self.size || self.value_range().end > self.size {
            return Err(InternalError::compile_invariant(format!(
                "state image of {} bytes does not match layout {self:?}",
                image.len()
            )));
        }

        Ok(())
    }
}

fn array<const N: usize>(raw: &[u8]) -> Result<[u8; N], InternalError> {
    raw.try_into().map_err(|_| {
        InternalError::compile_invariant(format!("expected {N} value bytes, found {}", raw.len()))
    })
}

fn narrow_int<T: TryFrom<i64>>(value: i64) -> Result<T, InternalError> {
    T::try_from(value).map_err(|_| {
        InternalError::compile_invariant(format!("value {value} overflows its native type"))
    })
}

fn narrow_uint<T: TryFrom<u64>>(value: u64) -> Result<T, InternalError> {
    T::try_from(value).map_err(|_| {
        InternalError::compile_invariant(format!("value {value} overflows its native type"))
    })
}
