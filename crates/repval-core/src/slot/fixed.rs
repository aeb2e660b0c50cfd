use crate::{
    arena::Arena,
    column::{Column, PrimitiveColumn},
    compile::{NativeScalar, StateLayout},
    error::InternalError,
    serialize::{ReadBuffer, WriteBuffer},
    slot::Slot,
};
use derive_more::{Display, From};
use repval_primitives::{NativeKind, SlotStorage};
use std::{
    cmp::Ordering,
    fmt,
    mem::{align_of, size_of},
};

///
/// FixedValue
///
/// Fixed-width value type a [`FixedSlot`] can hold. The wire encoding is the
/// little-endian image of exactly `WIDTH` bytes.
///

pub trait FixedValue: Copy + Default + PartialOrd + fmt::Debug {
    const WIDTH: usize;

    /// Machine type used by generated code, `None` when not lowerable.
    const NATIVE: Option<NativeKind>;

    fn write_le(self, buf: &mut WriteBuffer);

    fn read_le(buf: &mut ReadBuffer<'_>) -> Result<Self, InternalError>;

    #[must_use]
    fn to_native(self) -> Option<NativeScalar> {
        None
    }
}

macro_rules! impl_fixed_value {
    ($($ty:ty => $native:ident, $scalar:ident);* $(;)?) => {
        $(
            impl FixedValue for $ty {
                const WIDTH: usize = size_of::<$ty>();
                const NATIVE: Option<NativeKind> = Some(NativeKind::$native);

                fn write_le(self, buf: &mut WriteBuffer) {
                    buf.write_bytes(&self.to_le_bytes());
                }

                fn read_le(buf: &mut ReadBuffer<'_>) -> Result<Self, InternalError> {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(buf.read_exact(size_of::<$ty>())?);

                    Ok(Self::from_le_bytes(raw))
                }

                fn to_native(self) -> Option<NativeScalar> {
                    Some(NativeScalar::$scalar(self.into()))
                }
            }
        )*
    };
}

macro_rules! impl_wide_fixed_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedValue for $ty {
                const WIDTH: usize = size_of::<$ty>();
                const NATIVE: Option<NativeKind> = None;

                fn write_le(self, buf: &mut WriteBuffer) {
                    buf.write_bytes(&self.to_le_bytes());
                }

                fn read_le(buf: &mut ReadBuffer<'_>) -> Result<Self, InternalError> {
                    let mut raw = [0u8; size_of::<$ty>()];
                    raw.copy_from_slice(buf.read_exact(size_of::<$ty>())?);

                    Ok(Self::from_le_bytes(raw))
                }
            }
        )*
    };
}

impl_fixed_value! {
    i8 => I8, Int;
    i16 => I16, Int;
    i32 => I32, Int;
    i64 => I64, Int;
    u8 => U8, UInt;
    u16 => U16, UInt;
    u32 => U32, UInt;
    u64 => U64, UInt;
    f32 => F32, F32;
    f64 => F64, F64;
}

impl_wide_fixed_value!(i128, u128);

impl FixedValue for bool {
    const WIDTH: usize = 1;
    const NATIVE: Option<NativeKind> = Some(NativeKind::Bool);

    fn write_le(self, buf: &mut WriteBuffer) {
        buf.write_bool(self);
    }

    fn read_le(buf: &mut ReadBuffer<'_>) -> Result<Self, InternalError> {
        buf.read_bool()
    }

    fn to_native(self) -> Option<NativeScalar> {
        Some(NativeScalar::Bool(self))
    }
}

///
/// Decimal32 / Decimal64 / Decimal128
///
/// Scaled decimal stored as its raw integer mantissa. The scale is a
/// property of the column type and never enters the state.
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Decimal32(pub i32);

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Decimal64(pub i64);

#[derive(Clone, Copy, Debug, Default, Display, Eq, From, Hash, Ord, PartialEq, PartialOrd)]
pub struct Decimal128(pub i128);

macro_rules! impl_decimal_value {
    ($($ty:ident($inner:ty)),* $(,)?) => {
        $(
            impl FixedValue for $ty {
                const WIDTH: usize = <$inner as FixedValue>::WIDTH;
                const NATIVE: Option<NativeKind> = None;

                fn write_le(self, buf: &mut WriteBuffer) {
                    self.0.write_le(buf);
                }

                fn read_le(buf: &mut ReadBuffer<'_>) -> Result<Self, InternalError> {
                    <$inner as FixedValue>::read_le(buf).map(Self)
                }
            }
        )*
    };
}

impl_decimal_value!(Decimal32(i32), Decimal64(i64), Decimal128(i128));

///
/// FixedSlot
///
/// `has` flag followed by the value; `value` is meaningful only while `has`.
/// The `repr(C)` layout is the state image generated code operates on.
///

#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct FixedSlot<T> {
    has: bool,
    value: T,
}

impl<T: FixedValue> FixedSlot<T> {
    // repr(C): the value follows the one-byte flag at its own alignment.
    const VALUE_OFFSET: usize = align_of::<T>();

    /// Build a populated slot.
    #[must_use]
    pub const fn new(value: T) -> Self {
        Self { has: true, value }
    }

    #[must_use]
    pub fn value(&self) -> Option<T> {
        self.has.then_some(self.value)
    }

    /// Encode this slot as the native state image generated code reads.
    #[must_use]
    pub fn state_image(&self) -> Option<Vec<u8>> {
        let layout = <Self as Slot<'static>>::native_layout()?;
        let native = self.value.to_native()?;

        layout.encode(self.has, native).ok()
    }
}

impl<'a, T: FixedValue> Slot<'a> for FixedSlot<T> {
    type Column = PrimitiveColumn<T>;

    const STORAGE: SlotStorage = SlotStorage::Fixed;
    const FIXED_WIDTH: Option<usize> = Some(T::WIDTH);

    fn has(&self) -> bool {
        self.has
    }

    fn change(&mut self, column: &Self::Column, row: usize, _arena: &'a Arena) {
        self.has = true;
        self.value = column.get(row);
    }

    fn change_from(&mut self, source: &Self, _arena: &'a Arena) {
        self.has = true;
        self.value = source.value;
    }

    fn compare_row(&self, column: &Self::Column, row: usize) -> Option<Ordering> {
        if !self.has {
            return None;
        }

        column.get(row).partial_cmp(&self.value)
    }

    fn compare_slot(&self, source: &Self) -> Option<Ordering> {
        if !self.has || !source.has {
            return None;
        }

        source.value.partial_cmp(&self.value)
    }

    fn is_equal_to(&self, column: &Self::Column, row: usize) -> bool {
        self.has && column.get(row) == self.value
    }

    fn is_equal_to_slot(&self, source: &Self) -> bool {
        self.has && source.has && source.value == self.value
    }

    fn insert_result_into(&self, output: &mut Self::Column) {
        if self.has {
            output.push(self.value);
        } else {
            output.push_default();
        }
    }

    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        buf.write_bool(self.has);
        if self.has {
            self.value.write_le(buf);
        }

        Ok(())
    }

    fn read(&mut self, buf: &mut ReadBuffer<'_>, _arena: &'a Arena) -> Result<(), InternalError> {
        let has = buf.read_bool()?;
        let value = if has { T::read_le(buf)? } else { T::default() };

        self.has = has;
        self.value = value;

        Ok(())
    }

    fn native_layout() -> Option<StateLayout> {
        T::NATIVE.map(|native| StateLayout::new(native, Self::VALUE_OFFSET, size_of::<Self>()))
    }
}
