//! Scalar kind registry shared by the representative-value aggregate engine.
//!
//! The core crate never inspects physical types directly; it only consumes the
//! capability flags declared here (storage class, ordering, native codegen).

#[macro_use]
mod macros;

use std::fmt;

///
/// ScalarKind
///
/// Canonical scalar kind an aggregate argument column is declared with.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScalarKind {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Float32,
    Float64,
    Decimal32,
    Decimal64,
    Decimal128,
    Date,
    DateTime,
    String,
    Array,
    Tuple,
    Map,
    Object,
}

impl ScalarKind {
    /// Return the full metadata descriptor for one scalar kind.
    #[must_use]
    pub const fn metadata(self) -> ScalarMetadata {
        scalar_kind_registry!(metadata_from_registry, self)
    }

    /// Return the registry name of this scalar kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        scalar_kind_registry!(name_from_registry, self)
    }

    /// Return the slot storage class values of this kind are kept in.
    #[must_use]
    pub const fn storage(self) -> SlotStorage {
        self.metadata().storage
    }

    /// Return the in-state width for fixed storage, `None` otherwise.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        let metadata = self.metadata();
        match metadata.storage {
            SlotStorage::Fixed => Some(metadata.fixed_width),
            SlotStorage::String | SlotStorage::Generic => None,
        }
    }

    /// Return whether values of this kind support equality.
    #[must_use]
    pub const fn supports_equality(self) -> bool {
        self.metadata().supports_equality
    }

    /// Return whether values of this kind have a total order usable by min/max.
    #[must_use]
    pub const fn supports_ordering(self) -> bool {
        self.metadata().supports_ordering
    }

    /// Return the native machine type for code generation, if any.
    #[must_use]
    pub const fn native(self) -> Option<NativeKind> {
        self.metadata().native
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// ScalarMetadata
///
/// Capability metadata for one scalar kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ScalarMetadata {
    pub storage: SlotStorage,
    pub fixed_width: usize,
    pub supports_equality: bool,
    pub supports_ordering: bool,
    pub native: Option<NativeKind>,
}

///
/// SlotStorage
///
/// Storage class an aggregate state uses for values of a scalar kind.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SlotStorage {
    Fixed,
    String,
    Generic,
}

///
/// NativeKind
///
/// Machine-level representation a scalar kind lowers to in generated code.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NativeKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl NativeKind {
    /// Width in bytes of one value.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ordered list of all scalar kinds in registry order.
pub const ALL_SCALAR_KINDS: [ScalarKind; 23] = scalar_kind_registry!(all_kinds_from_registry);

///
/// TESTS
///
