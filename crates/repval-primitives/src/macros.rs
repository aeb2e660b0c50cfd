#[macro_export]
macro_rules! scalar_kind_registry_entries {
    ($macro:ident $(, @args $($args:tt)+ )?) => {
        $macro! {
            $(
                @args $($args)+;
            )?
            @entries
            (
                Bool,
                Fixed,
                fixed_width = 1,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::Bool)
            ),
            (
                Int8,
                Fixed,
                fixed_width = 1,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::I8)
            ),
            (
                Int16,
                Fixed,
                fixed_width = 2,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::I16)
            ),
            (
                Int32,
                Fixed,
                fixed_width = 4,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::I32)
            ),
            (
                Int64,
                Fixed,
                fixed_width = 8,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::I64)
            ),
            (
                Int128,
                Fixed,
                fixed_width = 16,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                UInt8,
                Fixed,
                fixed_width = 1,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::U8)
            ),
            (
                UInt16,
                Fixed,
                fixed_width = 2,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::U16)
            ),
            (
                UInt32,
                Fixed,
                fixed_width = 4,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::U32)
            ),
            (
                UInt64,
                Fixed,
                fixed_width = 8,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::U64)
            ),
            (
                UInt128,
                Fixed,
                fixed_width = 16,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Float32,
                Fixed,
                fixed_width = 4,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::F32)
            ),
            (
                Float64,
                Fixed,
                fixed_width = 8,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::F64)
            ),
            (
                Decimal32,
                Fixed,
                fixed_width = 4,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Decimal64,
                Fixed,
                fixed_width = 8,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Decimal128,
                Fixed,
                fixed_width = 16,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Date,
                Fixed,
                fixed_width = 2,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::U16)
            ),
            (
                DateTime,
                Fixed,
                fixed_width = 4,
                supports_equality = true,
                supports_ordering = true,
                native = Some($crate::NativeKind::U32)
            ),
            (
                String,
                String,
                fixed_width = 0,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Array,
                Generic,
                fixed_width = 0,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Tuple,
                Generic,
                fixed_width = 0,
                supports_equality = true,
                supports_ordering = true,
                native = None
            ),
            (
                Map,
                Generic,
                fixed_width = 0,
                supports_equality = true,
                supports_ordering = false,
                native = None
            ),
            (
                Object,
                Generic,
                fixed_width = 0,
                supports_equality = true,
                supports_ordering = false,
                native = None
            ),
        }
    };
}

#[macro_export]
macro_rules! scalar_kind_registry {
    ($macro:ident) => {
        $crate::scalar_kind_registry_entries!($macro)
    };
    ($macro:ident, $($args:tt)+) => {
        $crate::scalar_kind_registry_entries!($macro, @args $($args)+)
    };
}

macro_rules! metadata_from_registry {
    ( @args $kind:expr; @entries $( ($scalar:ident, $storage:ident, fixed_width = $width:expr, supports_equality = $supports_equality:expr, supports_ordering = $supports_ordering:expr, native = $native:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::ScalarKind::$scalar => $crate::ScalarMetadata {
                    storage: $crate::SlotStorage::$storage,
                    fixed_width: $width,
                    supports_equality: $supports_equality,
                    supports_ordering: $supports_ordering,
                    native: $native,
                },
            )*
        }
    };
}

macro_rules! all_kinds_from_registry {
    ( @entries $( ($scalar:ident, $storage:ident, fixed_width = $width:expr, supports_equality = $supports_equality:expr, supports_ordering = $supports_ordering:expr, native = $native:expr) ),* $(,)? ) => {
        [ $( $crate::ScalarKind::$scalar ),* ]
    };
}

macro_rules! name_from_registry {
    ( @args $kind:expr; @entries $( ($scalar:ident, $storage:ident, fixed_width = $width:expr, supports_equality = $supports_equality:expr, supports_ordering = $supports_ordering:expr, native = $native:expr) ),* $(,)? ) => {
        match $kind {
            $(
                $crate::ScalarKind::$scalar => stringify!($scalar),
            )*
        }
    };
}
