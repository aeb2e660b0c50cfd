use crate::{
    arena::Arena,
    column::{Column, StringColumn},
    error::InternalError,
    obs::sink::{self, MetricsEvent},
    serialize::{ReadBuffer, WriteBuffer},
    slot::Slot,
};
use repval_primitives::SlotStorage;
use std::{cmp::Ordering, fmt, mem::size_of};

/// Total in-state footprint of a string slot, on every pointer width.
pub const AUTOMATIC_STORAGE_SIZE: usize = 64;

/// Longest value kept inline; longer values move to arena overflow storage.
pub const MAX_SMALL_STRING_SIZE: usize =
    AUTOMATIC_STORAGE_SIZE - size_of::<i32>() - size_of::<Option<&mut [u8]>>();

const EMPTY: i32 = -1;

///
/// StringSlot
///
/// Byte string state with inline small-string storage.
///
/// A stored value is its content followed by one terminating zero byte, and
/// `size` counts that terminator; `size` is `-1` while empty. Stored values
/// up to [`MAX_SMALL_STRING_SIZE`] bytes live in `inline`; longer ones live
/// in an arena buffer whose length is the current capacity, always a power
/// of two. The overflow buffer is borrowed from the arena and kept for reuse
/// when a later value fits inline, so capacity never shrinks.
///
/// # Panics
///
/// Recording a row of `i32::MAX` bytes or more panics: the length field is
/// 32-bit. Columns handed to an aggregate must keep rows below that bound.
///

pub struct StringSlot<'a> {
    size: i32,
    overflow: Option<&'a mut [u8]>,
    inline: [u8; MAX_SMALL_STRING_SIZE],
}

const _: () = assert!(size_of::<StringSlot<'static>>() == AUTOMATIC_STORAGE_SIZE);

impl<'a> StringSlot<'a> {
    /// Borrow the stored content without its terminator; empty while no
    /// value is recorded.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        let stored = self.stored();

        &stored[..stored.len().saturating_sub(1)]
    }

    /// Current overflow capacity in bytes; zero before the first large value.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.overflow.as_deref().map_or(0, <[u8]>::len)
    }

    // Content plus terminator, exactly as counted by `size`.
    fn stored(&self) -> &[u8] {
        let Ok(len) = usize::try_from(self.size) else {
            return &[];
        };

        if len <= MAX_SMALL_STRING_SIZE {
            &self.inline[..len]
        } else {
            self.overflow.as_deref().map_or(&[][..], |buf| &buf[..len])
        }
    }

    fn store(&mut self, content: &[u8], arena: &'a Arena) {
        let len = content.len() + 1;
        let Ok(size) = i32::try_from(len) else {
            panic!("string state of {len} bytes does not fit the i32 length field");
        };

        let dst = if len <= MAX_SMALL_STRING_SIZE {
            &mut self.inline[..len]
        } else {
            &mut self.reserve(len, arena)[..len]
        };
        dst[..content.len()].copy_from_slice(content);
        dst[content.len()] = 0;

        self.size = size;
    }

    // Grow only when the current buffer is too small; the old buffer stays
    // with the arena.
    fn reserve(&mut self, len: usize, arena: &'a Arena) -> &mut [u8] {
        let buf = match self.overflow.take() {
            Some(buf) if buf.len() >= len => buf,
            previous => {
                let capacity = len.next_power_of_two();
                tracing::debug!(
                    from = previous.as_deref().map_or(0, <[u8]>::len),
                    to = capacity,
                    "growing string state overflow buffer"
                );
                sink::record(MetricsEvent::StringOverflowGrow {
                    capacity: capacity as u64,
                });

                arena.alloc(capacity)
            }
        };

        self.overflow.insert(buf)
    }
}

impl Default for StringSlot<'_> {
    fn default() -> Self {
        Self {
            size: EMPTY,
            overflow: None,
            inline: [0; MAX_SMALL_STRING_SIZE],
        }
    }
}

impl fmt::Debug for StringSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringSlot")
            .field("size", &self.size)
            .field("capacity", &self.capacity())
            .field("bytes", &String::from_utf8_lossy(self.bytes()))
            .finish()
    }
}

impl<'a> Slot<'a> for StringSlot<'a> {
    type Column = StringColumn;

    const STORAGE: SlotStorage = SlotStorage::String;

    fn has(&self) -> bool {
        self.size >= 0
    }

    fn change(&mut self, column: &Self::Column, row: usize, arena: &'a Arena) {
        self.store(column.get(row), arena);
    }

    fn change_from(&mut self, source: &Self, arena: &'a Arena) {
        self.store(source.bytes(), arena);
    }

    fn compare_row(&self, column: &Self::Column, row: usize) -> Option<Ordering> {
        self.has().then(|| column.get(row).cmp(self.bytes()))
    }

    fn compare_slot(&self, source: &Self) -> Option<Ordering> {
        (self.has() && source.has()).then(|| source.bytes().cmp(self.bytes()))
    }

    fn is_equal_to(&self, column: &Self::Column, row: usize) -> bool {
        self.has() && column.get(row) == self.bytes()
    }

    fn is_equal_to_slot(&self, source: &Self) -> bool {
        self.has() && source.has() && source.bytes() == self.bytes()
    }

    fn insert_result_into(&self, output: &mut Self::Column) {
        if self.has() {
            output.push(self.bytes());
        } else {
            output.push_default();
        }
    }

    // Legacy-compatible layout: an empty state is length 1 plus one zero
    // byte; a value is written with its terminator, counted in the length.
    fn write(&self, buf: &mut WriteBuffer) -> Result<(), InternalError> {
        if !self.has() {
            buf.write_i32(1);
            buf.write_u8(0);
            return Ok(());
        }

        buf.write_i32(self.size);
        buf.write_bytes(self.stored());

        Ok(())
    }

    // One trailing zero is the terminator. Payloads from the generation
    // that did not count it carry none and get one on store.
    fn read(&mut self, buf: &mut ReadBuffer<'_>, arena: &'a Arena) -> Result<(), InternalError> {
        let size = buf.read_i32()?;
        if size == EMPTY {
            self.size = EMPTY;
            return Ok(());
        }

        let max = buf.limits().max_string_bytes;
        let len = usize::try_from(size)
            .ok()
            .filter(|len| *len <= max && size < i32::MAX)
            .ok_or_else(|| {
                InternalError::slot_corruption(format!(
                    "invalid string state length {size} (limit {max})"
                ))
            })?;

        let payload = buf.read_exact(len)?;
        let content = payload.strip_suffix(&[0u8]).unwrap_or(payload);
        self.store(content, arena);

        Ok(())
    }

    fn allocates_memory_in_arena() -> bool {
        true
    }
}
