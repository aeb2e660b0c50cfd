//! Module: arena
//! Responsibility: stable-lifetime overflow storage for aggregate states.
//! Does not own: per-allocation release; everything is freed with the arena.
//! Boundary: the only allocator variable-length slots may reach into.

use crate::obs::sink::{self, MetricsEvent};
use bumpalo::Bump;
use std::cell::Cell;

///
/// Arena
///
/// Bump allocator owned by the aggregation framework. Buffers handed out by
/// [`Arena::alloc`] stay valid until the arena is dropped or reset; slots
/// borrow them and never free them individually.
///
/// The arena is `!Sync`: callers sharing one across workers must synchronize
/// externally.
///

#[derive(Debug, Default)]
pub struct Arena {
    bump: Bump,
    allocations: Cell<u64>,
}

impl Arena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an arena with `bytes` pre-reserved in its first chunk.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            bump: Bump::with_capacity(bytes),
            allocations: Cell::new(0),
        }
    }

    /// Allocate a zeroed buffer of `len` bytes valid for the arena's lifetime.
    #[allow(clippy::mut_from_ref)]
    pub fn alloc(&self, len: usize) -> &mut [u8] {
        self.allocations.set(self.allocations.get().saturating_add(1));
        sink::record(MetricsEvent::ArenaAlloc {
            bytes: len as u64,
        });

        self.bump.alloc_slice_fill_copy(len, 0u8)
    }

    /// Number of `alloc` calls served so far.
    #[must_use]
    pub fn allocation_count(&self) -> u64 {
        self.allocations.get()
    }

    /// Total bytes reserved by the underlying chunks.
    #[must_use]
    pub fn allocated_bytes(&self) -> usize {
        self.bump.allocated_bytes()
    }

    /// Release every allocation at once.
    ///
    /// Requires exclusive access, so no slot can still borrow from the arena.
    pub fn reset(&mut self) {
        self.bump.reset();
        self.allocations.set(0);
    }
}

///
/// TESTS
///
