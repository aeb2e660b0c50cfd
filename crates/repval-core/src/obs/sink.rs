//! Metrics sink boundary.
//!
//! Slot, policy and adapter code MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::{aggregate::AggregateKind, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn MetricsSink>> = RefCell::new(None);
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    Batch {
        kind: AggregateKind,
        rows_scanned: u64,
        short_circuited: bool,
    },
    Merge {
        kind: AggregateKind,
    },
    Serialize {
        kind: AggregateKind,
        bytes: u64,
    },
    Deserialize {
        kind: AggregateKind,
        bytes: u64,
    },
    ArenaAlloc {
        bytes: u64,
    },
    StringOverflowGrow {
        capacity: u64,
    },
    ProgramEmitted {
        kind: AggregateKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default thread-local sink that writes into the global counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        match event {
            MetricsEvent::Batch {
                kind,
                rows_scanned,
                short_circuited,
            } => {
                metrics::with_state_mut(|m| {
                    m.ops.batches = m.ops.batches.saturating_add(1);
                    m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows_scanned);
                    if short_circuited {
                        m.ops.batches_short_circuited =
                            m.ops.batches_short_circuited.saturating_add(1);
                    }

                    let entry = m.kinds.entry(kind.name()).or_default();
                    entry.batches = entry.batches.saturating_add(1);
                    entry.rows_scanned = entry.rows_scanned.saturating_add(rows_scanned);
                });
            }

            MetricsEvent::Merge { kind } => {
                metrics::with_state_mut(|m| {
                    m.ops.merges = m.ops.merges.saturating_add(1);
                    let entry = m.kinds.entry(kind.name()).or_default();
                    entry.merges = entry.merges.saturating_add(1);
                });
            }

            MetricsEvent::Serialize { kind, bytes } => {
                metrics::with_state_mut(|m| {
                    m.ops.states_serialized = m.ops.states_serialized.saturating_add(1);
                    m.ops.bytes_serialized = m.ops.bytes_serialized.saturating_add(bytes);
                    let entry = m.kinds.entry(kind.name()).or_default();
                    entry.states_serialized = entry.states_serialized.saturating_add(1);
                });
            }

            MetricsEvent::Deserialize { kind, bytes } => {
                metrics::with_state_mut(|m| {
                    m.ops.states_deserialized = m.ops.states_deserialized.saturating_add(1);
                    m.ops.bytes_deserialized = m.ops.bytes_deserialized.saturating_add(bytes);
                    let entry = m.kinds.entry(kind.name()).or_default();
                    entry.states_deserialized = entry.states_deserialized.saturating_add(1);
                });
            }

            MetricsEvent::ArenaAlloc { bytes } => {
                metrics::with_state_mut(|m| {
                    m.ops.arena_allocations = m.ops.arena_allocations.saturating_add(1);
                    m.ops.arena_bytes = m.ops.arena_bytes.saturating_add(bytes);
                });
            }

            MetricsEvent::StringOverflowGrow { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.string_overflow_grows = m.ops.string_overflow_grows.saturating_add(1);
                });
            }

            MetricsEvent::ProgramEmitted { .. } => {
                metrics::with_state_mut(|m| {
                    m.ops.programs_emitted = m.ops.programs_emitted.saturating_add(1);
                });
            }
        }
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn MetricsSink` in `with_metrics_sink`.
        // - `with_metrics_sink` restores the previous pointer before returning,
        //   including unwind paths via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_METRICS_SINK.record(event);
    }
}

/// Snapshot the current thread's metrics counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset the current thread's metrics counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
pub fn with_metrics_sink<T>(sink: &dyn MetricsSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn MetricsSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope and `Guard`
    //   restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn MetricsSink, *const dyn MetricsSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
