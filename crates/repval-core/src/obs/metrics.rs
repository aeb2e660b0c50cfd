use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for aggregate state operations.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) kinds: BTreeMap<&'static str, KindCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EventOps {
    // Row ingestion
    pub batches: u64,
    pub rows_scanned: u64,
    pub batches_short_circuited: u64,

    // Partial aggregation
    pub merges: u64,

    // Wire format
    pub states_serialized: u64,
    pub states_deserialized: u64,
    pub bytes_serialized: u64,
    pub bytes_deserialized: u64,

    // Arena usage
    pub arena_allocations: u64,
    pub arena_bytes: u64,
    pub string_overflow_grows: u64,

    // Code generation
    pub programs_emitted: u64,
}

///
/// KindCounters
/// Per-function counters keyed by aggregate function name.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KindCounters {
    pub batches: u64,
    pub rows_scanned: u64,
    pub merges: u64,
    pub states_serialized: u64,
    pub states_deserialized: u64,
}

///
/// EventReport
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EventReport {
    pub ops: EventOps,
    pub kinds: Vec<(String, KindCounters)>,
}

impl EventReport {
    /// Return the per-function counters for one function name.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<&KindCounters> {
        self.kinds
            .iter()
            .find(|(kind, _)| kind == name)
            .map(|(_, counters)| counters)
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Snapshot the current counters.
pub(crate) fn report() -> EventReport {
    with_state(|m| EventReport {
        ops: m.ops.clone(),
        kinds: m
            .kinds
            .iter()
            .map(|(name, counters)| ((*name).to_string(), counters.clone()))
            .collect(),
    })
}
