//! Observability: runtime telemetry (metrics) and sink abstractions.
//!
//! Engine code never touches the counters directly; every event flows through
//! `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, KindCounters};
pub use sink::{MetricsEvent, MetricsSink, metrics_report, metrics_reset_all, with_metrics_sink};
