//! aimetrics reporter library entry.
//!
//! This crate wires a metric source, a filter, and a telemetry sink into a
//! `Reporter` that flattens one snapshot per call and pushes every record.
//! It is consumed by the demo binary (`main.rs`) and by integration tests.
//! Scheduling is left to the caller.

pub mod config;
pub mod filter;
pub mod reporter;
pub mod sink;
pub mod source;

pub use filter::{AllMetrics, MetricFilter, PrefixFilter};
pub use reporter::{ReportSummary, Reporter, ReporterBuilder};
pub use sink::{ChannelSink, JsonLinesSink, LogSink, MemorySink, TelemetrySink};
pub use source::{metric_name, Counter, MetricSource, Registry};
