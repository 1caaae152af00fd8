//! aimetrics core: snapshot data model, time units, error types, and the
//! flattening contract that turns metric snapshots into named float records.
//!
//! This crate carries no runtime, registry, or sink dependencies. It only
//! describes what a reporting cycle reads and what it emits, so the reporter
//! crate and downstream tooling agree on record names and values.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here.
//! Fallible paths surface as `AimetricsError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod flatten;
pub mod snapshot;
pub mod unit;

/// Shared result type.
pub use error::{AimetricsError, Result};
pub use flatten::{Flattened, Flattener, Record};
pub use snapshot::{
    GaugeValue, HistogramSnapshot, HistogramSource, MeterSnapshot, MeterSource, MetricKind,
    MetricSet, TimerSnapshot, TimerSource,
};
pub use unit::TimeUnit;
