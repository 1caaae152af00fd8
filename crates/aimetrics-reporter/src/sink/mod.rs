//! Telemetry sinks: where flattened records go.
//!
//! A sink receives one `track_metric` call per record and owns whatever
//! transport, batching or retry happens after that. Errors are returned to
//! the reporter, which keeps going and reports them at the end of the cycle.

mod channel;
mod json_lines;
mod log;
mod memory;

pub use channel::ChannelSink;
pub use json_lines::JsonLinesSink;
pub use log::LogSink;
pub use memory::MemorySink;

use std::sync::Arc;

use aimetrics_core::Result;

/// Receiver of flattened records, one call per record.
pub trait TelemetrySink: Send + Sync {
    fn track_metric(&self, name: &str, value: f32) -> Result<()>;
}

impl<S: TelemetrySink + ?Sized> TelemetrySink for Arc<S> {
    fn track_metric(&self, name: &str, value: f32) -> Result<()> {
        (**self).track_metric(name, value)
    }
}
