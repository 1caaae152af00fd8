use tracing::Level;

use aimetrics_core::Result;

use super::TelemetrySink;

/// Writes each metric as a `tracing` event. This is the default client when
/// no sink is configured.
#[derive(Debug, Clone, Copy)]
pub struct LogSink {
    level: Level,
}

impl LogSink {
    /// Log sink emitting at `level`.
    pub fn new(level: Level) -> Self {
        Self { level }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(Level::INFO)
    }
}

impl TelemetrySink for LogSink {
    fn track_metric(&self, name: &str, value: f32) -> Result<()> {
        // event! wants a constant level
        match self.level {
            Level::ERROR => tracing::error!(metric = %name, value, "track_metric"),
            Level::WARN => tracing::warn!(metric = %name, value, "track_metric"),
            Level::INFO => tracing::info!(metric = %name, value, "track_metric"),
            Level::DEBUG => tracing::debug!(metric = %name, value, "track_metric"),
            Level::TRACE => tracing::trace!(metric = %name, value, "track_metric"),
        }
        Ok(())
    }
}
