use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use aimetrics_core::{AimetricsError, Result};

use super::TelemetrySink;

#[derive(Serialize)]
struct Line<'a> {
    name: &'a str,
    value: f32,
}

/// Writes `{"name":…,"value":…}` per record, one JSON object per line.
pub struct JsonLinesSink<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesSink<W> {
    /// Sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Give back the writer, e.g. to inspect a buffer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl JsonLinesSink<std::io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TelemetrySink for JsonLinesSink<W> {
    fn track_metric(&self, name: &str, value: f32) -> Result<()> {
        let line = serde_json::to_string(&Line { name, value })
            .map_err(|e| AimetricsError::Internal(format!("encode metric failed: {e}")))?;
        let mut out = self
            .out
            .lock()
            .map_err(|_| AimetricsError::Internal("json sink lock poisoned".into()))?;
        writeln!(out, "{line}")
            .map_err(|e| AimetricsError::SinkUnavailable(format!("write failed: {e}")))
    }
}
