use tokio::sync::mpsc::{self, error::TrySendError};

use aimetrics_core::{AimetricsError, Record, Result};

use super::TelemetrySink;

/// Hands records to an async consumer through a bounded channel.
///
/// Pushes never block: a full channel or a dropped receiver is reported as
/// `SinkUnavailable`, and the record is lost.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<Record>,
}

impl ChannelSink {
    /// Sink feeding an existing channel.
    pub fn new(tx: mpsc::Sender<Record>) -> Self {
        Self { tx }
    }

    /// Sink plus the receiving end, with room for `capacity` records.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<Record>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl TelemetrySink for ChannelSink {
    fn track_metric(&self, name: &str, value: f32) -> Result<()> {
        let record = Record { name: name.to_string(), value };
        self.tx.try_send(record).map_err(|e| match e {
            TrySendError::Full(r) => {
                AimetricsError::SinkUnavailable(format!("channel full, dropped {}", r.name))
            }
            TrySendError::Closed(r) => {
                AimetricsError::SinkUnavailable(format!("channel closed, dropped {}", r.name))
            }
        })
    }
}
