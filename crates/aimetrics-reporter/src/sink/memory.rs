use std::sync::Mutex;

use aimetrics_core::{AimetricsError, Result};

use super::TelemetrySink;

/// Keeps every pushed record in memory, in push order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<(String, f32)>>,
}

impl MemorySink {
    /// Empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything pushed so far.
    pub fn records(&self) -> Vec<(String, f32)> {
        match self.records.lock() {
            Ok(g) => g.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Drain everything pushed so far.
    pub fn take(&self) -> Vec<(String, f32)> {
        match self.records.lock() {
            Ok(mut g) => std::mem::take(&mut *g),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.lock().map(|g| g.len()).unwrap_or(0)
    }

    /// True when nothing has been pushed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Last value pushed under `name`.
    pub fn get(&self, name: &str) -> Option<f32> {
        self.records()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
    }
}

impl TelemetrySink for MemorySink {
    fn track_metric(&self, name: &str, value: f32) -> Result<()> {
        let mut g = self
            .records
            .lock()
            .map_err(|_| AimetricsError::Internal("memory sink lock poisoned".into()))?;
        g.push((name.to_string(), value));
        Ok(())
    }
}
