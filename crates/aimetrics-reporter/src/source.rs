//! Metric sources: where a reporting cycle reads its snapshot from.
//!
//! `Registry` is the in-process source. Counters and gauges are owned here;
//! histogram, meter and timer statistics come from external collaborators
//! registered as `*Source` trait objects. Names are plain strings and the
//! registry keeps one metric per name.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use aimetrics_core::error::{AimetricsError, Result};
use aimetrics_core::{
    GaugeValue, HistogramSource, MeterSource, MetricKind, MetricSet, TimerSource,
};

use crate::filter::MetricFilter;

/// Produces the filtered snapshot for one reporting cycle.
pub trait MetricSource: Send + Sync {
    /// Read every metric accepted by `filter`.
    fn snapshot(&self, filter: &dyn MetricFilter) -> MetricSet;
}

/// A fixed set acts as its own source.
impl MetricSource for MetricSet {
    fn snapshot(&self, filter: &dyn MetricFilter) -> MetricSet {
        self.retain_matching(|name, kind| filter.matches(name, kind))
    }
}

/// Join non-empty name parts with `.`.
pub fn metric_name(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(".")
}

/// Monotonic-by-convention integer count.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    /// Increment by 1.
    pub fn inc(&self) {
        self.inc_by(1);
    }

    /// Increment by an arbitrary value.
    pub fn inc_by(&self, n: i64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    /// Decrement by 1.
    pub fn dec(&self) {
        self.count.fetch_sub(1, Ordering::Relaxed);
    }

    /// Current count.
    pub fn count(&self) -> i64 {
        self.count.load(Ordering::Relaxed)
    }
}

type GaugeFn = Arc<dyn Fn() -> GaugeValue + Send + Sync>;

#[derive(Clone)]
enum Registered {
    Gauge(GaugeFn),
    Counter(Arc<Counter>),
    Histogram(Arc<dyn HistogramSource>),
    Meter(Arc<dyn MeterSource>),
    Timer(Arc<dyn TimerSource>),
}

impl Registered {
    fn kind(&self) -> MetricKind {
        match self {
            Registered::Gauge(_) => MetricKind::Gauge,
            Registered::Counter(_) => MetricKind::Counter,
            Registered::Histogram(_) => MetricKind::Histogram,
            Registered::Meter(_) => MetricKind::Meter,
            Registered::Timer(_) => MetricKind::Timer,
        }
    }
}

/// In-process registry keyed by metric name.
#[derive(Default)]
pub struct Registry {
    metrics: DashMap<String, Registered>,
}

impl Registry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the counter `name`.
    pub fn counter(&self, name: &str) -> Result<Arc<Counter>> {
        let entry = self
            .metrics
            .entry(name.to_string())
            .or_insert_with(|| Registered::Counter(Arc::new(Counter::default())));
        match entry.value() {
            Registered::Counter(c) => Ok(Arc::clone(c)),
            other => Err(clash(name, other.kind(), MetricKind::Counter)),
        }
    }

    /// Register a gauge read through `read` at every snapshot.
    pub fn register_gauge<F, V>(&self, name: &str, read: F) -> Result<()>
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<GaugeValue>,
    {
        self.insert(name, Registered::Gauge(Arc::new(move || -> GaugeValue { read().into() })))
    }

    /// Register an externally computed histogram.
    pub fn register_histogram(&self, name: &str, source: Arc<dyn HistogramSource>) -> Result<()> {
        self.insert(name, Registered::Histogram(source))
    }

    /// Register an externally computed meter.
    pub fn register_meter(&self, name: &str, source: Arc<dyn MeterSource>) -> Result<()> {
        self.insert(name, Registered::Meter(source))
    }

    /// Register an externally computed timer.
    pub fn register_timer(&self, name: &str, source: Arc<dyn TimerSource>) -> Result<()> {
        self.insert(name, Registered::Timer(source))
    }

    /// Remove `name`. Returns whether something was registered under it.
    pub fn remove(&self, name: &str) -> bool {
        self.metrics.remove(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered metrics.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    fn insert(&self, name: &str, metric: Registered) -> Result<()> {
        match self.metrics.entry(name.to_string()) {
            Entry::Occupied(existing) => Err(AimetricsError::BadConfig(format!(
                "metric {name} is already registered as a {}",
                existing.get().kind()
            ))),
            Entry::Vacant(slot) => {
                tracing::debug!(metric = %name, kind = %metric.kind(), "metric registered");
                slot.insert(metric);
                Ok(())
            }
        }
    }
}

impl MetricSource for Registry {
    fn snapshot(&self, filter: &dyn MetricFilter) -> MetricSet {
        // Clone handles out first so gauge closures never run under a shard lock.
        let selected: Vec<(String, Registered)> = self
            .metrics
            .iter()
            .filter(|r| filter.matches(r.key(), r.value().kind()))
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();

        let mut set = MetricSet::new();
        for (name, metric) in selected {
            match metric {
                Registered::Gauge(read) => {
                    set.gauges.insert(name, read());
                }
                Registered::Counter(c) => {
                    set.counters.insert(name, c.count());
                }
                Registered::Histogram(h) => {
                    set.histograms.insert(name, h.snapshot());
                }
                Registered::Meter(m) => {
                    set.meters.insert(name, m.snapshot());
                }
                Registered::Timer(t) => {
                    set.timers.insert(name, t.snapshot());
                }
            }
        }
        set
    }
}

fn clash(name: &str, existing: MetricKind, wanted: MetricKind) -> AimetricsError {
    AimetricsError::BadConfig(format!(
        "metric {name} is a {existing}, not a {wanted}"
    ))
}
