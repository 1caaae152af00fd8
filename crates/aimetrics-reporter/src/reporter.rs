//! The reporter: one call reads a snapshot, flattens it and pushes every
//! record to the sink under the configured prefix.
//!
//! A reporter is immutable once built and keeps no state between calls, so
//! the same instance can be driven from any thread by whatever scheduler the
//! embedding application uses.

use std::fmt;
use std::sync::Arc;

use aimetrics_core::error::{AimetricsError, Result};
use aimetrics_core::{Flattener, MetricSet, TimeUnit};

use crate::filter::{AllMetrics, MetricFilter};
use crate::sink::{LogSink, TelemetrySink};
use crate::source::MetricSource;

/// Reporter name used when none is configured.
pub const DEFAULT_NAME: &str = "App Insights reporter";

/// Outcome of a fully successful reporting cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportSummary {
    /// Records pushed to the sink.
    pub emitted: usize,
    /// Gauges dropped for not holding a finite number.
    pub skipped_gauges: usize,
}

/// Immutable reporter built by `ReporterBuilder`.
pub struct Reporter {
    name: String,
    source: Arc<dyn MetricSource>,
    filter: Arc<dyn MetricFilter>,
    flattener: Flattener,
    prefix: String,
    sink: Arc<dyn TelemetrySink>,
}

impl Reporter {
    /// Start a builder reading from `source`.
    pub fn for_source(source: Arc<dyn MetricSource>) -> ReporterBuilder {
        ReporterBuilder::new(source)
    }

    /// Diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Prefix prepended to every record name.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Unit rates are reported in.
    pub fn rate_unit(&self) -> TimeUnit {
        self.flattener.rate_unit()
    }

    /// Unit durations are reported in.
    pub fn duration_unit(&self) -> TimeUnit {
        self.flattener.duration_unit()
    }

    /// Per-second rate scaled to the rate unit.
    pub fn convert_rate(&self, per_second: f64) -> f64 {
        self.flattener.convert_rate(per_second)
    }

    /// Nanosecond duration scaled to the duration unit.
    pub fn convert_duration(&self, nanos: f64) -> f64 {
        self.flattener.convert_duration(nanos)
    }

    /// One reporting tick: pull the filtered set from the source and report it.
    pub fn report_now(&self) -> Result<ReportSummary> {
        let set = self.source.snapshot(self.filter.as_ref());
        self.report(&set)
    }

    /// Flatten `set` and push every record.
    ///
    /// A failed push does not stop the cycle. If any push failed, the error
    /// carries the failure count and the first failure.
    pub fn report(&self, set: &MetricSet) -> Result<ReportSummary> {
        tracing::debug!(
            reporter = %self.name,
            gauges = set.gauges.len(),
            counters = set.counters.len(),
            histograms = set.histograms.len(),
            meters = set.meters.len(),
            timers = set.timers.len(),
            "report received"
        );

        let flat = self.flattener.flatten(set);
        for gauge in &flat.skipped_gauges {
            tracing::debug!(reporter = %self.name, gauge = %gauge, "gauge value is not a finite number, skipped");
        }

        let mut emitted = 0;
        let mut failed = 0;
        let mut first: Option<String> = None;
        for record in &flat.records {
            match self.record(&record.name, record.value) {
                Ok(()) => emitted += 1,
                Err(e) => {
                    tracing::warn!(reporter = %self.name, metric = %record.name, error = %e, "metric push failed");
                    failed += 1;
                    first.get_or_insert_with(|| e.to_string());
                }
            }
        }

        match first {
            Some(first) => Err(AimetricsError::Sink { failed, first }),
            None => Ok(ReportSummary { emitted, skipped_gauges: flat.skipped_gauges.len() }),
        }
    }

    fn record(&self, name: &str, value: f32) -> Result<()> {
        let full = format!("{}{}", self.prefix, name);
        tracing::trace!(metric = %full, value, "reporting metric");
        self.sink.track_metric(&full, value)
    }
}

impl fmt::Debug for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reporter")
            .field("name", &self.name)
            .field("filter", &self.filter.describe())
            .field("rate_unit", &self.rate_unit())
            .field("duration_unit", &self.duration_unit())
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

/// Collects reporter settings; every field but the source has a default.
pub struct ReporterBuilder {
    source: Arc<dyn MetricSource>,
    name: String,
    filter: Arc<dyn MetricFilter>,
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
    prefix: String,
    sink: Option<Arc<dyn TelemetrySink>>,
}

impl ReporterBuilder {
    /// Builder with default settings.
    pub fn new(source: Arc<dyn MetricSource>) -> Self {
        Self {
            source,
            name: DEFAULT_NAME.to_string(),
            filter: Arc::new(AllMetrics),
            rate_unit: TimeUnit::Seconds,
            duration_unit: TimeUnit::Milliseconds,
            prefix: String::new(),
            sink: None,
        }
    }

    /// Diagnostic name, used in logs only.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Filter handed to the source on every tick.
    pub fn filter(mut self, filter: impl MetricFilter + 'static) -> Self {
        self.filter = Arc::new(filter);
        self
    }

    /// Unit for reported rates.
    pub fn rate_unit(mut self, unit: TimeUnit) -> Self {
        self.rate_unit = unit;
        self
    }

    /// Unit for reported durations.
    pub fn duration_unit(mut self, unit: TimeUnit) -> Self {
        self.duration_unit = unit;
        self
    }

    /// Prepended verbatim to every record name. Use "" for none.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Sink receiving every record. Defaults to `LogSink`.
    pub fn sink(mut self, sink: impl TelemetrySink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Freeze the settings into a `Reporter`.
    pub fn build(self) -> Reporter {
        let sink = self.sink.unwrap_or_else(|| Arc::new(LogSink::default()));
        let reporter = Reporter {
            name: self.name,
            source: self.source,
            filter: self.filter,
            flattener: Flattener::new(self.rate_unit, self.duration_unit),
            prefix: self.prefix,
            sink,
        };
        tracing::info!(
            reporter = %reporter.name,
            filter = %reporter.filter.describe(),
            rate_unit = %reporter.rate_unit(),
            duration_unit = %reporter.duration_unit(),
            prefix = %reporter.prefix,
            "reporter initialized"
        );
        reporter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn reporter_is_thread_safe() {
        assert_send_sync::<Reporter>();
    }

    #[test]
    fn builder_defaults() {
        let r = Reporter::for_source(Arc::new(MetricSet::new())).build();
        assert_eq!(r.name(), "App Insights reporter");
        assert_eq!(r.prefix(), "");
        assert_eq!(r.rate_unit(), TimeUnit::Seconds);
        assert_eq!(r.duration_unit(), TimeUnit::Milliseconds);
    }

    #[test]
    fn conversions_follow_configured_units() {
        let r = Reporter::for_source(Arc::new(MetricSet::new()))
            .rate_unit(TimeUnit::Minutes)
            .duration_unit(TimeUnit::Microseconds)
            .build();
        assert_eq!(r.convert_rate(0.5), 30.0);
        assert_eq!(r.convert_duration(2_000.0), 2.0);
    }

    #[test]
    fn prefix_is_prepended_verbatim() {
        let sink = Arc::new(MemorySink::new());
        let r = Reporter::for_source(Arc::new(MetricSet::new()))
            .prefix("svc-")
            .sink(Arc::clone(&sink))
            .build();

        let summary = r.report(&MetricSet::new().with_gauge("load", 0.75)).unwrap();
        assert_eq!(summary, ReportSummary { emitted: 1, skipped_gauges: 0 });
        assert_eq!(sink.records(), [("svc-load".to_string(), 0.75)]);
    }

    #[test]
    fn debug_shows_configuration() {
        let r = Reporter::for_source(Arc::new(MetricSet::new())).prefix("p/").build();
        let s = format!("{r:?}");
        assert!(s.contains("prefix: \"p/\""));
        assert!(s.contains("filter: \"all\""));
    }
}
