//! Read-only snapshot data model.
//!
//! A reporting cycle reads one `MetricSet`: five name-ordered maps, one per
//! metric kind. Values are frozen at read time and discarded after the cycle.
//! Histogram, meter and timer statistics are computed elsewhere and handed in
//! through the `*Source` traits.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Value read from a gauge. Only the numeric variants are reportable.
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Text(String),
    Absent,
}

impl GaugeValue {
    /// Narrow to `f32`, or `None` when the value is not a number or the
    /// narrowed value is NaN/infinite.
    pub fn as_f32(&self) -> Option<f32> {
        let n = match *self {
            GaugeValue::Int(v) => v as f32,
            GaugeValue::UInt(v) => v as f32,
            GaugeValue::Float(v) => v as f32,
            GaugeValue::Bool(_) | GaugeValue::Text(_) | GaugeValue::Absent => return None,
        };
        n.is_finite().then_some(n)
    }
}

impl From<i64> for GaugeValue {
    fn from(v: i64) -> Self {
        GaugeValue::Int(v)
    }
}
impl From<i32> for GaugeValue {
    fn from(v: i32) -> Self {
        GaugeValue::Int(v.into())
    }
}
impl From<u64> for GaugeValue {
    fn from(v: u64) -> Self {
        GaugeValue::UInt(v)
    }
}
impl From<usize> for GaugeValue {
    fn from(v: usize) -> Self {
        GaugeValue::UInt(v as u64)
    }
}
impl From<f64> for GaugeValue {
    fn from(v: f64) -> Self {
        GaugeValue::Float(v)
    }
}
impl From<f32> for GaugeValue {
    fn from(v: f32) -> Self {
        GaugeValue::Float(v.into())
    }
}
impl From<bool> for GaugeValue {
    fn from(v: bool) -> Self {
        GaugeValue::Bool(v)
    }
}
impl From<String> for GaugeValue {
    fn from(v: String) -> Self {
        GaugeValue::Text(v)
    }
}
impl From<&str> for GaugeValue {
    fn from(v: &str) -> Self {
        GaugeValue::Text(v.to_string())
    }
}
impl<T: Into<GaugeValue>> From<Option<T>> for GaugeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(GaugeValue::Absent, Into::into)
    }
}

/// Distribution statistics. Timers store nanoseconds here.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistogramSnapshot {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub median: f64,
    pub p75: f64,
    pub p95: f64,
    pub p98: f64,
    pub p99: f64,
    pub p999: f64,
}

impl HistogramSnapshot {
    /// Snapshot of a distribution holding a single value.
    pub fn single(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            mean: value,
            std_dev: 0.0,
            median: value,
            p75: value,
            p95: value,
            p98: value,
            p99: value,
            p999: value,
        }
    }

    /// Statistics in reporting order, keyed by their record suffix.
    pub fn stats(&self) -> [(&'static str, f64); 10] {
        [
            ("min", self.min),
            ("max", self.max),
            ("mean", self.mean),
            ("stdDev", self.std_dev),
            ("median", self.median),
            ("75th", self.p75),
            ("95th", self.p95),
            ("98th", self.p98),
            ("99th", self.p99),
            ("99.9th", self.p999),
        ]
    }
}

/// Event count plus per-second rates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeterSnapshot {
    pub count: u64,
    pub mean_rate: f64,
    pub one_minute_rate: f64,
    pub five_minute_rate: f64,
    pub fifteen_minute_rate: f64,
}

impl MeterSnapshot {
    /// Rates in reporting order, keyed by their record segment.
    pub fn rates(&self) -> [(&'static str, f64); 4] {
        [
            ("meanRate", self.mean_rate),
            ("1MinuteRate", self.one_minute_rate),
            ("5MinuteRate", self.five_minute_rate),
            ("15MinuteRate", self.fifteen_minute_rate),
        ]
    }
}

/// Call counts and rates plus the duration distribution (nanoseconds).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimerSnapshot {
    pub meter: MeterSnapshot,
    pub durations: HistogramSnapshot,
}

impl TimerSnapshot {
    /// A timer that has seen exactly one call of `elapsed`.
    pub fn single_call(elapsed: Duration) -> Self {
        Self {
            meter: MeterSnapshot { count: 1, ..MeterSnapshot::default() },
            durations: HistogramSnapshot::single(elapsed.as_nanos() as f64),
        }
    }
}

/// Anything able to produce a histogram snapshot on demand.
pub trait HistogramSource: Send + Sync {
    fn snapshot(&self) -> HistogramSnapshot;
}

/// Anything able to produce a meter snapshot on demand.
pub trait MeterSource: Send + Sync {
    fn snapshot(&self) -> MeterSnapshot;
}

/// Anything able to produce a timer snapshot on demand.
pub trait TimerSource: Send + Sync {
    fn snapshot(&self) -> TimerSnapshot;
}

impl HistogramSource for HistogramSnapshot {
    fn snapshot(&self) -> HistogramSnapshot {
        *self
    }
}
impl MeterSource for MeterSnapshot {
    fn snapshot(&self) -> MeterSnapshot {
        *self
    }
}
impl TimerSource for TimerSnapshot {
    fn snapshot(&self) -> TimerSnapshot {
        *self
    }
}

impl<F> HistogramSource for F
where
    F: Fn() -> HistogramSnapshot + Send + Sync,
{
    fn snapshot(&self) -> HistogramSnapshot {
        self()
    }
}
impl<F> MeterSource for F
where
    F: Fn() -> MeterSnapshot + Send + Sync,
{
    fn snapshot(&self) -> MeterSnapshot {
        self()
    }
}
impl<F> TimerSource for F
where
    F: Fn() -> TimerSnapshot + Send + Sync,
{
    fn snapshot(&self) -> TimerSnapshot {
        self()
    }
}

/// Kind of a registered metric, as seen by filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
    Counter,
    Histogram,
    Meter,
    Timer,
}

impl MetricKind {
    /// Lower-case kind name for logs and errors.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
            MetricKind::Histogram => "histogram",
            MetricKind::Meter => "meter",
            MetricKind::Timer => "timer",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reporting cycle's worth of snapshots, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSet {
    pub gauges: BTreeMap<String, GaugeValue>,
    pub counters: BTreeMap<String, i64>,
    pub histograms: BTreeMap<String, HistogramSnapshot>,
    pub meters: BTreeMap<String, MeterSnapshot>,
    pub timers: BTreeMap<String, TimerSnapshot>,
}

impl MetricSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace gauge `name`.
    pub fn with_gauge(mut self, name: impl Into<String>, value: impl Into<GaugeValue>) -> Self {
        self.gauges.insert(name.into(), value.into());
        self
    }

    /// Add or replace counter `name`.
    pub fn with_counter(mut self, name: impl Into<String>, count: i64) -> Self {
        self.counters.insert(name.into(), count);
        self
    }

    /// Add or replace histogram `name`.
    pub fn with_histogram(mut self, name: impl Into<String>, snapshot: HistogramSnapshot) -> Self {
        self.histograms.insert(name.into(), snapshot);
        self
    }

    /// Add or replace meter `name`.
    pub fn with_meter(mut self, name: impl Into<String>, snapshot: MeterSnapshot) -> Self {
        self.meters.insert(name.into(), snapshot);
        self
    }

    /// Add or replace timer `name`.
    pub fn with_timer(mut self, name: impl Into<String>, snapshot: TimerSnapshot) -> Self {
        self.timers.insert(name.into(), snapshot);
        self
    }

    /// Total number of metrics across all kinds.
    pub fn len(&self) -> usize {
        self.gauges.len()
            + self.counters.len()
            + self.histograms.len()
            + self.meters.len()
            + self.timers.len()
    }

    /// True when no metric of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the set keeping only metrics accepted by `keep`.
    pub fn retain_matching(&self, keep: impl Fn(&str, MetricKind) -> bool) -> Self {
        fn pick<V: Clone>(
            map: &BTreeMap<String, V>,
            kind: MetricKind,
            keep: &impl Fn(&str, MetricKind) -> bool,
        ) -> BTreeMap<String, V> {
            map.iter()
                .filter(|(name, _)| keep(name, kind))
                .map(|(name, v)| (name.clone(), v.clone()))
                .collect()
        }

        Self {
            gauges: pick(&self.gauges, MetricKind::Gauge, &keep),
            counters: pick(&self.counters, MetricKind::Counter, &keep),
            histograms: pick(&self.histograms, MetricKind::Histogram, &keep),
            meters: pick(&self.meters, MetricKind::Meter, &keep),
            timers: pick(&self.timers, MetricKind::Timer, &keep),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_numeric_values_narrow_to_f32() {
        assert_eq!(GaugeValue::Int(7).as_f32(), Some(7.0));
        assert_eq!(GaugeValue::UInt(3).as_f32(), Some(3.0));
        assert_eq!(GaugeValue::Float(0.25).as_f32(), Some(0.25));
    }

    #[test]
    fn gauge_non_numbers_are_not_reportable() {
        assert_eq!(GaugeValue::Bool(true).as_f32(), None);
        assert_eq!(GaugeValue::Text("12".into()).as_f32(), None);
        assert_eq!(GaugeValue::Absent.as_f32(), None);
        assert_eq!(GaugeValue::Float(f64::NAN).as_f32(), None);
        assert_eq!(GaugeValue::Float(f64::NEG_INFINITY).as_f32(), None);
    }

    #[test]
    fn gauge_overflowing_f32_is_dropped() {
        // finite as f64, infinite once narrowed
        assert_eq!(GaugeValue::Float(1e300).as_f32(), None);
    }

    #[test]
    fn option_maps_none_to_absent() {
        assert_eq!(GaugeValue::from(None::<i64>), GaugeValue::Absent);
        assert_eq!(GaugeValue::from(Some(4_i64)), GaugeValue::Int(4));
    }

    #[test]
    fn stats_keep_reporting_order() {
        let keys: Vec<_> = HistogramSnapshot::default().stats().iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            ["min", "max", "mean", "stdDev", "median", "75th", "95th", "98th", "99th", "99.9th"]
        );
    }

    #[test]
    fn retain_matching_filters_every_kind() {
        let set = MetricSet::new()
            .with_gauge("a.g", 1)
            .with_counter("a.c", 1)
            .with_counter("b.c", 2)
            .with_timer("b.t", TimerSnapshot::default());

        let only_a = set.retain_matching(|name, _| name.starts_with("a."));
        assert_eq!(only_a.len(), 2);
        assert!(only_a.counters.contains_key("a.c"));
        assert!(only_a.timers.is_empty());

        let no_counters = set.retain_matching(|_, kind| kind != MetricKind::Counter);
        assert_eq!(no_counters.len(), 2);
    }
}
