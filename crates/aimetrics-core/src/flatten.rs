//! Flattening contract: metric snapshots -> `(name, f32)` records.
//!
//! Naming rules per kind:
//! - gauge `g`        -> `g`
//! - counter `c`      -> `c/count`
//! - histogram `h`    -> `h/<stat>` for the ten statistics
//! - meter `m`        -> `m/count`, `m/<rate>/<RATE_UNIT>` for the four rates
//! - timer `t`        -> meter records, then `t/<stat>/<DURATION_UNIT>`
//!
//! Histogram and timer statistics both go through duration conversion; only
//! timer keys carry the duration unit. Record names are not prefixed here.

use crate::snapshot::{GaugeValue, HistogramSnapshot, MeterSnapshot, MetricSet, TimerSnapshot};
use crate::unit::TimeUnit;

/// A flat metric as handed to a sink: record name and single-precision value.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub value: f32,
}

impl Record {
    fn new(name: String, value: f64) -> Self {
        Self { name, value: value as f32 }
    }
}

/// Output of one flattening pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub records: Vec<Record>,
    /// Gauges dropped because their value was not a finite number.
    pub skipped_gauges: Vec<String>,
}

/// Applies the naming rules with a fixed pair of rate and duration units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flattener {
    rate_unit: TimeUnit,
    duration_unit: TimeUnit,
}

impl Flattener {
    /// Flattener reporting rates per `rate_unit` and durations in `duration_unit`.
    pub fn new(rate_unit: TimeUnit, duration_unit: TimeUnit) -> Self {
        Self { rate_unit, duration_unit }
    }

    /// Unit rates are scaled to.
    pub fn rate_unit(&self) -> TimeUnit {
        self.rate_unit
    }

    /// Unit durations are scaled to.
    pub fn duration_unit(&self) -> TimeUnit {
        self.duration_unit
    }

    /// Per-second rate scaled to the rate unit.
    pub fn convert_rate(&self, per_second: f64) -> f64 {
        self.rate_unit.convert_rate(per_second)
    }

    /// Nanosecond duration scaled to the duration unit.
    pub fn convert_duration(&self, nanos: f64) -> f64 {
        self.duration_unit.convert_duration(nanos)
    }

    /// Flatten a whole set: gauges, counters, histograms, meters, timers,
    /// each in name order.
    pub fn flatten(&self, set: &MetricSet) -> Flattened {
        let mut out = Flattened::default();

        for (name, value) in &set.gauges {
            match self.gauge(name, value) {
                Some(r) => out.records.push(r),
                None => out.skipped_gauges.push(name.clone()),
            }
        }
        for (name, count) in &set.counters {
            out.records.push(self.counter(name, *count));
        }
        for (name, snapshot) in &set.histograms {
            out.records.extend(self.histogram(name, snapshot));
        }
        for (name, snapshot) in &set.meters {
            out.records.extend(self.meter(name, snapshot));
        }
        for (name, snapshot) in &set.timers {
            out.records.extend(self.timer(name, snapshot));
        }

        out
    }

    /// `name`, or `None` when the value is not a finite number.
    pub fn gauge(&self, name: &str, value: &GaugeValue) -> Option<Record> {
        value.as_f32().map(|v| Record { name: name.to_string(), value: v })
    }

    /// `name/count`. Counts narrow straight to `f32`, without an `f64` hop.
    pub fn counter(&self, name: &str, count: i64) -> Record {
        Record { name: format!("{name}/count"), value: count as f32 }
    }

    /// Ten `name/<stat>` records, durations converted, no unit in the key.
    pub fn histogram(&self, name: &str, snapshot: &HistogramSnapshot) -> Vec<Record> {
        self.durations(name, snapshot, "")
    }

    /// `name/count` plus four `name/<rate>/<RATE_UNIT>` records.
    pub fn meter(&self, name: &str, snapshot: &MeterSnapshot) -> Vec<Record> {
        let mut out = Vec::with_capacity(5);
        out.push(Record { name: format!("{name}/count"), value: snapshot.count as f32 });
        for (key, rate) in snapshot.rates() {
            out.push(Record::new(
                format!("{name}/{key}/{}", self.rate_unit),
                self.convert_rate(rate),
            ));
        }
        out
    }

    /// Meter records, then ten `name/<stat>/<DURATION_UNIT>` records.
    pub fn timer(&self, name: &str, snapshot: &TimerSnapshot) -> Vec<Record> {
        let mut out = self.meter(name, &snapshot.meter);
        let suffix = format!("/{}", self.duration_unit);
        out.extend(self.durations(name, &snapshot.durations, &suffix));
        out
    }

    fn durations(&self, name: &str, snapshot: &HistogramSnapshot, suffix: &str) -> Vec<Record> {
        snapshot
            .stats()
            .into_iter()
            .map(|(key, v)| Record::new(format!("{name}/{key}{suffix}"), self.convert_duration(v)))
            .collect()
    }
}

impl Default for Flattener {
    fn default() -> Self {
        Self::new(TimeUnit::Seconds, TimeUnit::Milliseconds)
    }
}
