//! End-to-end reporting cycles against an in-memory sink.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aimetrics_core::{
    AimetricsError, HistogramSnapshot, MeterSnapshot, MetricSet, TimeUnit, TimerSnapshot,
};
use aimetrics_reporter::{MemorySink, Registry, Reporter, TelemetrySink};

fn reporter_with(prefix: &str, sink: Arc<MemorySink>, registry: Arc<Registry>) -> Reporter {
    Reporter::for_source(registry)
        .name("test reporter")
        .rate_unit(TimeUnit::Seconds)
        .duration_unit(TimeUnit::Milliseconds)
        .prefix(prefix)
        .sink(sink)
        .build()
}

#[test]
fn counter_round_trip_with_prefix() {
    let registry = Arc::new(Registry::new());
    let jobs = registry.counter("jobs").unwrap();
    jobs.inc();
    jobs.inc();
    jobs.inc();

    let sink = Arc::new(MemorySink::new());
    let reporter = reporter_with("app/", Arc::clone(&sink), registry);
    reporter.report_now().unwrap();

    assert_eq!(sink.records(), [("app/jobs/count".to_string(), 3.0)]);
}

#[test]
fn finite_gauges_emit_one_record_each() {
    let registry = Arc::new(Registry::new());
    registry.register_gauge("int", || 42_i64).unwrap();
    registry.register_gauge("float", || 0.125_f64).unwrap();
    registry.register_gauge("unsigned", || 7_u64).unwrap();

    let sink = Arc::new(MemorySink::new());
    let summary = reporter_with("", Arc::clone(&sink), registry).report_now().unwrap();

    assert_eq!(summary.emitted, 3);
    assert_eq!(
        sink.records(),
        [
            ("float".to_string(), 0.125),
            ("int".to_string(), 42.0),
            ("unsigned".to_string(), 7.0),
        ]
    );
}

#[test]
fn invalid_gauges_emit_nothing() {
    let registry = Arc::new(Registry::new());
    registry.register_gauge("nan", || f64::NAN).unwrap();
    registry.register_gauge("inf", || f64::INFINITY).unwrap();
    registry.register_gauge("text", || "busy").unwrap();
    registry.register_gauge("flag", || true).unwrap();
    registry.register_gauge("missing", || None::<i64>).unwrap();

    let sink = Arc::new(MemorySink::new());
    let summary = reporter_with("", Arc::clone(&sink), registry).report_now().unwrap();

    assert!(sink.is_empty());
    assert_eq!(summary, aimetrics_reporter::ReportSummary { emitted: 0, skipped_gauges: 5 });
}

#[test]
fn histogram_emits_ten_converted_records() {
    let registry = Arc::new(Registry::new());
    let snapshot = HistogramSnapshot {
        min: 1e6,
        max: 9e6,
        mean: 4e6,
        std_dev: 2e6,
        median: 3e6,
        p75: 5e6,
        p95: 8e6,
        p98: 8.5e6,
        p99: 9e6,
        p999: 9e6,
    };
    registry.register_histogram("sizes", Arc::new(snapshot)).unwrap();

    let sink = Arc::new(MemorySink::new());
    reporter_with("", Arc::clone(&sink), registry).report_now().unwrap();

    assert_eq!(sink.len(), 10);
    assert_eq!(sink.get("sizes/min"), Some(1.0));
    assert_eq!(sink.get("sizes/stdDev"), Some(2.0));
    assert_eq!(sink.get("sizes/98th"), Some(8.5));
    assert_eq!(sink.get("sizes/99.9th"), Some(9.0));
    assert!(sink.records().iter().all(|(n, _)| !n.ends_with("MILLISECONDS")));
}

#[test]
fn meter_emits_count_and_four_rates() {
    let registry = Arc::new(Registry::new());
    let meter = MeterSnapshot {
        count: 12,
        mean_rate: 0.5,
        one_minute_rate: 1.0,
        five_minute_rate: 0.25,
        fifteen_minute_rate: 0.125,
    };
    registry.register_meter("hits", Arc::new(meter)).unwrap();

    let sink = Arc::new(MemorySink::new());
    Reporter::for_source(registry)
        .rate_unit(TimeUnit::Minutes)
        .sink(Arc::clone(&sink))
        .build()
        .report_now()
        .unwrap();

    assert_eq!(
        sink.records(),
        [
            ("hits/count".to_string(), 12.0),
            ("hits/meanRate/MINUTES".to_string(), 30.0),
            ("hits/1MinuteRate/MINUTES".to_string(), 60.0),
            ("hits/5MinuteRate/MINUTES".to_string(), 15.0),
            ("hits/15MinuteRate/MINUTES".to_string(), 7.5),
        ]
    );
}

#[test]
fn timer_emits_fifteen_records_with_unit_suffix() {
    let registry = Arc::new(Registry::new());
    registry
        .register_timer("db.query", Arc::new(TimerSnapshot::single_call(Duration::from_millis(5))))
        .unwrap();

    let sink = Arc::new(MemorySink::new());
    reporter_with("", Arc::clone(&sink), registry).report_now().unwrap();

    assert_eq!(sink.len(), 15);
    assert_eq!(sink.get("db.query/count"), Some(1.0));
    assert!(sink.get("db.query/meanRate/SECONDS").is_some());
    let min = sink.get("db.query/min/MILLISECONDS").unwrap();
    let max = sink.get("db.query/max/MILLISECONDS").unwrap();
    assert!((min - 5.0).abs() < 1e-4);
    assert!((max - 5.0).abs() < 1e-4);
    assert!(sink.get("db.query/min").is_none());
}

#[test]
fn kinds_report_in_fixed_order_and_names_sorted() {
    let set = MetricSet::new()
        .with_timer("a.timer", TimerSnapshot::default())
        .with_counter("z.count", 1)
        .with_counter("b.count", 1)
        .with_gauge("y.gauge", 1);

    let sink = Arc::new(MemorySink::new());
    Reporter::for_source(Arc::new(MetricSet::new()))
        .sink(Arc::clone(&sink))
        .build()
        .report(&set)
        .unwrap();

    let names: Vec<String> = sink.records().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names[0], "y.gauge");
    assert_eq!(names[1], "b.count/count");
    assert_eq!(names[2], "z.count/count");
    assert_eq!(names[3], "a.timer/count");
    assert_eq!(names.len(), 3 + 15);
}

#[test]
fn repeated_reports_are_identical() {
    let registry = Arc::new(Registry::new());
    registry.counter("c").unwrap().inc_by(4);
    registry.register_gauge("g", || 1.5).unwrap();
    registry
        .register_timer("t", Arc::new(TimerSnapshot::single_call(Duration::from_micros(250))))
        .unwrap();

    let sink = Arc::new(MemorySink::new());
    let reporter = reporter_with("p/", Arc::clone(&sink), registry);

    reporter.report_now().unwrap();
    let first = sink.take();
    reporter.report_now().unwrap();
    let second = sink.take();

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

/// Rejects every push whose name contains `needle`.
struct FlakySink {
    needle: &'static str,
    inner: MemorySink,
    attempts: AtomicUsize,
}

impl TelemetrySink for FlakySink {
    fn track_metric(&self, name: &str, value: f32) -> aimetrics_core::Result<()> {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        if name.contains(self.needle) {
            return Err(AimetricsError::SinkUnavailable(format!("rejected {name}")));
        }
        self.inner.track_metric(name, value)
    }
}

#[test]
fn failed_push_does_not_stop_the_cycle() {
    let set = MetricSet::new()
        .with_counter("a", 1)
        .with_counter("b", 2)
        .with_counter("c", 3);

    let sink = Arc::new(FlakySink {
        needle: "b/",
        inner: MemorySink::new(),
        attempts: AtomicUsize::new(0),
    });
    let reporter = Reporter::for_source(Arc::new(MetricSet::new()))
        .sink(Arc::clone(&sink))
        .build();

    let err = reporter.report(&set).expect_err("one push fails");
    match err {
        AimetricsError::Sink { failed, first } => {
            assert_eq!(failed, 1);
            assert!(first.contains("rejected b/count"));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(sink.attempts.load(Ordering::Relaxed), 3);
    assert_eq!(
        sink.inner.records(),
        [("a/count".to_string(), 1.0), ("c/count".to_string(), 3.0)]
    );
}

#[test]
fn filter_is_applied_by_the_source() {
    let registry = Arc::new(Registry::new());
    registry.counter("keep.me").unwrap().inc();
    registry.counter("drop.me").unwrap().inc();

    let sink = Arc::new(MemorySink::new());
    Reporter::for_source(registry)
        .filter(aimetrics_reporter::PrefixFilter::default().include("keep."))
        .sink(Arc::clone(&sink))
        .build()
        .report_now()
        .unwrap();

    assert_eq!(sink.records(), [("keep.me/count".to_string(), 1.0)]);
}
