//! aimetrics demo reporter
//!
//! - Loads `aimetrics.yaml` (or the path given as first argument)
//! - Registers a handful of demo metrics in an in-process registry
//! - Reports on every tick until Ctrl-C; failed cycles are logged and skipped

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing_subscriber::{fmt, EnvFilter};

use aimetrics_core::{MeterSnapshot, Result, TimerSnapshot};
use aimetrics_reporter::{config, metric_name, Registry, Reporter};

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "aimetrics.yaml".to_string());
    let cfg = config::load_from_file(&path)?;

    let registry = Arc::new(Registry::new());
    let jobs = registry.counter(&metric_name(&["demo", "jobs"]))?;

    let depth = Arc::new(AtomicI64::new(0));
    let depth_read = Arc::clone(&depth);
    registry.register_gauge(&metric_name(&["demo", "queue_depth"]), move || {
        depth_read.load(Ordering::Relaxed)
    })?;

    let started = Instant::now();
    let jobs_read = Arc::clone(&jobs);
    registry.register_meter(
        &metric_name(&["demo", "throughput"]),
        Arc::new(move || {
            let count = jobs_read.count().max(0) as u64;
            let secs = started.elapsed().as_secs_f64().max(f64::EPSILON);
            MeterSnapshot { count, mean_rate: count as f64 / secs, ..MeterSnapshot::default() }
        }),
    )?;

    let last_report = Arc::new(AtomicI64::new(0));
    let last_report_read = Arc::clone(&last_report);
    registry.register_timer(
        &metric_name(&["demo", "report"]),
        Arc::new(move || {
            let nanos = last_report_read.load(Ordering::Relaxed).max(0) as u64;
            TimerSnapshot::single_call(Duration::from_nanos(nanos))
        }),
    )?;

    let reporter = cfg.apply(Reporter::for_source(registry.clone())).build();

    let mut ticker = tokio::time::interval(cfg.reporter.interval());
    tracing::info!(config = %path, interval_ms = cfg.reporter.interval_ms, "aimetrics demo starting");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                jobs.inc();
                depth.store(jobs.count() % 7, Ordering::Relaxed);

                // the timer shows the previous cycle's duration
                let t0 = Instant::now();
                let outcome = reporter.report_now();
                last_report.store(elapsed_nanos(t0), Ordering::Relaxed);

                match outcome {
                    Ok(summary) => tracing::debug!(emitted = summary.emitted, skipped = summary.skipped_gauges, "report cycle done"),
                    Err(e) => tracing::warn!(error = %e, "report cycle failed"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn elapsed_nanos(since: Instant) -> i64 {
    i64::try_from(since.elapsed().as_nanos()).unwrap_or(i64::MAX)
}
