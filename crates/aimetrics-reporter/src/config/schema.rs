use std::time::Duration;

use serde::Deserialize;

use aimetrics_core::error::{AimetricsError, Result};
use aimetrics_core::TimeUnit;

use crate::filter::PrefixFilter;
use crate::reporter::{ReporterBuilder, DEFAULT_NAME};
use crate::sink::{JsonLinesSink, LogSink};

/// Root of `aimetrics.yaml`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    pub version: u32,

    #[serde(default)]
    pub reporter: ReporterSection,

    #[serde(default)]
    pub filter: FilterSection,

    #[serde(default)]
    pub sink: SinkSection,
}

impl ReporterConfig {
    /// Reject unsupported versions and out-of-range settings.
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(AimetricsError::UnsupportedVersion);
        }
        self.reporter.validate()?;
        self.filter.validate()?;
        Ok(())
    }

    /// Copy every configured setting onto `builder`.
    pub fn apply(&self, builder: ReporterBuilder) -> ReporterBuilder {
        let builder = builder
            .name(self.reporter.name.clone())
            .prefix(self.reporter.prefix.clone())
            .rate_unit(self.reporter.rate_unit)
            .duration_unit(self.reporter.duration_unit);

        let builder = if self.filter.is_empty() {
            builder
        } else {
            builder.filter(self.filter.to_filter())
        };

        match self.sink.kind {
            SinkKind::Log => builder.sink(LogSink::default()),
            SinkKind::JsonLines => builder.sink(JsonLinesSink::stdout()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReporterSection {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub prefix: String,

    #[serde(default = "default_rate_unit")]
    pub rate_unit: TimeUnit,

    #[serde(default = "default_duration_unit")]
    pub duration_unit: TimeUnit,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for ReporterSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            prefix: String::new(),
            rate_unit: default_rate_unit(),
            duration_unit: default_duration_unit(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl ReporterSection {
    pub fn validate(&self) -> Result<()> {
        if !(100..=3_600_000).contains(&self.interval_ms) {
            return Err(AimetricsError::BadConfig(
                "reporter.interval_ms must be between 100 and 3600000".into(),
            ));
        }
        Ok(())
    }

    /// Tick interval for schedulers driving the reporter.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_name() -> String {
    DEFAULT_NAME.into()
}
fn default_rate_unit() -> TimeUnit {
    TimeUnit::Seconds
}
fn default_duration_unit() -> TimeUnit {
    TimeUnit::Milliseconds
}
fn default_interval_ms() -> u64 {
    10_000
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    #[serde(default)]
    pub include_prefixes: Vec<String>,

    #[serde(default)]
    pub exclude_prefixes: Vec<String>,
}

impl FilterSection {
    pub fn validate(&self) -> Result<()> {
        let all = self.include_prefixes.iter().chain(&self.exclude_prefixes);
        if all.into_iter().any(|p| p.is_empty()) {
            return Err(AimetricsError::BadConfig(
                "filter prefixes must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.include_prefixes.is_empty() && self.exclude_prefixes.is_empty()
    }

    /// Prefix filter built from both lists.
    pub fn to_filter(&self) -> PrefixFilter {
        PrefixFilter::new(self.include_prefixes.clone(), self.exclude_prefixes.clone())
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SinkSection {
    #[serde(default)]
    pub kind: SinkKind,
}

/// Sinks selectable from a config file. Sinks the embedder reads back,
/// such as `MemorySink`, are passed to the builder directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SinkKind {
    #[default]
    Log,
    JsonLines,
}
