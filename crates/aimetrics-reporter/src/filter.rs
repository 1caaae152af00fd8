//! Metric filters, applied by the source before a set reaches the reporter.

use aimetrics_core::MetricKind;

/// Decides which metrics a source hands to the reporter.
pub trait MetricFilter: Send + Sync {
    /// Whether metric `name` of `kind` is reported.
    fn matches(&self, name: &str, kind: MetricKind) -> bool;

    /// Short description for diagnostics.
    fn describe(&self) -> String {
        "custom".to_string()
    }
}

/// Accepts every metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMetrics;

impl MetricFilter for AllMetrics {
    fn matches(&self, _name: &str, _kind: MetricKind) -> bool {
        true
    }

    fn describe(&self) -> String {
        "all".to_string()
    }
}

/// Name-prefix allow/deny lists. An empty include list accepts everything
/// not excluded; exclusion wins over inclusion.
#[derive(Debug, Clone, Default)]
pub struct PrefixFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl PrefixFilter {
    /// Filter from explicit include and exclude prefix lists.
    pub fn new(include: Vec<String>, exclude: Vec<String>) -> Self {
        Self { include, exclude }
    }

    /// Accept names starting with `prefix`.
    pub fn include(mut self, prefix: impl Into<String>) -> Self {
        self.include.push(prefix.into());
        self
    }

    /// Reject names starting with `prefix`.
    pub fn exclude(mut self, prefix: impl Into<String>) -> Self {
        self.exclude.push(prefix.into());
        self
    }
}

impl MetricFilter for PrefixFilter {
    fn matches(&self, name: &str, _kind: MetricKind) -> bool {
        if self.exclude.iter().any(|p| name.starts_with(p.as_str())) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|p| name.starts_with(p.as_str()))
    }

    fn describe(&self) -> String {
        format!("prefix(include={:?}, exclude={:?})", self.include, self.exclude)
    }
}

impl<F> MetricFilter for F
where
    F: Fn(&str, MetricKind) -> bool + Send + Sync,
{
    fn matches(&self, name: &str, kind: MetricKind) -> bool {
        self(name, kind)
    }
}
