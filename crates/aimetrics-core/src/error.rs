//! Shared error type across aimetrics crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, AimetricsError>;

/// Unified error type used by core and reporter.
#[derive(Debug, Error)]
pub enum AimetricsError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    /// Config file could not be read.
    #[error("read config {path} failed: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown time unit: {0}")]
    UnknownUnit(String),
    /// A single push rejected by a sink.
    #[error("sink unavailable: {0}")]
    SinkUnavailable(String),
    /// Push failures aggregated over one reporting cycle.
    #[error("{failed} metric push(es) failed, first: {first}")]
    Sink { failed: usize, first: String },
    #[error("internal: {0}")]
    Internal(String),
}

impl AimetricsError {
    /// Stable short code, handy for log fields and assertions.
    pub fn code(&self) -> &'static str {
        match self {
            AimetricsError::BadConfig(_) => "BAD_CONFIG",
            AimetricsError::UnsupportedVersion => "UNSUPPORTED_VERSION",
            AimetricsError::ConfigRead { .. } => "CONFIG_READ",
            AimetricsError::UnknownUnit(_) => "UNKNOWN_UNIT",
            AimetricsError::SinkUnavailable(_) | AimetricsError::Sink { .. } => "SINK",
            AimetricsError::Internal(_) => "INTERNAL",
        }
    }
}
