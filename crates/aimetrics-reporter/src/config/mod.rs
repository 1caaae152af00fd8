//! Reporter config loader (strict parsing).

pub mod schema;

use std::fs;

use aimetrics_core::error::{AimetricsError, Result};

pub use schema::{FilterSection, ReporterConfig, ReporterSection, SinkKind, SinkSection};

/// Read and validate the YAML file at `path`.
pub fn load_from_file(path: &str) -> Result<ReporterConfig> {
    let s = fs::read_to_string(path).map_err(|source| AimetricsError::ConfigRead {
        path: path.to_string(),
        source,
    })?;
    load_from_str(&s)
}

/// Parse and validate YAML text. Unknown fields are rejected.
pub fn load_from_str(s: &str) -> Result<ReporterConfig> {
    let cfg: ReporterConfig = serde_yaml::from_str(s)
        .map_err(|e| AimetricsError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
