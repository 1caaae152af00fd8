//! Top-level facade crate for aimetrics.
//!
//! Re-exports the core data model and the reporter library so users can depend on a single crate.

pub mod core {
    pub use aimetrics_core::*;
}

pub mod reporter {
    pub use aimetrics_reporter::*;
}
