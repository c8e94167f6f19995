//! Command-line front end for scatterstat
//!
//! This crate wires the core sweep to the outside world:
//! - YAML run configuration (`config`)
//! - Report artifacts written as JSON for an external plotter (`report`)
//! - Logging to stderr and a log file in the output directory (`logging`)

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod logging;
pub mod report;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ConfigError, RunConfig};
pub use logging::init_logging;
pub use report::{Artifact, ArtifactKind, Manifest, ReportOptions, build_artifacts, write_report};
