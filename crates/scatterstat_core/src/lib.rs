//! Statistical summaries of particle-scattering simulation output
//!
//! This crate turns per-configuration event tables into summary statistics. It provides:
//! - A distribution estimator: mean with standard error, histogram mode with rectangular,
//!   half-width-at-half-maximum or bootstrap uncertainties
//! - An event accountant that tallies reflected, transmitted, absorbed and decayed events and
//!   checks the conservation identity
//! - A sweep driver over particle, material, thickness, momentum and incident angle with a
//!   minimum-sample cut and per-momentum cutoff angles
//! - Event sources reading JSON ntuples from disk, from memory, or generating synthetic events
//!
//! # Example
//!
//! ```ignore
//! use scatterstat_core::{SweepConfig, SyntheticProfile, SyntheticSource, run_sweep};
//!
//! let source = SyntheticSource::new(SyntheticProfile::default(), 7);
//! let config = SweepConfig {
//!     momenta: vec![100.0, 200.0],
//!     angles: (1..=10).map(f64::from).collect(),
//!     expected_events: source.profile().events,
//!     ..Default::default()
//! };
//!
//! let results = run_sweep(&source, &config)?;
//! for series in results.series() {
//!     println!("{} MeV/c: cutoff {:?}", series.momentum, series.cutoff_angle);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod accounting;
pub mod error;
pub mod source;
pub mod stats;
pub mod sweep;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use accounting::{Samples, Side, classify, depth_summary, select_samples, validate};
pub use error::{FaultKind, IntegrityFault, SourceError, SweepError, SweepFault};
pub use model::{
    ConfigurationKey, ConfigurationOutcome, DepthSummary, Estimate, EventData, EventTally,
    Material, MeasurementKind, Particle,
};
pub use source::{DirectorySource, EventSource, MemorySource, SyntheticProfile, SyntheticSource};
pub use stats::{BinningRule, ModeEstimator, summarize};
pub use sweep::{FaultPolicy, MomentumSeries, SweepConfig, SweepResults, run_sweep};
