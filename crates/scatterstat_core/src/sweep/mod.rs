//! Configuration sweep driver
//!
//! Walks particle × material × thickness × momentum × incident angle, applies the
//! minimum-sample cut, and collects per-configuration outcomes into a [`SweepGrid`].

mod config;
mod driver;
mod grid;
mod results;

pub use config::{
    DEFAULT_CUT, DEFAULT_EXPECTED_EVENTS, FaultPolicy, SweepAxes, SweepConfig, axis,
};
pub use driver::{Evaluation, evaluate_configuration, measurement_seed, run_sweep};
pub use grid::{GridIndices, SweepGrid};
pub use results::{AnglePoint, AngleTally, MomentumSeries, SweepResults};
