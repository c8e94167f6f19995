//! Distribution estimator
//!
//! Point estimates (mean, histogram mode) and their uncertainties for one sample of an
//! outgoing quantity. Every function here is pure; undefined statistics come back as NaN.

mod binning;
mod bootstrap;
mod descriptive;
mod histogram;
mod mode;

pub use binning::{BinningRule, MAX_BINS};
pub use bootstrap::bootstrap_mode_error;
pub use descriptive::{count, mean, mean_and_error, percentile, std_dev};
pub use histogram::Histogram;
pub use mode::{
    DEFAULT_RESAMPLES, HistogramMode, ModeEstimate, ModeEstimator, half_width_half_max,
    histogram_mode,
};

use crate::model::Estimate;

/// Full summary of one sample: mean with standard error, population spread, and the
/// histogram mode with the uncertainty chosen by `estimator`.
#[must_use]
pub fn summarize(
    sample: &[f64],
    range: Option<(f64, f64)>,
    rule: BinningRule,
    estimator: &ModeEstimator,
    seed: u64,
) -> Estimate {
    let sample_size = count(sample);
    if sample_size == 0 {
        return Estimate::undefined(0);
    }
    let (mean, mean_error) = mean_and_error(sample);
    let mode = estimator.estimate(sample, range, rule, seed);
    Estimate {
        sample_size,
        mean,
        mean_error,
        mode: mode.mode,
        mode_error_left: mode.error_left,
        mode_error_right: mode.error_right,
        std_dev: std_dev(sample),
    }
}
