//! Automatic bin-count selection for 1-D histograms.
//!
//! The width estimators follow numpy's `histogram_bin_edges` selectors so that binned
//! results line up with the Python analysis this output is usually compared against.

use serde::{Deserialize, Serialize};

use super::descriptive::{percentile, std_dev};

/// Upper bound on the number of bins any rule may produce
pub const MAX_BINS: usize = 10_000;

/// How many bins to use for a sample over a given range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BinningRule {
    /// Scott's normal-reference rule: `h = (24 sqrt(pi) / n)^(1/3) * sigma`
    #[default]
    Scott,
    /// Smaller of the Freedman-Diaconis and Sturges widths (Sturges when the IQR is zero)
    Auto,
    /// `h = ptp / (log2(n) + 1)`
    Sturges,
    /// `h = ptp / sqrt(n)`
    Sqrt,
    /// Fixed number of bins
    Fixed(usize),
}

impl BinningRule {
    /// Number of equal-width bins spanning `range` for `values`.
    ///
    /// `values` should already be restricted to finite entries inside `range`. Always
    /// returns at least one bin and at most [`MAX_BINS`].
    #[must_use]
    pub fn bin_count(&self, values: &[f64], range: (f64, f64)) -> usize {
        if let BinningRule::Fixed(n) = self {
            return (*n).clamp(1, MAX_BINS);
        }
        let width = self.bin_width(values);
        let span = range.1 - range.0;
        if width > 0.0 && width.is_finite() && span > 0.0 {
            let bins = (span / width).ceil();
            if bins >= MAX_BINS as f64 {
                MAX_BINS
            } else {
                (bins as usize).max(1)
            }
        } else {
            1
        }
    }

    /// Estimated bin width; zero when the rule cannot produce one.
    fn bin_width(&self, values: &[f64]) -> f64 {
        let n = values.len();
        if n == 0 {
            return 0.0;
        }
        let nf = n as f64;
        match self {
            BinningRule::Scott => {
                let sigma = if n < 2 { 0.0 } else { std_dev(values) };
                (24.0 * std::f64::consts::PI.sqrt() / nf).powf(1.0 / 3.0) * sigma
            }
            BinningRule::Sturges => peak_to_peak(values) / (nf.log2() + 1.0),
            BinningRule::Sqrt => peak_to_peak(values) / nf.sqrt(),
            BinningRule::Auto => {
                let sturges = BinningRule::Sturges.bin_width(values);
                let fd = freedman_diaconis_width(values);
                if fd > 0.0 { fd.min(sturges) } else { sturges }
            }
            BinningRule::Fixed(_) => 0.0,
        }
    }
}

fn peak_to_peak(values: &[f64]) -> f64 {
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });
    if hi >= lo { hi - lo } else { 0.0 }
}

fn freedman_diaconis_width(values: &[f64]) -> f64 {
    let iqr = percentile(values, 75.0) - percentile(values, 25.0);
    2.0 * iqr * (values.len() as f64).powf(-1.0 / 3.0)
}
