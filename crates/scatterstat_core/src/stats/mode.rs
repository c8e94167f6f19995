//! Histogram mode and its uncertainty.
//!
//! The mode of a binned sample is the centre of the highest bin. When several bins tie
//! for the maximum, the mode is the midpoint of the span from the first to the last tied
//! bin. Three uncertainty policies are available through [`ModeEstimator`]:
//!
//! - **RectangularBin**: the modal span treated as a uniform distribution,
//!   `width / (2 sqrt(3))`, optionally added in quadrature with the standard error of the mean
//! - **Hwhm**: asymmetric half-width at half-maximum around the modal bins
//! - **Bootstrap**: spread of the mode over resampled copies of the sample

use serde::{Deserialize, Serialize};

use super::binning::BinningRule;
use super::bootstrap::bootstrap_mode_error;
use super::descriptive::mean_and_error;
use super::histogram::Histogram;

/// Default number of bootstrap resamples
pub const DEFAULT_RESAMPLES: usize = 100;

/// Single-pass histogram mode of a sample
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramMode {
    /// Midpoint of the modal span; NaN for an empty histogram
    pub mode: f64,
    pub bin_width: f64,
    /// `(lower edge of first modal bin, upper edge of last modal bin)`
    pub interval: (f64, f64),
    /// First and last modal bin indices
    pub modal_bins: Option<(usize, usize)>,
    pub histogram: Option<Histogram>,
}

impl HistogramMode {
    fn empty() -> Self {
        Self {
            mode: f64::NAN,
            bin_width: f64::NAN,
            interval: (f64::NAN, f64::NAN),
            modal_bins: None,
            histogram: None,
        }
    }

    /// Width of the modal span (one bin width when there is no tie)
    #[must_use]
    pub fn span(&self) -> f64 {
        self.interval.1 - self.interval.0
    }
}

/// Bin `sample` over `range` with `rule` and locate the mode.
///
/// Deterministic: identical inputs always give identical output.
#[must_use]
pub fn histogram_mode(sample: &[f64], range: Option<(f64, f64)>, rule: BinningRule) -> HistogramMode {
    let Some(histogram) = Histogram::from_sample(sample, range, rule) else {
        return HistogramMode::empty();
    };
    let Some((first, last)) = histogram.modal_bins() else {
        return HistogramMode {
            bin_width: histogram.bin_width,
            histogram: Some(histogram),
            ..HistogramMode::empty()
        };
    };
    let interval = (histogram.bin_edge(first), histogram.bin_edge(last + 1));
    HistogramMode {
        mode: 0.5 * (interval.0 + interval.1),
        bin_width: histogram.bin_width,
        interval,
        modal_bins: Some((first, last)),
        histogram: Some(histogram),
    }
}

/// A mode with (possibly asymmetric) uncertainties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeEstimate {
    pub mode: f64,
    pub error_left: f64,
    pub error_right: f64,
}

impl ModeEstimate {
    fn symmetric(mode: f64, error: f64) -> Self {
        Self {
            mode,
            error_left: error,
            error_right: error,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_resamples() -> usize {
    DEFAULT_RESAMPLES
}

/// Policy used to attach an uncertainty to a histogram mode
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ModeEstimator {
    /// Uniform distribution over the modal span
    RectangularBin {
        #[serde(default = "default_true")]
        combine_with_mean_error: bool,
    },
    /// Half-width at half-maximum, clamped to `domain` (the histogram range if unset)
    Hwhm {
        #[serde(default)]
        domain: Option<(f64, f64)>,
    },
    /// Mean and standard deviation of the mode over bootstrap resamples
    Bootstrap {
        #[serde(default = "default_resamples")]
        resamples: usize,
    },
}

impl Default for ModeEstimator {
    fn default() -> Self {
        ModeEstimator::RectangularBin {
            combine_with_mean_error: true,
        }
    }
}

impl ModeEstimator {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RectangularBin { .. } => "rectangular_bin",
            Self::Hwhm { .. } => "hwhm",
            Self::Bootstrap { .. } => "bootstrap",
        }
    }

    /// Estimate the mode of `sample` and its uncertainty.
    ///
    /// `seed` only matters for [`ModeEstimator::Bootstrap`]. Empty samples give NaN fields.
    #[must_use]
    pub fn estimate(
        &self,
        sample: &[f64],
        range: Option<(f64, f64)>,
        rule: BinningRule,
        seed: u64,
    ) -> ModeEstimate {
        match *self {
            ModeEstimator::RectangularBin {
                combine_with_mean_error,
            } => {
                let found = histogram_mode(sample, range, rule);
                let mut error = found.span() / (2.0 * 3.0_f64.sqrt());
                if combine_with_mean_error {
                    // a single value has no standard error; keep the bin term alone
                    let (_, mean_error) = mean_and_error(sample);
                    if !mean_error.is_nan() {
                        error = error.hypot(mean_error);
                    }
                }
                ModeEstimate::symmetric(found.mode, error)
            }
            ModeEstimator::Hwhm { domain } => {
                let found = histogram_mode(sample, range, rule);
                half_width_half_max(&found, domain)
            }
            ModeEstimator::Bootstrap { resamples } => {
                let (mode, error) = bootstrap_mode_error(sample, range, resamples, seed);
                ModeEstimate::symmetric(mode, error)
            }
        }
    }
}

/// Asymmetric HWHM errors around a located mode.
///
/// Scans left from the first modal bin and right from the last modal bin for the first bin
/// whose count is at most half the maximum; the error on each side is the distance from the
/// mode to that bin's centre. A side without such a bin extends to the domain boundary.
#[must_use]
pub fn half_width_half_max(found: &HistogramMode, domain: Option<(f64, f64)>) -> ModeEstimate {
    let (Some(histogram), Some((first, last))) = (&found.histogram, found.modal_bins) else {
        return ModeEstimate::symmetric(f64::NAN, f64::NAN);
    };
    let (lower, upper) = domain.unwrap_or(histogram.range);
    let half = histogram.max_count() as f64 / 2.0;
    let at_half = |i: &usize| histogram.bins[*i] as f64 <= half;

    let left_edge = (0..first)
        .rev()
        .find(at_half)
        .map_or(lower, |i| histogram.bin_center(i));
    let right_edge = (last + 1..histogram.bins.len())
        .find(at_half)
        .map_or(upper, |i| histogram.bin_center(i));

    ModeEstimate {
        mode: found.mode,
        error_left: (found.mode - left_edge).max(0.0),
        error_right: (right_edge - found.mode).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts_to_sample(counts: &[usize], range: (f64, f64)) -> Vec<f64> {
        let width = (range.1 - range.0) / counts.len() as f64;
        counts
            .iter()
            .enumerate()
            .flat_map(|(i, &c)| std::iter::repeat_n(range.0 + (i as f64 + 0.5) * width, c))
            .collect()
    }

    #[test]
    fn test_single_peak_mode_is_bin_center() {
        let sample = counts_to_sample(&[1, 2, 9, 3, 1], (0.0, 50.0));
        let found = histogram_mode(&sample, Some((0.0, 50.0)), BinningRule::Fixed(5));
        assert_eq!(found.mode, 25.0);
        assert_eq!(found.interval, (20.0, 30.0));
    }

    #[test]
    fn test_tied_bins_use_span_midpoint() {
        let sample = counts_to_sample(&[5, 1, 1, 5, 0], (0.0, 50.0));
        let found = histogram_mode(&sample, Some((0.0, 50.0)), BinningRule::Fixed(5));
        // first tied bin centre 5, last 35
        assert_eq!(found.mode, 20.0);
        assert_eq!(found.modal_bins, Some((0, 3)));
    }

    #[test]
    fn test_rectangular_error_without_mean_error() {
        let sample = counts_to_sample(&[1, 6, 2], (0.0, 90.0));
        let estimate = ModeEstimator::RectangularBin {
            combine_with_mean_error: false,
        }
        .estimate(&sample, Some((0.0, 90.0)), BinningRule::Fixed(3), 0);
        let expected = 30.0 / (2.0 * 3.0_f64.sqrt());
        assert_eq!(estimate.mode, 45.0);
        assert!((estimate.error_left - expected).abs() < 1e-12);
        assert_eq!(estimate.error_left, estimate.error_right);
    }

    #[test]
    fn test_hwhm_scans_to_half_maximum() {
        // max 10 in bin 3; left: bin 2 has 6 (> 5), bin 1 has 5 (<= 5); right: bin 4 has 2
        let sample = counts_to_sample(&[1, 5, 6, 10, 2, 1], (0.0, 60.0));
        let estimate = ModeEstimator::Hwhm { domain: None }.estimate(
            &sample,
            Some((0.0, 60.0)),
            BinningRule::Fixed(6),
            0,
        );
        assert_eq!(estimate.mode, 35.0);
        assert!((estimate.error_left - 20.0).abs() < 1e-12);
        assert!((estimate.error_right - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_hwhm_clamps_to_domain() {
        let sample = counts_to_sample(&[10, 9, 8], (0.0, 90.0));
        let estimate = ModeEstimator::Hwhm {
            domain: Some((0.0, 90.0)),
        }
        .estimate(&sample, Some((0.0, 90.0)), BinningRule::Fixed(3), 0);
        // nothing to the left of bin 0; to the right nothing falls to 5
        assert_eq!(estimate.mode, 15.0);
        assert!((estimate.error_left - 15.0).abs() < 1e-12);
        assert!((estimate.error_right - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_sample_is_nan_everywhere() {
        for estimator in [
            ModeEstimator::default(),
            ModeEstimator::Hwhm { domain: None },
            ModeEstimator::Bootstrap { resamples: 10 },
        ] {
            let estimate = estimator.estimate(&[], Some((0.0, 90.0)), BinningRule::Scott, 1);
            assert!(estimate.mode.is_nan(), "{estimator:?}");
            assert!(estimate.error_left.is_nan(), "{estimator:?}");
        }
    }
}
