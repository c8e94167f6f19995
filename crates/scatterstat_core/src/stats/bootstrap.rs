use rand::{Rng, SeedableRng};

use super::binning::BinningRule;
use super::descriptive::present;
use super::mode::histogram_mode;

/// Bootstrap estimate of a histogram mode.
///
/// Draws `resamples` copies of the sample with replacement, takes the histogram mode of each
/// with the [`BinningRule::Auto`] rule over `range`, and returns the mean and population
/// standard deviation of those modes. Resamples whose mode is undefined are skipped.
///
/// The same `seed` always gives the same result. Returns `(NaN, NaN)` for an empty sample
/// or zero resamples.
#[must_use]
pub fn bootstrap_mode_error(
    sample: &[f64],
    range: Option<(f64, f64)>,
    resamples: usize,
    seed: u64,
) -> (f64, f64) {
    let values: Vec<f64> = present(sample).collect();
    if values.is_empty() || resamples == 0 {
        return (f64::NAN, f64::NAN);
    }

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut resample = vec![0.0; values.len()];
    let mut modes = Vec::with_capacity(resamples);
    for _ in 0..resamples {
        for slot in resample.iter_mut() {
            *slot = values[rng.random_range(0..values.len())];
        }
        let mode = histogram_mode(&resample, range, BinningRule::Auto).mode;
        if !mode.is_nan() {
            modes.push(mode);
        }
    }

    if modes.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = modes.len() as f64;
    let mean = modes.iter().sum::<f64>() / n;
    let variance = modes.iter().map(|m| (m - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_result() {
        let sample: Vec<f64> = (0..200).map(|i| f64::from(i % 37) * 2.0).collect();
        let a = bootstrap_mode_error(&sample, Some((0.0, 90.0)), 50, 7);
        let b = bootstrap_mode_error(&sample, Some((0.0, 90.0)), 50, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_constant_sample_has_no_spread() {
        let sample = [12.0; 40];
        let (mode, error) = bootstrap_mode_error(&sample, None, 20, 3);
        assert_eq!(mode, 12.0);
        assert_eq!(error, 0.0);
    }

    #[test]
    fn test_degenerate_inputs() {
        let (mode, error) = bootstrap_mode_error(&[], Some((0.0, 90.0)), 100, 1);
        assert!(mode.is_nan() && error.is_nan());
        let (mode, error) = bootstrap_mode_error(&[1.0, 2.0], Some((0.0, 90.0)), 0, 1);
        assert!(mode.is_nan() && error.is_nan());
    }
}
