//! Moment-based statistics over raw samples.
//!
//! NaN entries are skipped everywhere, matching how the simulation output marks missing
//! values. Empty or single-value samples yield NaN instead of an error so one sparse
//! configuration never stops a sweep.

/// Non-NaN values of a sample
pub(crate) fn present(sample: &[f64]) -> impl Iterator<Item = f64> + '_ {
    sample.iter().copied().filter(|x| !x.is_nan())
}

/// Number of non-NaN values
#[must_use]
pub fn count(sample: &[f64]) -> usize {
    present(sample).count()
}

/// Arithmetic mean ignoring NaN. NaN when nothing remains.
#[must_use]
pub fn mean(sample: &[f64]) -> f64 {
    let (sum, n) = present(sample).fold((0.0, 0usize), |(s, n), x| (s + x, n + 1));
    if n == 0 { f64::NAN } else { sum / n as f64 }
}

/// Population standard deviation (denominator `n`) ignoring NaN.
///
/// NaN for fewer than two values: one measurement carries no spread information.
#[must_use]
pub fn std_dev(sample: &[f64]) -> f64 {
    let n = count(sample);
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(sample);
    let sum_sq: f64 = present(sample).map(|x| (x - m) * (x - m)).sum();
    (sum_sq / n as f64).sqrt()
}

/// Mean and standard error of the mean (`std_dev / sqrt(n)`).
///
/// The error is NaN for `n <= 1`; the mean is NaN only for `n == 0`.
#[must_use]
pub fn mean_and_error(sample: &[f64]) -> (f64, f64) {
    let n = count(sample);
    let error = std_dev(sample) / (n as f64).sqrt();
    (mean(sample), error)
}

/// Percentile `q` (0..=100) with linear interpolation between order statistics.
#[must_use]
pub fn percentile(sample: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = present(sample).collect();
    if sorted.is_empty() || !(0.0..=100.0).contains(&q) {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
