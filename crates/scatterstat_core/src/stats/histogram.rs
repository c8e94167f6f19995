use serde::{Deserialize, Serialize};

use super::binning::BinningRule;
use super::descriptive::present;

/// Equal-width 1-D histogram over a closed range.
///
/// Values equal to the upper edge fall into the last bin. NaN values are dropped without
/// touching the under/overflow counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<u64>,
    pub range: (f64, f64),
    pub bin_width: f64,
    pub underflow: u64,
    pub overflow: u64,
}

impl Histogram {
    /// Create an empty histogram with `number_of_bins` (at least one) bins over `range`
    #[must_use]
    pub fn new(number_of_bins: usize, range: (f64, f64)) -> Self {
        let number_of_bins = number_of_bins.max(1);
        Histogram {
            bins: vec![0; number_of_bins],
            range,
            bin_width: (range.1 - range.0) / number_of_bins as f64,
            underflow: 0,
            overflow: 0,
        }
    }

    /// Bin a sample, choosing the bin count with `rule` from the values inside `range`.
    ///
    /// Without a range the sample's own extent is used; a zero-width extent is widened to
    /// `[x - 0.5, x + 0.5]`. Returns `None` when no usable range exists (empty sample,
    /// inverted or non-finite bounds).
    #[must_use]
    pub fn from_sample(sample: &[f64], range: Option<(f64, f64)>, rule: BinningRule) -> Option<Self> {
        let range = resolve_range(sample, range)?;
        let inside: Vec<f64> = present(sample)
            .filter(|x| *x >= range.0 && *x <= range.1)
            .collect();
        let mut histogram = Histogram::new(rule.bin_count(&inside, range), range);
        for &value in sample {
            histogram.fill(value);
        }
        Some(histogram)
    }

    pub fn fill(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        if value < self.range.0 {
            self.underflow += 1;
        } else if value > self.range.1 {
            self.overflow += 1;
        } else {
            let index = ((value - self.range.0) / self.bin_width) as usize;
            let last = self.bins.len() - 1;
            self.bins[index.min(last)] += 1;
        }
    }

    /// Number of entries inside the range
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.bins.iter().sum()
    }

    #[must_use]
    pub fn bin_edge(&self, index: usize) -> f64 {
        self.range.0 + index as f64 * self.bin_width
    }

    #[must_use]
    pub fn bin_center(&self, index: usize) -> f64 {
        self.range.0 + (index as f64 + 0.5) * self.bin_width
    }

    #[must_use]
    pub fn bin_edges(&self) -> Vec<f64> {
        (0..=self.bins.len()).map(|i| self.bin_edge(i)).collect()
    }

    #[must_use]
    pub fn bin_centers(&self) -> Vec<f64> {
        (0..self.bins.len()).map(|i| self.bin_center(i)).collect()
    }

    #[must_use]
    pub fn max_count(&self) -> u64 {
        self.bins.iter().copied().max().unwrap_or(0)
    }

    /// First and last bin holding the maximum count, or `None` for an empty histogram
    #[must_use]
    pub fn modal_bins(&self) -> Option<(usize, usize)> {
        let max = self.max_count();
        if max == 0 {
            return None;
        }
        let first = self.bins.iter().position(|&c| c == max)?;
        let last = self.bins.iter().rposition(|&c| c == max)?;
        Some((first, last))
    }
}

fn resolve_range(sample: &[f64], range: Option<(f64, f64)>) -> Option<(f64, f64)> {
    let (lo, hi) = match range {
        Some(range) => range,
        None => present(sample)
            .filter(|x| x.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, x| match acc {
                Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
                None => Some((x, x)),
            })?,
    };
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return None;
    }
    if lo == hi {
        Some((lo - 0.5, hi + 0.5))
    } else {
        Some((lo, hi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_edges_and_flows() {
        let mut hist = Histogram::new(4, (0.0, 4.0));
        for v in [-1.0, 0.0, 1.5, 3.99, 4.0, 5.0, f64::NAN] {
            hist.fill(v);
        }
        assert_eq!(hist.bins, vec![1, 1, 0, 2]);
        assert_eq!(hist.underflow, 1);
        assert_eq!(hist.overflow, 1);
        assert_eq!(hist.entries(), 4);
    }

    #[test]
    fn test_bin_geometry() {
        let hist = Histogram::new(3, (0.0, 90.0));
        assert_eq!(hist.bin_edges(), vec![0.0, 30.0, 60.0, 90.0]);
        assert_eq!(hist.bin_centers(), vec![15.0, 45.0, 75.0]);
    }

    #[test]
    fn test_modal_bins_reports_tie_span() {
        let mut hist = Histogram::new(5, (0.0, 5.0));
        for v in [0.5, 0.5, 2.5, 3.5, 3.5, 4.5] {
            hist.fill(v);
        }
        assert_eq!(hist.modal_bins(), Some((0, 3)));
        assert_eq!(Histogram::new(5, (0.0, 5.0)).modal_bins(), None);
    }

    #[test]
    fn test_from_sample_without_range_uses_extent() {
        let hist = Histogram::from_sample(&[7.0, 7.0, 7.0], None, BinningRule::Auto).unwrap();
        assert_eq!(hist.range, (6.5, 7.5));
        assert_eq!(hist.entries(), 3);

        assert!(Histogram::from_sample(&[], None, BinningRule::Auto).is_none());
        assert!(Histogram::from_sample(&[1.0], Some((5.0, 1.0)), BinningRule::Auto).is_none());
    }
}
