//! Event classification and bookkeeping checks.
//!
//! Every simulated event ends up in exactly one of: reflected, transmitted, absorbed, or
//! decayed. Primaries that decayed after leaving the plate show up both in the primary list
//! and as decayed, so they are subtracted once to keep the identity
//!
//! ```text
//! reflected + transmitted + absorbed + decayed - decayed_out_reflected - decayed_out_transmitted == total
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::IntegrityFault;
use crate::model::{DepthSummary, EventData, EventTally, MeasurementKind, PrimaryEvents};
use crate::stats::mean;

/// Outgoing polar angle separating reflected from transmitted primaries, in degrees
pub const REFLECTION_LIMIT: f64 = 90.0;

/// Depth the simulation writes for primaries whose depth was never set, in mm
pub const DEPTH_PLACEHOLDER: f64 = 10.0;

/// Count the outcome categories of one configuration.
///
/// Decayed-out events are split by looking up their event identifier in the primary list.
/// Identifiers with no primary entry are counted in `decayed_out_unmatched` and stay out of
/// the conservation sum. Unreadable rows (NaN theta) are neither reflected nor transmitted.
#[must_use]
pub fn classify(data: &EventData) -> EventTally {
    let primary = &data.primary;
    let all = &data.all;

    let mut tally = EventTally {
        total: data.total(),
        ..EventTally::default()
    };

    let mut theta_by_event: FxHashMap<u64, f64> = FxHashMap::default();
    theta_by_event.reserve(primary.len());
    for (&event, &theta) in primary.event.iter().zip(&primary.theta) {
        if theta <= REFLECTION_LIMIT {
            tally.reflected += 1;
        } else if theta > REFLECTION_LIMIT {
            tally.transmitted += 1;
        }
        theta_by_event.entry(event).or_insert(theta);
    }

    for i in 0..all.len() {
        let absorbed = all.absorbed[i];
        if absorbed {
            tally.absorbed += 1;
        }
        if all.decayed[i] && !absorbed {
            tally.decayed += 1;
        }
        if all.decayed_in[i] {
            tally.decayed_in += 1;
        }
        if all.decayed_out[i] {
            match theta_by_event.get(&all.event[i]) {
                Some(&theta) if theta <= REFLECTION_LIMIT => tally.decayed_out_reflected += 1,
                Some(&theta) if theta > REFLECTION_LIMIT => tally.decayed_out_transmitted += 1,
                _ => tally.decayed_out_unmatched += 1,
            }
        }
    }

    tally
}

/// Check a tally against the conservation identity and the expected event count.
///
/// Both faults are reported when both apply. Nothing is corrected.
pub fn validate(tally: &EventTally, expected_total: u64) -> Result<(), Vec<IntegrityFault>> {
    let mut faults = Vec::new();
    if !tally.is_conserved() {
        faults.push(IntegrityFault::ConservationViolation {
            accounted: tally.accounted(),
            total: tally.total,
        });
    }
    if tally.total != expected_total {
        faults.push(IntegrityFault::EventCountMismatch {
            expected: expected_total,
            found: tally.total,
        });
    }
    if faults.is_empty() { Ok(()) } else { Err(faults) }
}

/// Which side of the plate the summarized primaries left from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// `theta <= 90`
    #[default]
    Reflected,
    /// `theta > 90`, folded to `180 - theta`
    Transmitted,
}

impl Side {
    /// Folded theta when a primary with outgoing angle `theta` belongs to this side
    #[must_use]
    pub fn select(&self, theta: f64) -> Option<f64> {
        match self {
            Side::Reflected if theta <= REFLECTION_LIMIT => Some(theta),
            Side::Transmitted if theta > REFLECTION_LIMIT => Some(180.0 - theta),
            _ => None,
        }
    }
}

/// Side-filtered samples of every measurement kind, all of the same length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Samples {
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
    pub momentum: Vec<f64>,
}

impl Samples {
    #[must_use]
    pub fn get(&self, kind: MeasurementKind) -> &[f64] {
        match kind {
            MeasurementKind::Theta => &self.theta,
            MeasurementKind::Phi => &self.phi,
            MeasurementKind::Momentum => &self.momentum,
        }
    }

    /// Number of selected primaries
    #[must_use]
    pub fn len(&self) -> usize {
        self.theta.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.theta.is_empty()
    }
}

/// Select primaries on `side` and extract theta, phi and momentum magnitude with one mask.
#[must_use]
pub fn select_samples(data: &EventData, side: Side) -> Samples {
    let primary = &data.primary;
    let mut samples = Samples::default();
    for (i, &theta) in primary.theta.iter().enumerate() {
        if let Some(folded) = side.select(theta) {
            samples.theta.push(folded);
            samples.phi.push(primary.phi[i]);
            samples.momentum.push(primary.momentum(i));
        }
    }
    samples
}

/// Deepest and mean penetration depth of every primary, ignoring both reflection sides.
///
/// Depths past `limit` (the plate thickness), placeholder depths and NaN are dropped.
/// Returns `None` when the depth column is absent or nothing survives the filters.
#[must_use]
pub fn depth_summary(primary: &PrimaryEvents, limit: Option<f64>) -> Option<DepthSummary> {
    let depths: Vec<f64> = primary
        .depth
        .iter()
        .copied()
        .filter(|d| !d.is_nan() && *d != DEPTH_PLACEHOLDER)
        .filter(|d| limit.is_none_or(|limit| *d <= limit))
        .collect();
    if depths.is_empty() {
        return None;
    }
    Some(DepthSummary {
        count: depths.len(),
        max: depths.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        mean: mean(&depths),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_folding() {
        assert_eq!(Side::Reflected.select(90.0), Some(90.0));
        assert_eq!(Side::Reflected.select(90.5), None);
        assert_eq!(Side::Transmitted.select(150.0), Some(30.0));
        assert_eq!(Side::Transmitted.select(45.0), None);
        assert_eq!(Side::Transmitted.select(f64::NAN), None);
    }

    fn with_depths(depths: &[f64]) -> PrimaryEvents {
        let mut primary = PrimaryEvents::default();
        for (i, &depth) in depths.iter().enumerate() {
            primary.push(i as u64, 30.0, 0.0, [0.0, 0.0, 100.0]);
            primary.depth.push(depth);
        }
        primary
    }

    #[test]
    fn test_depth_summary_filters() {
        let primary = with_depths(&[2.0, 10.0, 35.0, f64::NAN, 4.0, 30.0]);
        let summary = depth_summary(&primary, Some(30.0)).unwrap();
        // 10 is the placeholder and 35 lies past the plate
        assert_eq!(summary.count, 3);
        assert_eq!(summary.max, 30.0);
        assert!((summary.mean - 12.0).abs() < 1e-12);

        let unbounded = depth_summary(&primary, None).unwrap();
        assert_eq!(unbounded.count, 4);
        assert_eq!(unbounded.max, 35.0);
    }

    #[test]
    fn test_depth_summary_without_usable_depths() {
        assert_eq!(depth_summary(&with_depths(&[]), Some(30.0)), None);
        assert_eq!(depth_summary(&with_depths(&[10.0, 10.0]), None), None);
        assert_eq!(depth_summary(&with_depths(&[31.0, 40.0]), Some(30.0)), None);
    }

    #[test]
    fn test_validate_reports_both_faults() {
        let tally = EventTally {
            total: 10,
            reflected: 3,
            ..EventTally::default()
        };
        let faults = validate(&tally, 12).unwrap_err();
        assert_eq!(faults.len(), 2);
        assert!(matches!(
            faults[0],
            IntegrityFault::ConservationViolation { accounted: 3, total: 10 }
        ));
        assert!(matches!(
            faults[1],
            IntegrityFault::EventCountMismatch { expected: 12, found: 10 }
        ));
    }
}
