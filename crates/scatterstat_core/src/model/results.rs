//! Per-configuration summary records
//!
//! These are the only values that outlive a single configuration: the sweep driver keeps
//! one [`ConfigurationOutcome`] per key and hands them to the reporting side.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::ids::ConfigurationKey;

/// Which outgoing quantity a sample holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKind {
    /// Outgoing polar angle (degrees)
    Theta,
    /// Outgoing azimuthal angle (degrees)
    Phi,
    /// Outgoing momentum magnitude (MeV/c)
    Momentum,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 3] = [Self::Theta, Self::Phi, Self::Momentum];

    /// Legal value range used for histogramming.
    ///
    /// Momentum cannot exceed the incident momentum.
    #[must_use]
    pub fn domain(&self, incident_momentum: f64) -> (f64, f64) {
        match self {
            Self::Theta => (0.0, 90.0),
            Self::Phi => (0.0, 360.0),
            Self::Momentum => (0.0, incident_momentum),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Theta => "theta",
            Self::Phi => "phi",
            Self::Momentum => "momentum",
        }
    }

    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Theta | Self::Phi => "deg",
            Self::Momentum => "MeV/c",
        }
    }
}

/// JSON writes NaN as `null`; read it back as NaN
fn nan_from_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Point estimates and uncertainties for one sample.
///
/// Undefined statistics are NaN rather than errors. Mode errors and the mean error are
/// never negative when defined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub sample_size: usize,
    #[serde(deserialize_with = "nan_from_null")]
    pub mean: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub mean_error: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub mode: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub mode_error_left: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub mode_error_right: f64,
    #[serde(deserialize_with = "nan_from_null")]
    pub std_dev: f64,
}

impl Estimate {
    /// Estimate for a sample that supports no statistics at all
    #[must_use]
    pub fn undefined(sample_size: usize) -> Self {
        Self {
            sample_size,
            mean: f64::NAN,
            mean_error: f64::NAN,
            mode: f64::NAN,
            mode_error_left: f64::NAN,
            mode_error_right: f64::NAN,
            std_dev: f64::NAN,
        }
    }

    /// Larger of the two mode errors
    #[must_use]
    pub fn mode_error(&self) -> f64 {
        self.mode_error_left.max(self.mode_error_right)
    }
}

/// Event classification counts for one configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTally {
    pub total: u64,
    pub reflected: u64,
    pub transmitted: u64,
    pub absorbed: u64,
    pub decayed: u64,
    pub decayed_in: u64,
    pub decayed_out_reflected: u64,
    pub decayed_out_transmitted: u64,
    /// Decayed-out events with no matching primary entry; outside the conservation sum
    #[serde(default)]
    pub decayed_out_unmatched: u64,
}

impl EventTally {
    /// Left-hand side of the conservation identity
    /// `reflected + transmitted + absorbed + decayed - decayed_out_* == total`
    #[must_use]
    pub fn accounted(&self) -> i128 {
        i128::from(self.reflected)
            + i128::from(self.transmitted)
            + i128::from(self.absorbed)
            + i128::from(self.decayed)
            - i128::from(self.decayed_out_reflected)
            - i128::from(self.decayed_out_transmitted)
    }

    #[must_use]
    pub fn is_conserved(&self) -> bool {
        self.accounted() == i128::from(self.total)
    }

    /// All decayed-out events, matched or not
    #[must_use]
    pub fn decayed_out(&self) -> u64 {
        self.decayed_out_reflected + self.decayed_out_transmitted + self.decayed_out_unmatched
    }
}

/// How deep the primaries of one configuration went into the plate (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepthSummary {
    /// Depths left after dropping placeholders and values past the plate
    pub count: usize,
    pub max: f64,
    pub mean: f64,
}

/// Everything retained about one evaluated configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationOutcome {
    pub key: ConfigurationKey,
    pub tally: EventTally,
    /// Size of the side-filtered sample that fed (or would have fed) the estimator
    pub sample_size: usize,
    /// True when `sample_size` was below the sweep's cut and no estimates were made
    pub below_cut: bool,
    pub estimates: BTreeMap<MeasurementKind, Estimate>,
    /// `None` without a depth column or when no usable depth remains
    #[serde(default)]
    pub depth: Option<DepthSummary>,
}

impl ConfigurationOutcome {
    #[must_use]
    pub fn estimate(&self, kind: MeasurementKind) -> Option<&Estimate> {
        self.estimates.get(&kind)
    }
}
