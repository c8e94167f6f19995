//! Configuration types for a configuration sweep.

use serde::{Deserialize, Serialize};

use crate::accounting::Side;
use crate::error::{Result, SweepError};
use crate::model::{ConfigurationKey, Material, MeasurementKind, Particle};
use crate::stats::{BinningRule, ModeEstimator};

/// Minimum side-filtered sample size for estimates to be computed
pub const DEFAULT_CUT: usize = 5;

/// Events the simulation is asked to generate per configuration
pub const DEFAULT_EXPECTED_EVENTS: u64 = 100_000;

/// What the driver does when a configuration faults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPolicy {
    /// Record the fault and keep going
    #[default]
    Lenient,
    /// Stop at the first faulting configuration (in sweep order)
    Strict,
}

/// Complete sweep specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub particles: Vec<Particle>,
    pub materials: Vec<Material>,
    /// Plate thicknesses in mm; empty when the data carries no thickness
    pub thicknesses: Vec<f64>,
    /// Incident momenta in MeV/c
    pub momenta: Vec<f64>,
    /// Incident angles in degrees, any order
    pub angles: Vec<f64>,
    pub cut: usize,
    pub expected_events: u64,
    pub side: Side,
    pub measurements: Vec<MeasurementKind>,
    pub binning: BinningRule,
    pub mode_estimator: ModeEstimator,
    pub policy: FaultPolicy,
    /// Base seed for every bootstrap resample in the sweep
    pub seed: u64,
    /// Deepest physical depth in mm; falls back to each configuration's thickness
    pub depth_limit: Option<f64>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            particles: vec![Particle::MuPlus],
            materials: vec![Material::Copper],
            thicknesses: Vec::new(),
            momenta: Vec::new(),
            angles: Vec::new(),
            cut: DEFAULT_CUT,
            expected_events: DEFAULT_EXPECTED_EVENTS,
            side: Side::default(),
            measurements: MeasurementKind::ALL.to_vec(),
            binning: BinningRule::default(),
            mode_estimator: ModeEstimator::default(),
            policy: FaultPolicy::default(),
            seed: 0,
            depth_limit: None,
        }
    }
}

impl SweepConfig {
    /// Check that the sweep describes at least one configuration with usable values
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(SweepError::InvalidConfig(msg.to_string()));
        if self.particles.is_empty() {
            return invalid("at least one particle required");
        }
        if self.materials.is_empty() {
            return invalid("at least one material required");
        }
        if self.momenta.is_empty() {
            return invalid("at least one momentum required");
        }
        if self.angles.is_empty() {
            return invalid("at least one incident angle required");
        }
        if self.momenta.iter().any(|p| !p.is_finite() || *p <= 0.0) {
            return invalid("momenta must be finite and positive");
        }
        if self.angles.iter().any(|a| !a.is_finite()) {
            return invalid("incident angles must be finite");
        }
        if self.thicknesses.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return invalid("thicknesses must be finite and non-negative");
        }
        if self.depth_limit.is_some_and(|d| !d.is_finite() || d < 0.0) {
            return invalid("depth limit must be finite and non-negative");
        }
        if let ModeEstimator::Bootstrap { resamples: 0 } = self.mode_estimator {
            return invalid("bootstrap needs at least one resample");
        }
        Ok(())
    }

    /// Resolved sweep axes: angles sorted ascending without duplicates, and a single
    /// `None` thickness when no thicknesses are given.
    #[must_use]
    pub fn axes(&self) -> SweepAxes {
        let mut angles = self.angles.clone();
        angles.sort_by(f64::total_cmp);
        angles.dedup();

        let thicknesses = if self.thicknesses.is_empty() {
            vec![None]
        } else {
            self.thicknesses.iter().copied().map(Some).collect()
        };

        SweepAxes {
            particles: self.particles.clone(),
            materials: self.materials.clone(),
            thicknesses,
            momenta: self.momenta.clone(),
            angles,
        }
    }
}

/// Axis positions of the sweep grid
pub mod axis {
    pub const PARTICLE: usize = 0;
    pub const MATERIAL: usize = 1;
    pub const THICKNESS: usize = 2;
    pub const MOMENTUM: usize = 3;
    pub const ANGLE: usize = 4;
}

/// The five enumerations a sweep iterates over, outermost first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepAxes {
    pub particles: Vec<Particle>,
    pub materials: Vec<Material>,
    pub thicknesses: Vec<Option<f64>>,
    pub momenta: Vec<f64>,
    pub angles: Vec<f64>,
}

impl SweepAxes {
    #[must_use]
    pub fn shape(&self) -> Vec<usize> {
        vec![
            self.particles.len(),
            self.materials.len(),
            self.thicknesses.len(),
            self.momenta.len(),
            self.angles.len(),
        ]
    }

    /// Key at grid position `indices`, or `None` when out of bounds
    #[must_use]
    pub fn key(&self, indices: &[usize]) -> Option<ConfigurationKey> {
        let [p, m, t, mom, a] = indices else {
            return None;
        };
        let mut key = ConfigurationKey::new(
            *self.particles.get(*p)?,
            *self.materials.get(*m)?,
            *self.momenta.get(*mom)?,
            *self.angles.get(*a)?,
        );
        key.thickness = *self.thicknesses.get(*t)?;
        Some(key)
    }

    /// Grid position of `key`, or `None` if the key is not part of the sweep
    #[must_use]
    pub fn position(&self, key: &ConfigurationKey) -> Option<Vec<usize>> {
        let bits = |a: f64, b: f64| a.to_bits() == b.to_bits();
        Some(vec![
            self.particles.iter().position(|p| *p == key.particle)?,
            self.materials.iter().position(|m| *m == key.material)?,
            self.thicknesses.iter().position(|t| match (t, key.thickness) {
                (Some(a), Some(b)) => bits(*a, b),
                (None, None) => true,
                _ => false,
            })?,
            self.momenta.iter().position(|p| bits(*p, key.momentum))?,
            self.angles.iter().position(|a| bits(*a, key.incident_angle))?,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_sort_and_dedup_angles() {
        let config = SweepConfig {
            momenta: vec![100.0],
            angles: vec![10.0, 2.0, 5.0, 2.0],
            ..SweepConfig::default()
        };
        let axes = config.axes();
        assert_eq!(axes.angles, vec![2.0, 5.0, 10.0]);
        assert_eq!(axes.thicknesses, vec![None]);
        assert_eq!(axes.shape(), vec![1, 1, 1, 1, 3]);
    }

    #[test]
    fn test_key_position_round_trip() {
        let config = SweepConfig {
            particles: vec![Particle::MuMinus, Particle::MuPlus],
            thicknesses: vec![1.0, 2.0],
            momenta: vec![100.0, 200.0],
            angles: vec![1.0, 3.0],
            ..SweepConfig::default()
        };
        let axes = config.axes();
        let key = axes.key(&[1, 0, 1, 0, 1]).unwrap();
        assert_eq!(key.particle, Particle::MuPlus);
        assert_eq!(key.thickness, Some(2.0));
        assert_eq!(key.incident_angle, 3.0);
        assert_eq!(axes.position(&key), Some(vec![1, 0, 1, 0, 1]));
        assert_eq!(axes.key(&[2, 0, 0, 0, 0]), None);
    }

    #[test]
    fn test_validate_rejects_empty_axes() {
        assert!(matches!(
            SweepConfig::default().validate(),
            Err(SweepError::InvalidConfig(_))
        ));
        let config = SweepConfig {
            momenta: vec![100.0],
            angles: vec![f64::NAN],
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
        let config = SweepConfig {
            momenta: vec![100.0],
            angles: vec![1.0],
            depth_limit: Some(-1.0),
            ..SweepConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
