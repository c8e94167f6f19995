//! What a sweep leaves behind: one outcome per configuration plus the faults found.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::config::{SweepAxes, axis};
use super::grid::SweepGrid;
use crate::error::SweepFault;
use crate::model::{
    ConfigurationKey, ConfigurationOutcome, DepthSummary, Estimate, EventTally, Material,
    MeasurementKind, Particle,
};

/// Results of a completed sweep.
///
/// Cells are `None` for configurations whose data could not be resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResults {
    pub axes: SweepAxes,
    pub cut: usize,
    pub outcomes: SweepGrid<Option<ConfigurationOutcome>>,
    pub faults: Vec<SweepFault>,
}

/// Estimates for one incident angle that passed the cut
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnglePoint {
    pub incident_angle: f64,
    pub sample_size: usize,
    pub estimates: BTreeMap<MeasurementKind, Estimate>,
}

/// Event counts for one incident angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AngleTally {
    pub incident_angle: f64,
    pub sample_size: usize,
    pub tally: EventTally,
    #[serde(default)]
    pub depth: Option<DepthSummary>,
}

/// Everything recorded for one momentum, ordered by increasing incident angle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentumSeries {
    pub particle: Particle,
    pub material: Material,
    pub thickness: Option<f64>,
    pub momentum: f64,
    /// Every resolved angle, whether or not it passed the cut
    pub tallies: Vec<AngleTally>,
    /// Angles that passed the cut, with their estimates
    pub points: Vec<AnglePoint>,
    /// Angles whose sample fell below the cut
    pub below_cut: Vec<f64>,
    /// First angle, in increasing order, whose sample fell below the cut
    pub cutoff_angle: Option<f64>,
}

impl MomentumSeries {
    /// `(incident angle, depth)` for every angle with usable depths
    #[must_use]
    pub fn depths(&self) -> Vec<(f64, DepthSummary)> {
        self.tallies
            .iter()
            .filter_map(|t| t.depth.map(|d| (t.incident_angle, d)))
            .collect()
    }

    /// `(incident angle, estimate)` pairs for one measurement kind
    #[must_use]
    pub fn estimates(&self, kind: MeasurementKind) -> Vec<(f64, Estimate)> {
        self.points
            .iter()
            .filter_map(|p| p.estimates.get(&kind).map(|e| (p.incident_angle, *e)))
            .collect()
    }
}

impl SweepResults {
    #[must_use]
    pub fn outcome(&self, key: &ConfigurationKey) -> Option<&ConfigurationOutcome> {
        let indices = self.axes.position(key)?;
        self.outcomes.get(&indices)?.as_ref()
    }

    /// Every resolved outcome in sweep order
    pub fn iter(&self) -> impl Iterator<Item = &ConfigurationOutcome> {
        self.outcomes.data().iter().flatten()
    }

    #[must_use]
    pub fn has_faults(&self) -> bool {
        !self.faults.is_empty()
    }

    /// Angle series for one (particle, material, thickness, momentum).
    ///
    /// `None` when any coordinate is not on the sweep axes.
    #[must_use]
    pub fn momentum_series(
        &self,
        particle: Particle,
        material: Material,
        thickness: Option<f64>,
        momentum: f64,
    ) -> Option<MomentumSeries> {
        let first_angle = *self.axes.angles.first()?;
        let mut probe = ConfigurationKey::new(particle, material, momentum, first_angle);
        probe.thickness = thickness;
        let at = self.axes.position(&probe)?;
        Some(self.series_at(&at))
    }

    /// Every momentum series, outer axes first
    #[must_use]
    pub fn series(&self) -> Vec<MomentumSeries> {
        if self.axes.angles.is_empty() {
            return Vec::new();
        }
        let mut shape = self.axes.shape();
        shape[axis::ANGLE] = 1;
        SweepGrid::new(shape, ())
            .indices()
            .map(|at| self.series_at(&at))
            .collect()
    }

    /// Tallies across plate thicknesses at a fixed particle, material, momentum and angle.
    ///
    /// Only thickness-tagged configurations that were resolved are included.
    #[must_use]
    pub fn thickness_scan(
        &self,
        particle: Particle,
        material: Material,
        momentum: f64,
        incident_angle: f64,
    ) -> Vec<(f64, EventTally)> {
        self.axes
            .thicknesses
            .iter()
            .flatten()
            .filter_map(|&thickness| {
                let key = ConfigurationKey::new(particle, material, momentum, incident_angle)
                    .with_thickness(thickness);
                self.outcome(&key).map(|o| (thickness, o.tally))
            })
            .collect()
    }

    fn series_at(&self, at: &[usize]) -> MomentumSeries {
        let mut series = MomentumSeries {
            particle: self.axes.particles[at[axis::PARTICLE]],
            material: self.axes.materials[at[axis::MATERIAL]],
            thickness: self.axes.thicknesses[at[axis::THICKNESS]],
            momentum: self.axes.momenta[at[axis::MOMENTUM]],
            tallies: Vec::new(),
            points: Vec::new(),
            below_cut: Vec::new(),
            cutoff_angle: None,
        };

        let lane = self.outcomes.lane(axis::ANGLE, at).unwrap_or_default();
        for outcome in lane.into_iter().flatten() {
            let angle = outcome.key.incident_angle;
            series.tallies.push(AngleTally {
                incident_angle: angle,
                sample_size: outcome.sample_size,
                tally: outcome.tally,
                depth: outcome.depth,
            });
            if outcome.below_cut {
                series.below_cut.push(angle);
                series.cutoff_angle.get_or_insert(angle);
            } else {
                series.points.push(AnglePoint {
                    incident_angle: angle,
                    sample_size: outcome.sample_size,
                    estimates: outcome.estimates.clone(),
                });
            }
        }
        series
    }
}
