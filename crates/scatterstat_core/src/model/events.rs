//! Per-configuration event tables
//!
//! Mirrors the two ntuples the simulation writes for every run:
//! - `PrimaryEvents`: one row per primary particle that left the plate, with its outgoing
//!   angles (degrees), momentum components (MeV/c) and, when recorded, the deepest point
//!   it reached inside the plate (mm)
//! - `AllEvents`: one row per simulated event, with decay/absorption flags

use serde::{Deserialize, Serialize};

/// Outgoing kinematics of primary (surviving) particles, stored column-wise
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimaryEvents {
    pub event: Vec<u64>,
    pub theta: Vec<f64>,
    pub phi: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub pz: Vec<f64>,
    /// Penetration depth per row; empty when the run did not record it
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub depth: Vec<f64>,
}

impl PrimaryEvents {
    #[must_use]
    pub fn len(&self) -> usize {
        self.event.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event.is_empty()
    }

    /// Append one row
    pub fn push(&mut self, event: u64, theta: f64, phi: f64, momentum: [f64; 3]) {
        self.event.push(event);
        self.theta.push(theta);
        self.phi.push(phi);
        self.px.push(momentum[0]);
        self.py.push(momentum[1]);
        self.pz.push(momentum[2]);
    }

    /// Momentum magnitude of row `i`
    #[must_use]
    pub fn momentum(&self, i: usize) -> f64 {
        (self.px[i] * self.px[i] + self.py[i] * self.py[i] + self.pz[i] * self.pz[i]).sqrt()
    }

    /// Whether the optional depth column is present
    #[must_use]
    pub fn has_depth(&self) -> bool {
        !self.depth.is_empty()
    }

    /// Name of the first column whose length disagrees with `event`.
    ///
    /// An empty depth column means "not recorded" and is never ragged.
    pub(crate) fn ragged_column(&self) -> Option<&'static str> {
        let n = self.event.len();
        [
            ("theta", self.theta.len()),
            ("phi", self.phi.len()),
            ("px", self.px.len()),
            ("py", self.py.len()),
            ("pz", self.pz.len()),
            ("depth", if self.has_depth() { self.depth.len() } else { n }),
        ]
        .into_iter()
        .find(|(_, len)| *len != n)
        .map(|(name, _)| name)
    }
}

/// Flags recorded for every simulated event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllEvents {
    pub event: Vec<u64>,
    pub decayed: Vec<bool>,
    pub absorbed: Vec<bool>,
    pub decayed_in: Vec<bool>,
    pub decayed_out: Vec<bool>,
}

/// Flags of a single row in [`AllEvents`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventFlags {
    pub decayed: bool,
    pub absorbed: bool,
    pub decayed_in: bool,
    pub decayed_out: bool,
}

impl AllEvents {
    #[must_use]
    pub fn len(&self) -> usize {
        self.event.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.event.is_empty()
    }

    pub fn push(&mut self, event: u64, flags: EventFlags) {
        self.event.push(event);
        self.decayed.push(flags.decayed);
        self.absorbed.push(flags.absorbed);
        self.decayed_in.push(flags.decayed_in);
        self.decayed_out.push(flags.decayed_out);
    }

    pub(crate) fn ragged_column(&self) -> Option<&'static str> {
        let n = self.event.len();
        [
            ("decayed", self.decayed.len()),
            ("absorbed", self.absorbed.len()),
            ("decayed_in", self.decayed_in.len()),
            ("decayed_out", self.decayed_out.len()),
        ]
        .into_iter()
        .find(|(_, len)| *len != n)
        .map(|(name, _)| name)
    }
}

/// Everything an event source yields for one configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventData {
    pub primary: PrimaryEvents,
    pub all: AllEvents,
}

impl EventData {
    /// Total number of simulated events
    #[must_use]
    pub fn total(&self) -> u64 {
        self.all.len() as u64
    }

    /// Check that every column in each table has the same length.
    ///
    /// Returns `(table, column)` for the first offending column.
    pub fn check_columns(&self) -> Result<(), (&'static str, &'static str)> {
        if let Some(column) = self.primary.ragged_column() {
            return Err(("primary", column));
        }
        if let Some(column) = self.all.ragged_column() {
            return Err(("all", column));
        }
        Ok(())
    }
}
