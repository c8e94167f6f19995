//! Identity of one simulated configuration
//!
//! A configuration is addressed by the incident particle, the plate material, the incident
//! momentum and angle, and optionally the plate thickness. Keys carry no computed state.

use std::fmt;
use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

/// Incident particle species, serialized by its conventional short label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Particle {
    #[serde(rename = "mu-")]
    MuMinus,
    #[serde(rename = "mu+")]
    MuPlus,
    #[serde(rename = "e-")]
    Electron,
    #[serde(rename = "e+")]
    Positron,
    #[serde(rename = "proton")]
    Proton,
    #[serde(rename = "pi-")]
    PionMinus,
    #[serde(rename = "pi+")]
    PionPlus,
}

impl Particle {
    /// Label used in data file names and report titles
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::MuMinus => "mu-",
            Self::MuPlus => "mu+",
            Self::Electron => "e-",
            Self::Positron => "e+",
            Self::Proton => "proton",
            Self::PionMinus => "pi-",
            Self::PionPlus => "pi+",
        }
    }
}

impl fmt::Display for Particle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scattering plate material
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Copper,
    Glass,
    GoldPlatedCopper,
    Gold,
}

impl Material {
    /// Numeric code the simulation writes into output file names
    #[must_use]
    pub fn code(&self) -> u8 {
        match self {
            Self::Copper => 0,
            Self::Glass => 1,
            Self::GoldPlatedCopper => 2,
            Self::Gold => 3,
        }
    }

    /// Inverse of [`Material::code`]
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Copper),
            1 => Some(Self::Glass),
            2 => Some(Self::GoldPlatedCopper),
            3 => Some(Self::Gold),
            _ => None,
        }
    }

    /// Human-readable surface name
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Copper => "Copper",
            Self::Glass => "Glass",
            Self::GoldPlatedCopper => "Gold-Plated-Copper",
            Self::Gold => "Gold",
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Immutable identity of one simulation run.
///
/// Floating-point fields compare and hash by bit pattern so keys can index hash maps.
/// Momentum is in MeV/c, angles in degrees, thickness in millimetres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfigurationKey {
    pub particle: Particle,
    pub material: Material,
    pub momentum: f64,
    pub incident_angle: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f64>,
}

impl ConfigurationKey {
    #[must_use]
    pub fn new(particle: Particle, material: Material, momentum: f64, incident_angle: f64) -> Self {
        Self {
            particle,
            material,
            momentum,
            incident_angle,
            thickness: None,
        }
    }

    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = Some(thickness);
        self
    }

    /// Hash that stays the same from run to run, used to derive per-key seeds
    #[must_use]
    pub fn stable_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        (self.material.code(), self.particle.label()).hash(&mut hasher);
        self.momentum.to_bits().hash(&mut hasher);
        self.incident_angle.to_bits().hash(&mut hasher);
        self.thickness.map(f64::to_bits).hash(&mut hasher);
        hasher.finish()
    }

    fn bits(&self) -> (Particle, Material, u64, u64, Option<u64>) {
        (
            self.particle,
            self.material,
            self.momentum.to_bits(),
            self.incident_angle.to_bits(),
            self.thickness.map(f64::to_bits),
        )
    }
}

impl PartialEq for ConfigurationKey {
    fn eq(&self, other: &Self) -> bool {
        self.bits() == other.bits()
    }
}

impl Eq for ConfigurationKey {}

impl Hash for ConfigurationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits().hash(state);
    }
}

impl fmt::Display for ConfigurationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {} at {} MeV/c, {} deg",
            self.particle, self.material, self.momentum, self.incident_angle
        )?;
        if let Some(thickness) = self.thickness {
            write!(f, ", {thickness} mm")?;
        }
        Ok(())
    }
}
