use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use serde::{Deserialize, Serialize};

use super::EventSource;
use crate::error::SourceError;
use crate::model::{AllEvents, ConfigurationKey, EventData, EventFlags, PrimaryEvents};

/// Shape of the generated events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticProfile {
    /// Events simulated per configuration
    pub events: u64,
    /// Probability that a surviving primary is reflected at zero incident angle
    pub reflectivity: f64,
    /// Incident angle (degrees) over which reflectivity falls by a factor of e
    pub reflectivity_scale: f64,
    pub absorption: f64,
    /// Probability of decaying inside the plate
    pub decay_in: f64,
    /// Probability that a surviving primary decays after leaving the plate
    pub decay_out: f64,
    /// Spread of the outgoing polar angle around the specular direction (degrees)
    pub theta_spread: f64,
    /// Mean fraction of the incident momentum lost in the plate
    pub momentum_loss: f64,
    /// Spread of the outgoing momentum as a fraction of the incident momentum
    pub momentum_spread: f64,
    /// Mean penetration depth of primaries in mm (exponentially distributed)
    pub mean_depth: f64,
}

impl Default for SyntheticProfile {
    fn default() -> Self {
        Self {
            events: 2_000,
            reflectivity: 0.6,
            reflectivity_scale: 12.0,
            absorption: 0.05,
            decay_in: 0.02,
            decay_out: 0.03,
            theta_spread: 4.0,
            momentum_loss: 0.1,
            momentum_spread: 0.05,
            mean_depth: 3.0,
        }
    }
}

impl SyntheticProfile {
    fn check(&self) -> Result<(), SourceError> {
        let probabilities = [
            ("reflectivity", self.reflectivity),
            ("absorption", self.absorption),
            ("decay_in", self.decay_in),
            ("decay_out", self.decay_out),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(SourceError::InvalidParameters(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        if self.absorption + self.decay_in > 1.0 {
            return Err(SourceError::InvalidParameters(
                "absorption + decay_in must not exceed 1".to_string(),
            ));
        }
        if self.reflectivity_scale.is_nan() || self.reflectivity_scale <= 0.0 {
            return Err(SourceError::InvalidParameters(
                "reflectivity_scale must be positive".to_string(),
            ));
        }
        if !(self.mean_depth.is_finite() && self.mean_depth > 0.0) {
            return Err(SourceError::InvalidParameters(
                "mean_depth must be finite and positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Generates plausible scattering events for any configuration.
///
/// Each event is absorbed, decays inside the plate, or leaves as a primary. Primaries are
/// reflected with a probability that falls off with incident angle, so high angles thin
/// out the reflected sample. Output for a key depends only on the key and the seed.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    profile: SyntheticProfile,
    seed: u64,
    missing: Vec<ConfigurationKey>,
}

impl SyntheticSource {
    #[must_use]
    pub fn new(profile: SyntheticProfile, seed: u64) -> Self {
        Self {
            profile,
            seed,
            missing: Vec::new(),
        }
    }

    /// Report `key` as not found, as if its simulation never ran
    #[must_use]
    pub fn without(mut self, key: ConfigurationKey) -> Self {
        self.missing.push(key);
        self
    }

    #[must_use]
    pub fn profile(&self) -> &SyntheticProfile {
        &self.profile
    }

    fn generate(&self, key: &ConfigurationKey) -> Result<EventData, SourceError> {
        let profile = &self.profile;
        profile.check()?;

        let invalid = |what: &str| {
            SourceError::InvalidParameters(format!("{what} spread must be finite and non-negative"))
        };
        if !(key.momentum.is_finite() && key.momentum >= 0.0) || !key.incident_angle.is_finite() {
            return Err(SourceError::InvalidParameters(format!(
                "cannot generate events for {key}"
            )));
        }
        let incident = key.momentum;
        let theta_dist = rand_distr::Normal::new(key.incident_angle, profile.theta_spread)
            .map_err(|_| invalid("theta"))?;
        let momentum_dist = rand_distr::Normal::new(
            incident * (1.0 - profile.momentum_loss),
            incident * profile.momentum_spread,
        )
        .map_err(|_| invalid("momentum"))?;
        let depth_dist = rand_distr::Exp::new(1.0 / profile.mean_depth).map_err(|_| {
            SourceError::InvalidParameters("mean_depth must be finite and positive".to_string())
        })?;

        let reflect_p = (profile.reflectivity
            * (-key.incident_angle / profile.reflectivity_scale).exp())
        .clamp(0.0, 1.0);
        let mut rng = rand::rngs::StdRng::seed_from_u64(self.seed ^ key.stable_hash());
        let mut primary = PrimaryEvents::default();
        let mut all = AllEvents::default();

        for event in 0..profile.events {
            let u: f64 = rng.random();
            if u < profile.absorption {
                all.push(
                    event,
                    EventFlags {
                        absorbed: true,
                        ..EventFlags::default()
                    },
                );
                continue;
            }
            if u < profile.absorption + profile.decay_in {
                all.push(
                    event,
                    EventFlags {
                        decayed: true,
                        decayed_in: true,
                        ..EventFlags::default()
                    },
                );
                continue;
            }

            // mirror into [0, 90) so the angle stays on the reflected hemisphere
            let mut theta = theta_dist.sample(&mut rng).abs();
            if theta >= 90.0 {
                theta = (180.0 - theta).clamp(0.0, 89.99);
            }
            if !rng.random_bool(reflect_p) {
                theta = 180.0 - theta;
            }
            let phi: f64 = rng.random_range(0.0..360.0);
            let p = momentum_dist.sample(&mut rng).clamp(0.0, incident);
            let (t, f) = (theta.to_radians(), phi.to_radians());
            primary.push(
                event,
                theta,
                phi,
                [p * t.sin() * f.cos(), p * t.sin() * f.sin(), p * t.cos()],
            );
            primary.depth.push(depth_dist.sample(&mut rng));

            let decays = rng.random_bool(profile.decay_out);
            all.push(
                event,
                EventFlags {
                    decayed: decays,
                    decayed_out: decays,
                    ..EventFlags::default()
                },
            );
        }

        Ok(EventData { primary, all })
    }
}

impl EventSource for SyntheticSource {
    fn resolve(&self, key: &ConfigurationKey) -> Result<EventData, SourceError> {
        if self.missing.contains(key) {
            return Err(SourceError::ConfigurationNotFound(*key));
        }
        self.generate(key)
    }
}
