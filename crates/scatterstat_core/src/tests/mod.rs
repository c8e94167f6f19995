//! Integration tests for the scatterstat engine
//!
//! Tests are organized by topic:
//! - `estimator` - Mean, mode and uncertainty properties
//! - `accounting` - Event classification and conservation checks
//! - `source` - Directory, memory and synthetic event sources
//! - `sweep` - Sweep driver, cut handling and fault policies


use crate::model::{EventData, EventFlags};

/// Builds event tables one event at a time with sequential event identifiers
#[derive(Default)]
pub(crate) struct Events {
    data: EventData,
    next: u64,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn row(&mut self, flags: EventFlags) -> u64 {
        let event = self.next;
        self.next += 1;
        self.data.all.push(event, flags);
        event
    }

    /// A primary leaving at `theta` with 100 MeV/c along the outgoing direction
    pub(crate) fn primary(self, theta: f64) -> Self {
        self.primary_with(theta, 0.0, 100.0, EventFlags::default())
    }

    pub(crate) fn primary_with(mut self, theta: f64, phi: f64, p: f64, flags: EventFlags) -> Self {
        let event = self.row(flags);
        let (t, f) = (theta.to_radians(), phi.to_radians());
        self.data.primary.push(
            event,
            theta,
            phi,
            [p * t.sin() * f.cos(), p * t.sin() * f.sin(), p * t.cos()],
        );
        self
    }

    /// A primary that decayed after leaving the plate
    pub(crate) fn decayed_out(self, theta: f64) -> Self {
        self.primary_with(
            theta,
            0.0,
            100.0,
            EventFlags {
                decayed: true,
                decayed_out: true,
                ..EventFlags::default()
            },
        )
    }

    pub(crate) fn absorbed(mut self) -> Self {
        self.row(EventFlags {
            absorbed: true,
            ..EventFlags::default()
        });
        self
    }

    pub(crate) fn decayed_in(mut self) -> Self {
        self.row(EventFlags {
            decayed: true,
            decayed_in: true,
            ..EventFlags::default()
        });
        self
    }

    pub(crate) fn repeat(mut self, n: usize, f: impl Fn(Self) -> Self) -> Self {
        for _ in 0..n {
            self = f(self);
        }
        self
    }

    /// Record penetration depths for the primaries added so far, in order
    pub(crate) fn depths(mut self, depths: &[f64]) -> Self {
        self.data.primary.depth = depths.to_vec();
        self
    }

    pub(crate) fn build(self) -> EventData {
        self.data
    }
}
