mod events;
mod ids;
mod results;

pub use events::{AllEvents, EventData, EventFlags, PrimaryEvents};
pub use ids::{ConfigurationKey, Material, Particle};
pub use results::{ConfigurationOutcome, DepthSummary, Estimate, EventTally, MeasurementKind};
