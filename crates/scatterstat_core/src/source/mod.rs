//! Where per-configuration event data comes from
//!
//! The sweep driver only sees [`EventSource`]. Concrete sources:
//! - [`MemorySource`]: pre-built tables keyed by configuration
//! - [`DirectorySource`]: one JSON ntuple file per configuration on disk
//! - [`SyntheticSource`]: seeded generator for demos and benchmarks

mod directory;
mod memory;
mod synthetic;

pub use directory::DirectorySource;
pub use memory::MemorySource;
pub use synthetic::{SyntheticProfile, SyntheticSource};

use crate::error::SourceError;
use crate::model::{ConfigurationKey, EventData};

/// Supplies the event tables for one configuration.
///
/// Implementations must return [`SourceError::ConfigurationNotFound`] when no data exists
/// for a key instead of an empty table.
pub trait EventSource {
    fn resolve(&self, key: &ConfigurationKey) -> Result<EventData, SourceError>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn resolve(&self, key: &ConfigurationKey) -> Result<EventData, SourceError> {
        (**self).resolve(key)
    }
}

/// Reject tables whose columns disagree in length
pub(crate) fn check_columns(key: &ConfigurationKey, data: EventData) -> Result<EventData, SourceError> {
    match data.check_columns() {
        Ok(()) => Ok(data),
        Err((table, column)) => Err(SourceError::Malformed {
            key: *key,
            table,
            column,
        }),
    }
}
