use rustc_hash::FxHashMap;

use super::{EventSource, check_columns};
use crate::error::SourceError;
use crate::model::{ConfigurationKey, EventData};

/// Event tables held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: FxHashMap<ConfigurationKey, EventData>,
}

impl MemorySource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the tables for `key`
    pub fn insert(&mut self, key: ConfigurationKey, data: EventData) -> &mut Self {
        self.tables.insert(key, data);
        self
    }

    #[must_use]
    pub fn with(mut self, key: ConfigurationKey, data: EventData) -> Self {
        self.insert(key, data);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl EventSource for MemorySource {
    fn resolve(&self, key: &ConfigurationKey) -> Result<EventData, SourceError> {
        let data = self
            .tables
            .get(key)
            .ok_or(SourceError::ConfigurationNotFound(*key))?;
        check_columns(key, data.clone())
    }
}
