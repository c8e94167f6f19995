use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::ConfigurationKey;

/// Errors raised by an event source while resolving a configuration
#[derive(Debug, Clone, PartialEq)]
pub enum SourceError {
    /// No data exists for the requested key
    ConfigurationNotFound(ConfigurationKey),
    /// Data exists but could not be read
    Io { path: PathBuf, message: String },
    /// Data was read but is not a valid event file
    Parse { path: PathBuf, message: String },
    /// Columns within one table have different lengths
    Malformed {
        key: ConfigurationKey,
        table: &'static str,
        column: &'static str,
    },
    /// A generating source was given parameters it cannot sample from
    InvalidParameters(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::ConfigurationNotFound(key) => {
                write!(f, "no data found for configuration {key}")
            }
            SourceError::Io { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            SourceError::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
            SourceError::Malformed { key, table, column } => write!(
                f,
                "column {table}.{column} has the wrong length for configuration {key}"
            ),
            SourceError::InvalidParameters(msg) => write!(f, "invalid source parameters: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Data-integrity faults found by the event accountant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityFault {
    /// The classification counts do not add up to the total number of events
    ConservationViolation { accounted: i128, total: u64 },
    /// The total number of events differs from the expected event count
    EventCountMismatch { expected: u64, found: u64 },
}

impl fmt::Display for IntegrityFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityFault::ConservationViolation { accounted, total } => write!(
                f,
                "conservation violated: categories account for {accounted} of {total} events"
            ),
            IntegrityFault::EventCountMismatch { expected, found } => {
                write!(f, "expected {expected} events, found {found}")
            }
        }
    }
}

impl std::error::Error for IntegrityFault {}

/// What went wrong for one configuration during a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultKind {
    ConfigurationNotFound,
    SourceUnreadable { message: String },
    Integrity { fault: IntegrityFault },
}

impl From<&SourceError> for FaultKind {
    fn from(err: &SourceError) -> Self {
        match err {
            SourceError::ConfigurationNotFound(_) => FaultKind::ConfigurationNotFound,
            other => FaultKind::SourceUnreadable {
                message: other.to_string(),
            },
        }
    }
}

impl From<IntegrityFault> for FaultKind {
    fn from(fault: IntegrityFault) -> Self {
        FaultKind::Integrity { fault }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::ConfigurationNotFound => write!(f, "configuration not found"),
            FaultKind::SourceUnreadable { message } => write!(f, "{message}"),
            FaultKind::Integrity { fault } => write!(f, "{fault}"),
        }
    }
}

/// A fault tied to the configuration it was found in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepFault {
    pub key: ConfigurationKey,
    #[serde(flatten)]
    pub kind: FaultKind,
}

impl fmt::Display for SweepFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.kind)
    }
}

/// Errors that stop a sweep
#[derive(Debug, Clone)]
pub enum SweepError {
    /// Strict policy hit a fault; carries every fault seen up to that point
    Aborted { faults: Vec<SweepFault> },
    /// The sweep configuration itself is unusable
    InvalidConfig(String),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Aborted { faults } => {
                write!(f, "sweep aborted after {} fault(s)", faults.len())?;
                for fault in faults {
                    write!(f, "\n  {fault}")?;
                }
                Ok(())
            }
            SweepError::InvalidConfig(msg) => write!(f, "invalid sweep configuration: {msg}"),
        }
    }
}

impl std::error::Error for SweepError {}

pub type Result<T> = std::result::Result<T, SweepError>;
