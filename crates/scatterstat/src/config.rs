//! Run configuration loaded from YAML
//!
//! ```yaml
//! data_dir: data/v1
//! output_dir: out
//! sweep:
//!   particles: [mu+]
//!   materials: [copper, gold]
//!   momenta: [100, 200]
//!   angles: [0.5, 1, 2, 5]
//!   mode_estimator:
//!     policy: bootstrap
//!     resamples: 200
//! report:
//!   thickness_study: true
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use scatterstat_core::{SweepConfig, SweepError};
use serde::{Deserialize, Serialize};

use crate::report::ReportOptions;

fn default_output_dir() -> PathBuf {
    PathBuf::from("scatterstat-out")
}

/// Everything needed for one `scatterstat run`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding the per-configuration JSON event files
    pub data_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub sweep: SweepConfig,
    #[serde(default)]
    pub report: ReportOptions,
}

/// Error types for loading a run configuration
#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    Invalid(SweepError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, .. } => write!(f, "cannot read {}", path.display()),
            ConfigError::Parse { path, message } => {
                write!(f, "cannot parse {}: {message}", path.display())
            }
            ConfigError::Invalid(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Invalid(err) => Some(err),
            ConfigError::Parse { .. } => None,
        }
    }
}

impl From<SweepError> for ConfigError {
    fn from(err: SweepError) -> Self {
        ConfigError::Invalid(err)
    }
}

impl RunConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }

    /// Load, validate and anchor relative paths at the config file's directory
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml(&yaml).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.sweep.validate()?;

        if let Some(base) = path.parent() {
            config.data_dir = anchor(base, &config.data_dir);
            config.output_dir = anchor(base, &config.output_dir);
        }
        tracing::debug!(
            data_dir = %config.data_dir.display(),
            output_dir = %config.output_dir.display(),
            "loaded run configuration"
        );
        Ok(config)
    }
}

fn anchor(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
