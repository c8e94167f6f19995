use std::path::{Path, PathBuf};

use super::{EventSource, check_columns};
use crate::error::SourceError;
use crate::model::{ConfigurationKey, EventData};

/// Reads one JSON ntuple file per configuration from a data directory.
///
/// Files are named `output_{material code}_{particle}_{momentum}_{angle}[_{thickness}].json`.
/// Simulation batches were written with and without the thickness suffix and with integer or
/// fractional angles, so several names are tried in order; see [`DirectorySource::candidates`].
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names tried for `key`, in order:
    ///
    /// 1. exact angle
    /// 2. exact angle with thickness
    /// 3. rounded angle (halves round to even, so 2.5 becomes 2)
    /// 4. rounded angle with thickness
    ///
    /// Thickness variants are left out when the key has no thickness; duplicates (an angle
    /// that is already whole) are dropped.
    #[must_use]
    pub fn candidates(&self, key: &ConfigurationKey) -> Vec<PathBuf> {
        let stem = format!(
            "output_{}_{}_{}",
            key.material.code(),
            key.particle.label(),
            key.momentum
        );
        let mut names = Vec::with_capacity(4);
        for angle in [key.incident_angle, key.incident_angle.round_ties_even()] {
            names.push(format!("{stem}_{angle}.json"));
            if let Some(thickness) = key.thickness {
                names.push(format!("{stem}_{angle}_{thickness}.json"));
            }
        }
        let mut paths: Vec<PathBuf> = Vec::with_capacity(names.len());
        for name in names {
            let path = self.root.join(name);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    fn read(path: &Path) -> Result<EventData, SourceError> {
        let text = std::fs::read_to_string(path).map_err(|e| SourceError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&text).map_err(|e| SourceError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

impl EventSource for DirectorySource {
    fn resolve(&self, key: &ConfigurationKey) -> Result<EventData, SourceError> {
        let Some(path) = self.candidates(key).into_iter().find(|p| p.is_file()) else {
            return Err(SourceError::ConfigurationNotFound(*key));
        };
        tracing::trace!(path = %path.display(), "reading event file");
        check_columns(key, Self::read(&path)?)
    }
}
