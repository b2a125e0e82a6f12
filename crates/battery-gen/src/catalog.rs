use std::fs;
use std::path::PathBuf;

use battery_core::errors::{BatteryError, ErrorInfo};

use crate::descriptor::{load_descriptor, ExperimentDescriptor};

/// Ordered set of descriptors discovered in one experiment repository.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExperimentCatalog {
    experiments: Vec<ExperimentDescriptor>,
}

impl ExperimentCatalog {
    /// Scans the immediate subdirectories of `root` for experiment modules.
    ///
    /// Subdirectories are visited in name order. Modules whose metadata is
    /// missing, malformed or invalid are left out of the catalog.
    pub fn scan(root: impl Into<PathBuf>) -> Result<Self, BatteryError> {
        let root = root.into();
        let read_dir = fs::read_dir(&root).map_err(|err| {
            BatteryError::Catalog(
                ErrorInfo::new("battery_gen.catalog_io", err.to_string()).with_path(&root),
            )
        })?;
        let mut dirs = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|err| {
                BatteryError::Catalog(
                    ErrorInfo::new("battery_gen.catalog_io", err.to_string()).with_path(&root),
                )
            })?;
            let path = entry.path();
            if path.is_dir() {
                dirs.push(path);
            }
        }
        dirs.sort();

        let mut experiments = Vec::with_capacity(dirs.len());
        for dir in dirs {
            match load_descriptor(&dir).and_then(|descriptor| {
                descriptor.validate()?;
                Ok(descriptor)
            }) {
                Ok(descriptor) => experiments.push(descriptor),
                Err(err) => {
                    tracing::debug!(
                        dir = %dir.display(),
                        error = %err,
                        "skipping experiment module"
                    );
                }
            }
        }
        tracing::debug!(
            root = %root.display(),
            count = experiments.len(),
            "experiment catalog built"
        );
        Ok(Self { experiments })
    }

    /// Builds a catalog from descriptors that were loaded elsewhere.
    pub fn from_descriptors(experiments: Vec<ExperimentDescriptor>) -> Self {
        Self { experiments }
    }

    pub fn experiments(&self) -> &[ExperimentDescriptor] {
        &self.experiments
    }

    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    pub fn tags(&self) -> Vec<&str> {
        self.experiments.iter().map(|exp| exp.tag.as_str()).collect()
    }
}
