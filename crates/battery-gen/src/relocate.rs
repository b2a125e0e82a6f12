use std::path::{Path, PathBuf};

use battery_core::errors::{BatteryError, ErrorInfo};
use battery_core::fsio::{copy_tree, remove_tree, CopyStats};
use serde::{Deserialize, Serialize};

use crate::descriptor::ExperimentDescriptor;

/// Directory, relative to the battery root, that holds experiment trees.
pub const EXPERIMENTS_DIR: &str = "static/experiments";

/// Path of an experiment's tree relative to the battery root.
pub fn experiment_rel_dir(tag: &str) -> String {
    format!("{EXPERIMENTS_DIR}/{tag}")
}

/// An experiment whose tree now lives inside the battery.
#[derive(Debug, Clone, PartialEq)]
pub struct RelocatedExperiment {
    pub descriptor: ExperimentDescriptor,
    pub destination: PathBuf,
    pub stats: CopyStats,
}

/// Why an experiment could not be copied into the battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationError {
    pub tag: String,
    pub error: BatteryError,
}

/// Per-experiment outcomes of one relocation pass, in selection order.
#[derive(Debug, Clone, Default)]
pub struct RelocationReport {
    outcomes: Vec<Result<RelocatedExperiment, RelocationError>>,
}

impl RelocationReport {
    /// Descriptors whose copy succeeded, in selection order.
    pub fn relocated(&self) -> Vec<ExperimentDescriptor> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().ok())
            .map(|relocated| relocated.descriptor.clone())
            .collect()
    }

    pub fn failures(&self) -> Vec<&RelocationError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.as_ref().err())
            .collect()
    }
}

/// Copies one experiment tree to `<battery_dest>/static/experiments/<tag>`.
pub fn relocate_one(
    descriptor: &ExperimentDescriptor,
    battery_dest: &Path,
) -> Result<RelocatedExperiment, RelocationError> {
    let destination = battery_dest.join(experiment_rel_dir(&descriptor.tag));
    let existed = destination.exists();
    match copy_tree(&descriptor.source_dir, &destination) {
        Ok(stats) => Ok(RelocatedExperiment {
            descriptor: descriptor.clone(),
            destination,
            stats,
        }),
        Err(err) => {
            // Only clean up what this attempt created.
            if !existed {
                if let Err(cleanup) = remove_tree(&destination) {
                    tracing::warn!(error = %cleanup, "failed to remove partial experiment tree");
                }
            }
            Err(RelocationError {
                tag: descriptor.tag.clone(),
                error: BatteryError::Relocation(
                    ErrorInfo::new("battery_gen.relocate_copy", err.info().message.clone())
                        .with_context("tag", descriptor.tag.clone())
                        .with_context("source", descriptor.source_dir.display().to_string())
                        .with_path(&destination),
                ),
            })
        }
    }
}

/// Copies every selected experiment into the battery, isolating failures.
pub fn relocate(selected: &[ExperimentDescriptor], battery_dest: &Path) -> RelocationReport {
    let outcomes = selected
        .iter()
        .map(|descriptor| {
            let outcome = relocate_one(descriptor, battery_dest);
            match &outcome {
                Ok(moved) => tracing::debug!(
                    tag = %moved.descriptor.tag,
                    destination = %moved.destination.display(),
                    files = moved.stats.files,
                    "experiment relocated"
                ),
                Err(failure) => tracing::warn!(
                    tag = %failure.tag,
                    error = %failure.error,
                    "cannot move experiment, it will not be added"
                ),
            }
            outcome
        })
        .collect();
    RelocationReport { outcomes }
}
