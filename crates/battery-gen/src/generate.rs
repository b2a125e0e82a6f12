use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use battery_core::errors::{BatteryError, ErrorInfo};
use battery_core::fsio::{copy_tree, read_text};
use serde::Serialize;

use crate::catalog::ExperimentCatalog;
use crate::codegen::{template_experiments, GeneratorPolicy};
use crate::config::{generate_config, CONFIG_FILE, DEFAULT_CONFIG_TEMPLATE};
use crate::relocate::RelocationError;
use crate::select::select;
use crate::source::{ResolvedSources, SourceResolver};

/// Arguments of one [`generate`] call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Output folder; must not exist.
    pub destination: PathBuf,
    /// Battery skeleton to copy. Resolved through the [`SourceResolver`] when absent.
    pub battery_repo: Option<PathBuf>,
    /// Experiment repository to scan. Resolved through the [`SourceResolver`] when absent.
    pub experiment_repo: Option<PathBuf>,
    /// Experiment directory names to include; `None` includes the whole catalog.
    pub experiments: Option<Vec<String>>,
    /// Config overrides; an empty map when absent.
    pub config: Option<BTreeMap<String, String>>,
    /// Set to false when the battery already has a config.
    pub make_config: bool,
    /// Load template to render instead of the skeleton's own.
    pub template_file: Option<PathBuf>,
    /// Config template to render instead of the bundled one.
    pub config_template: Option<PathBuf>,
    pub policy: GeneratorPolicy,
}

impl GenerateRequest {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            battery_repo: None,
            experiment_repo: None,
            experiments: None,
            config: None,
            make_config: true,
            template_file: None,
            config_template: None,
            policy: GeneratorPolicy::default(),
        }
    }

    pub fn battery_repo(mut self, path: impl Into<PathBuf>) -> Self {
        self.battery_repo = Some(path.into());
        self
    }

    pub fn experiment_repo(mut self, path: impl Into<PathBuf>) -> Self {
        self.experiment_repo = Some(path.into());
        self
    }

    pub fn experiments<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.experiments = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn config(mut self, fields: BTreeMap<String, String>) -> Self {
        self.config = Some(fields);
        self
    }

    pub fn make_config(mut self, make_config: bool) -> Self {
        self.make_config = make_config;
        self
    }

    pub fn template_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.template_file = Some(path.into());
        self
    }

    pub fn config_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_template = Some(path.into());
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.policy.strict = strict;
        self
    }
}

/// Summary of a completed generation.
#[derive(Debug, Clone, Serialize)]
pub struct BatteryReport {
    pub destination: PathBuf,
    pub catalog: Vec<String>,
    pub selected: Vec<String>,
    pub relocated: Vec<String>,
    pub failures: Vec<RelocationError>,
    pub missing_tokens: Vec<String>,
    /// Tags shared by several selected modules; only the first was kept.
    pub duplicate_tags: Vec<String>,
    pub load_script: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    /// The battery was written.
    Done(BatteryReport),
    /// The destination already existed; nothing was written.
    Aborted { destination: PathBuf },
}

impl GenerateOutcome {
    pub fn report(&self) -> Option<&BatteryReport> {
        match self {
            GenerateOutcome::Done(report) => Some(report),
            GenerateOutcome::Aborted { .. } => None,
        }
    }
}

/// Builds a battery at `request.destination`.
///
/// An existing destination aborts with no writes. After that check every
/// step runs once; a fatal error leaves the partially written destination in
/// place.
pub fn generate(
    request: &GenerateRequest,
    resolver: &dyn SourceResolver,
) -> Result<GenerateOutcome, BatteryError> {
    let destination = &request.destination;
    if destination.exists() {
        tracing::info!(
            destination = %destination.display(),
            "folder exists, cannot generate"
        );
        return Ok(GenerateOutcome::Aborted {
            destination: destination.clone(),
        });
    }

    // Keeps fetched sources alive until generation completes.
    let fetched: Option<ResolvedSources> =
        if request.battery_repo.is_none() || request.experiment_repo.is_none() {
            Some(resolver.resolve()?)
        } else {
            None
        };
    let battery_repo = request
        .battery_repo
        .clone()
        .or_else(|| fetched.as_ref().map(ResolvedSources::battery_repo))
        .ok_or_else(missing_source)?;
    let experiment_repo = request
        .experiment_repo
        .clone()
        .or_else(|| fetched.as_ref().map(ResolvedSources::experiment_repo))
        .ok_or_else(missing_source)?;

    copy_tree(&battery_repo, destination)?;
    let catalog = ExperimentCatalog::scan(&experiment_repo)?;
    let selected = select(&catalog, request.experiments.as_deref());

    let output = template_experiments(
        destination,
        &battery_repo,
        &selected,
        request.template_file.as_deref(),
        request.policy,
    )?;

    let config_file = if request.make_config {
        let template = load_config_template(request.config_template.as_deref())?;
        let fields = request.config.clone().unwrap_or_default();
        generate_config(destination, &template, &fields)?;
        Some(destination.join(CONFIG_FILE))
    } else {
        None
    };

    let report = BatteryReport {
        destination: destination.clone(),
        catalog: catalog.tags().into_iter().map(str::to_owned).collect(),
        selected: selected.iter().map(|exp| exp.tag.clone()).collect(),
        relocated: output.relocated.iter().map(|exp| exp.tag.clone()).collect(),
        failures: output.failures,
        missing_tokens: output.missing_tokens.iter().map(|t| t.to_string()).collect(),
        duplicate_tags: output.duplicate_tags,
        load_script: output.output_path,
        config_file,
    };
    tracing::info!(
        destination = %destination.display(),
        experiments = report.relocated.len(),
        failures = report.failures.len(),
        "battery generated"
    );
    Ok(GenerateOutcome::Done(report))
}

fn missing_source() -> BatteryError {
    BatteryError::Source(ErrorInfo::new(
        "battery_gen.unresolved_source",
        "source resolver returned no location",
    ))
}

fn load_config_template(path: Option<&Path>) -> Result<String, BatteryError> {
    match path {
        Some(path) => read_text(path).map_err(|err| {
            BatteryError::Config(
                ErrorInfo::new("battery_gen.read_config_template", err.info().message.clone())
                    .with_path(path),
            )
        }),
        None => Ok(DEFAULT_CONFIG_TEMPLATE.to_string()),
    }
}
