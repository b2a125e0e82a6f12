//! Generates the experiment dispatch code spliced into the load template.
//!
//! Three fragments are produced from the relocated experiments, always in the
//! same order: a `switch` body loading each experiment's assets, a `switch`
//! body concatenating each experiment's timeline variable, and a timing
//! literal consumed by the runner's progress estimate.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use battery_core::errors::{BatteryError, ErrorInfo};
use battery_core::fsio::{read_text, write_text};
use serde::Serialize;

use crate::descriptor::ExperimentDescriptor;
use crate::relocate::{experiment_rel_dir, relocate, RelocationError};

pub const LOAD_TOKEN: &str = "[SUB_EXPERIMENTLOAD_SUB]";
pub const CONCAT_TOKEN: &str = "[SUB_EXPERIMENTCONCAT_SUB]";
pub const TIMES_TOKEN: &str = "[SUB_EXPERIMENTTIMES_SUB]";

/// Location of the load template inside a battery skeleton.
pub const LOAD_TEMPLATE_PATH: &str = "static/js/load_experiments.js";

const LOAD_INDENT: &str = "         ";
const CONCAT_INDENT: &str = "      ";

/// How tolerant generation is of duplicate tags and missing placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GeneratorPolicy {
    /// Turn duplicate tags and missing placeholder tokens into errors.
    pub strict: bool,
}

/// The three generated fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    /// `case` bodies calling `loadjscssfile` for every asset.
    pub load: String,
    /// `case` bodies appending `<tag>_experiment` to the timeline.
    pub concat: String,
    /// JSON array of `{name, time}` records.
    pub timing: String,
}

impl Fragments {
    pub fn build(experiments: &[ExperimentDescriptor]) -> Result<Self, BatteryError> {
        Ok(Self {
            load: load_fragment(experiments),
            concat: concat_fragment(experiments),
            timing: timing_fragment(experiments)?,
        })
    }
}

/// Lower-cased extension of the asset's final path component, without the dot.
pub fn asset_kind(asset: &str) -> String {
    Path::new(asset)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Battery-relative path an asset is loaded from.
///
/// Bare file names live in the experiment's own folder; anything containing
/// a `/` is already relative to the battery root.
pub fn resolve_asset_path(tag: &str, asset: &str) -> String {
    if asset.contains('/') {
        asset.to_string()
    } else {
        format!("{}/{asset}", experiment_rel_dir(tag))
    }
}

/// One `case` per experiment loading its assets in declared order.
pub fn load_fragment(experiments: &[ExperimentDescriptor]) -> String {
    let mut out = String::from("\n");
    for exp in experiments {
        out.push_str(&format!("case \"{}\":\n", exp.tag));
        for asset in &exp.run {
            out.push_str(&format!(
                "{LOAD_INDENT}loadjscssfile(\"{}\",\"{}\")\n",
                resolve_asset_path(&exp.tag, asset),
                asset_kind(asset)
            ));
        }
        out.push_str(&format!("{LOAD_INDENT}break;\n"));
    }
    out
}

/// One `case` per experiment concatenating its timeline variable.
pub fn concat_fragment(experiments: &[ExperimentDescriptor]) -> String {
    let mut out = String::from("\n");
    for exp in experiments {
        out.push_str(&format!("case \"{}\":\n", exp.tag));
        out.push_str(&format!(
            "{CONCAT_INDENT}experiments = experiments.concat({})\n",
            exp.variable_name()
        ));
        out.push_str(&format!("{CONCAT_INDENT}break;\n"));
    }
    out
}

#[derive(Serialize)]
struct TimingEntry<'a> {
    name: &'a str,
    time: &'a serde_json::Number,
}

/// Estimated durations as a JSON array, in experiment order.
pub fn timing_fragment(experiments: &[ExperimentDescriptor]) -> Result<String, BatteryError> {
    let entries: Vec<TimingEntry<'_>> = experiments
        .iter()
        .map(|exp| TimingEntry {
            name: &exp.tag,
            time: &exp.time,
        })
        .collect();
    serde_json::to_string(&entries).map_err(|err| {
        BatteryError::Template(ErrorInfo::new("battery_gen.timing_serialize", err.to_string()))
    })
}

/// Tags that occur more than once, in first-seen order.
pub fn duplicate_tags(experiments: &[ExperimentDescriptor]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut duplicates = Vec::new();
    for exp in experiments {
        if !seen.insert(exp.tag.as_str()) && !duplicates.contains(&exp.tag) {
            duplicates.push(exp.tag.clone());
        }
    }
    duplicates
}

/// Keeps the first descriptor for each tag, preserving order.
pub fn first_per_tag(experiments: &[ExperimentDescriptor]) -> Vec<ExperimentDescriptor> {
    let mut seen = BTreeSet::new();
    experiments
        .iter()
        .filter(|exp| seen.insert(exp.tag.as_str()))
        .cloned()
        .collect()
}

/// Template text after substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub text: String,
    /// Placeholder tokens that were not present in the template.
    pub missing_tokens: Vec<&'static str>,
}

/// Replaces the first occurrence of each placeholder token with its fragment.
pub fn render_load_template(template: &str, fragments: &Fragments) -> RenderedTemplate {
    let mut text = template.to_string();
    let mut missing_tokens = Vec::new();
    for (token, fragment) in [
        (CONCAT_TOKEN, &fragments.concat),
        (LOAD_TOKEN, &fragments.load),
        (TIMES_TOKEN, &fragments.timing),
    ] {
        if text.contains(token) {
            text = text.replacen(token, fragment, 1);
        } else {
            missing_tokens.push(token);
        }
    }
    RenderedTemplate {
        text,
        missing_tokens,
    }
}

/// Outcome of [`template_experiments`].
#[derive(Debug, Clone)]
pub struct TemplateOutput {
    /// Experiments present in the generated code, in order.
    pub relocated: Vec<ExperimentDescriptor>,
    pub failures: Vec<RelocationError>,
    pub missing_tokens: Vec<&'static str>,
    pub duplicate_tags: Vec<String>,
    pub output_path: PathBuf,
}

/// Relocates the selected experiments and writes the rendered load template.
///
/// When several selected modules share a tag only the first is copied; in
/// strict mode the collision is an error raised before anything is copied.
///
/// `template_file` defaults to the skeleton's `static/js/load_experiments.js`
/// under `battery_repo`. The output keeps the template's file name under
/// `<battery_dest>/static/js/`.
pub fn template_experiments(
    battery_dest: &Path,
    battery_repo: &Path,
    selected: &[ExperimentDescriptor],
    template_file: Option<&Path>,
    policy: GeneratorPolicy,
) -> Result<TemplateOutput, BatteryError> {
    let template_path = template_file
        .map(Path::to_path_buf)
        .unwrap_or_else(|| battery_repo.join(LOAD_TEMPLATE_PATH));
    let template = read_text(&template_path).map_err(|err| {
        BatteryError::Template(
            ErrorInfo::new("battery_gen.read_template", err.info().message.clone())
                .with_path(&template_path),
        )
    })?;
    let file_name = template_path.file_name().ok_or_else(|| {
        BatteryError::Template(
            ErrorInfo::new("battery_gen.template_name", "template path has no file name")
                .with_path(&template_path),
        )
    })?;
    let output_path = battery_dest.join("static/js").join(file_name);

    let duplicates = duplicate_tags(selected);
    if !duplicates.is_empty() {
        if policy.strict {
            return Err(BatteryError::Template(
                ErrorInfo::new("battery_gen.duplicate_tags", "duplicate experiment tags")
                    .with_context("tags", duplicates.join(",")),
            ));
        }
        tracing::warn!(
            tags = ?duplicates,
            "duplicate experiment tags, keeping the first module for each"
        );
    }
    let unique = first_per_tag(selected);

    let report = relocate(&unique, battery_dest);
    let relocated = report.relocated();
    let failures: Vec<RelocationError> = report.failures().into_iter().cloned().collect();

    let fragments = Fragments::build(&relocated)?;
    let rendered = render_load_template(&template, &fragments);
    if !rendered.missing_tokens.is_empty() {
        if policy.strict {
            return Err(BatteryError::Template(
                ErrorInfo::new("battery_gen.missing_tokens", "load template lacks placeholders")
                    .with_context("tokens", rendered.missing_tokens.join(","))
                    .with_path(&template_path),
            ));
        }
        tracing::warn!(
            tokens = ?rendered.missing_tokens,
            template = %template_path.display(),
            "placeholder tokens not found, fragments left out"
        );
    }

    write_text(&output_path, &rendered.text).map_err(|err| {
        BatteryError::Template(
            ErrorInfo::new("battery_gen.write_template", err.info().message.clone())
                .with_path(&output_path),
        )
    })?;

    Ok(TemplateOutput {
        relocated,
        failures,
        missing_tokens: rendered.missing_tokens,
        duplicate_tags: duplicates,
        output_path,
    })
}
