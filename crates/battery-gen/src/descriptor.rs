use std::path::{Path, PathBuf};

use battery_core::errors::{BatteryError, ErrorInfo};
use battery_core::fsio::read_text;
use serde::{Deserialize, Serialize};

/// Name of the per-module metadata file.
pub const METADATA_FILE: &str = "psiturk.json";

/// Parsed metadata of one experiment module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentDescriptor {
    /// Module identifier, directory name and JavaScript variable prefix.
    pub tag: String,
    /// Script and style assets, loaded in this order.
    pub run: Vec<String>,
    /// Estimated duration, embedded verbatim in the timing literal.
    pub time: serde_json::Number,
    /// Directory the descriptor was loaded from.
    #[serde(skip)]
    pub source_dir: PathBuf,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MetadataFile {
    Single(ExperimentDescriptor),
    List(Vec<ExperimentDescriptor>),
}

impl ExperimentDescriptor {
    /// Base name of the module directory, falling back to the tag.
    pub fn dir_name(&self) -> &str {
        self.source_dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.tag)
    }

    /// Name of the JavaScript variable the module defines.
    pub fn variable_name(&self) -> String {
        format!("{}_experiment", self.tag)
    }

    /// Checks that the tag is usable as a path segment and a variable prefix.
    pub fn validate(&self) -> Result<(), BatteryError> {
        if self.tag.trim().is_empty() {
            return Err(BatteryError::Descriptor(
                ErrorInfo::new("battery_gen.descriptor_tag", "experiment metadata missing tag")
                    .with_path(&self.source_dir),
            ));
        }
        if !self
            .tag
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
        {
            return Err(BatteryError::Descriptor(
                ErrorInfo::new(
                    "battery_gen.descriptor_tag",
                    "tag must contain only ASCII letters, digits, '_' or '-'",
                )
                .with_context("tag", self.tag.clone())
                .with_path(&self.source_dir),
            ));
        }
        Ok(())
    }
}

/// Loads the descriptor of the module rooted at `dir`.
pub fn load_descriptor(dir: &Path) -> Result<ExperimentDescriptor, BatteryError> {
    let path = dir.join(METADATA_FILE);
    let contents = read_text(&path).map_err(|err| {
        BatteryError::Descriptor(
            ErrorInfo::new(
                "battery_gen.read_descriptor",
                format!("failed to read metadata: {}", err.info().message),
            )
            .with_path(&path),
        )
    })?;
    let mut descriptor = parse_descriptor(&contents).map_err(|info| {
        BatteryError::Descriptor(info.with_path(&path))
    })?;
    descriptor.source_dir = dir.to_path_buf();
    Ok(descriptor)
}

fn parse_descriptor(contents: &str) -> Result<ExperimentDescriptor, ErrorInfo> {
    let parsed: MetadataFile = serde_json::from_str(contents)
        .map_err(|err| ErrorInfo::new("battery_gen.parse_descriptor", err.to_string()))?;
    match parsed {
        MetadataFile::Single(descriptor) => Ok(descriptor),
        MetadataFile::List(list) => list.into_iter().next().ok_or_else(|| {
            ErrorInfo::new("battery_gen.parse_descriptor", "metadata list is empty")
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_and_list_forms() {
        let object = r#"{"tag": "simple_rt", "run": ["a.js"], "time": 3.5}"#;
        let list = r#"[{"tag": "simple_rt", "run": ["a.js"], "time": 3.5, "notes": "x"}]"#;
        assert_eq!(
            parse_descriptor(object).expect("object"),
            parse_descriptor(list).expect("list")
        );
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = parse_descriptor("[]").expect_err("empty");
        assert_eq!(err.code, "battery_gen.parse_descriptor");
    }

    #[test]
    fn time_keeps_integer_form() {
        let parsed = parse_descriptor(r#"{"tag": "t", "run": [], "time": 4}"#).expect("parse");
        assert_eq!(parsed.time.to_string(), "4");
    }
}
