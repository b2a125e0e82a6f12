//! `config.txt` materialization from a line-oriented template.

use std::collections::BTreeMap;
use std::path::Path;

use battery_core::errors::{BatteryError, ErrorInfo};
use battery_core::fsio::write_text;

/// Config template bundled with the crate.
pub const DEFAULT_CONFIG_TEMPLATE: &str = include_str!("../templates/config.txt");

/// File name of the generated config inside the battery.
pub const CONFIG_FILE: &str = "config.txt";

/// One line of a config document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLine {
    /// `[section]` header, kept as written.
    Header(String),
    /// `key = value` assignment.
    Assignment { key: String, value: String },
    /// Blank or comment line, kept as written.
    Verbatim(String),
}

impl ConfigLine {
    fn render(&self) -> String {
        match self {
            ConfigLine::Header(text) | ConfigLine::Verbatim(text) => text.clone(),
            ConfigLine::Assignment { key, value } => format!("{key} = {value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    lines: Vec<ConfigLine>,
}

impl ConfigDocument {
    pub fn parse(text: &str) -> Result<Self, BatteryError> {
        let mut lines = Vec::new();
        for (idx, raw) in text.split('\n').enumerate() {
            let trimmed = raw.trim();
            let line = if raw.starts_with('[') {
                ConfigLine::Header(raw.to_string())
            } else if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                ConfigLine::Verbatim(raw.to_string())
            } else if let Some((key, value)) = raw.split_once('=') {
                ConfigLine::Assignment {
                    key: key.trim_matches(' ').to_string(),
                    value: value.trim_matches(' ').to_string(),
                }
            } else {
                return Err(BatteryError::Config(
                    ErrorInfo::new("battery_gen.config_line", "expected `key = value`")
                        .with_context("line", (idx + 1).to_string())
                        .with_context("text", raw.to_string()),
                ));
            };
            lines.push(line);
        }
        Ok(Self { lines })
    }

    pub fn lines(&self) -> &[ConfigLine] {
        &self.lines
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            ConfigLine::Assignment { key: k, value } if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    /// Replaces values for keys present in `fields`. Unknown keys are ignored.
    pub fn apply(&mut self, fields: &BTreeMap<String, String>) {
        for line in &mut self.lines {
            if let ConfigLine::Assignment { key, value } = line {
                if let Some(replacement) = fields.get(key.as_str()) {
                    *value = replacement.clone();
                }
            }
        }
        for key in fields.keys() {
            if self.get(key).is_none() {
                tracing::debug!(key = %key, "config field not in template, ignored");
            }
        }
    }

    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(ConfigLine::render)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders `template` with `fields` applied, without touching the filesystem.
pub fn render_config(
    template: &str,
    fields: &BTreeMap<String, String>,
) -> Result<String, BatteryError> {
    let mut document = ConfigDocument::parse(template)?;
    document.apply(fields);
    Ok(document.render())
}

/// Writes `<battery_dest>/config.txt` and returns its contents.
pub fn generate_config(
    battery_dest: &Path,
    template: &str,
    fields: &BTreeMap<String, String>,
) -> Result<String, BatteryError> {
    let rendered = render_config(template, fields)?;
    let path = battery_dest.join(CONFIG_FILE);
    write_text(&path, &rendered).map_err(|err| {
        BatteryError::Config(
            ErrorInfo::new("battery_gen.write_config", err.info().message.clone()).with_path(&path),
        )
    })?;
    Ok(rendered)
}
