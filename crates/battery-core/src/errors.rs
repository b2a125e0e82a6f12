//! Structured error types shared across battery crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Context key under which [`ErrorInfo::with_path`] records a path.
pub const PATH_KEY: &str = "path";

/// Code, message and context carried by every [`BatteryError`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Dotted code such as `battery_gen.relocate_copy`; stable across releases.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Tags, paths and line numbers involved, keyed by name.
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// What the user can do about it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Records `value` under `key`, replacing an earlier value.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Records the file or directory the error is about.
    pub fn with_path(self, path: &Path) -> Self {
        let shown = path.display().to_string();
        self.with_context(PATH_KEY, shown)
    }

    /// Attaches a remediation hint.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        Self {
            hint: Some(hint.into()),
            ..self
        }
    }

    /// The recorded path, if any.
    pub fn path(&self) -> Option<&str> {
        self.context.get(PATH_KEY).map(String::as_str)
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        let pairs: Vec<String> = self
            .context
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        if !pairs.is_empty() {
            write!(f, " ({})", pairs.join("; "))?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Canonical error type for battery generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BatteryError {
    /// Experiment metadata could not be read or parsed.
    #[error("descriptor error: {0}")]
    Descriptor(ErrorInfo),
    /// The experiment repository could not be scanned.
    #[error("catalog error: {0}")]
    Catalog(ErrorInfo),
    /// An experiment tree could not be copied into the battery.
    #[error("relocation error: {0}")]
    Relocation(ErrorInfo),
    /// The load template could not be read, rendered or written.
    #[error("template error: {0}")]
    Template(ErrorInfo),
    /// The config template is malformed or could not be written.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Default sources could not be resolved.
    #[error("source error: {0}")]
    Source(ErrorInfo),
    /// Generic filesystem failure.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl BatteryError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BatteryError::Descriptor(info)
            | BatteryError::Catalog(info)
            | BatteryError::Relocation(info)
            | BatteryError::Template(info)
            | BatteryError::Config(info)
            | BatteryError::Source(info)
            | BatteryError::Io(info) => info,
        }
    }

    /// Shorthand for the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }
}
