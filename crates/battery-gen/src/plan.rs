use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use battery_core::errors::{BatteryError, ErrorInfo};
use battery_core::fsio::read_text;
use serde::{Deserialize, Serialize};

use crate::generate::GenerateRequest;
use crate::source::{GitSourceResolver, LocalSourceResolver, NoSourceResolver, SourceResolver};

/// YAML-configurable description of a battery to generate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryPlan {
    #[serde(default)]
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub battery_repo: Option<PathBuf>,
    #[serde(default)]
    pub experiment_repo: Option<PathBuf>,
    /// Experiment directory names to include; all when omitted.
    #[serde(default)]
    pub experiments: Option<Vec<String>>,
    /// Overrides for `config.txt` fields.
    #[serde(default)]
    pub config: BTreeMap<String, ConfigScalar>,
    #[serde(default = "default_make_config")]
    pub make_config: bool,
    #[serde(default)]
    pub template_file: Option<PathBuf>,
    #[serde(default)]
    pub config_template: Option<PathBuf>,
    /// Where default sources come from when a repository is omitted.
    #[serde(default)]
    pub sources: Option<SourcesPlan>,
    #[serde(default)]
    pub strict: bool,
}

fn default_make_config() -> bool {
    true
}

impl Default for BatteryPlan {
    fn default() -> Self {
        Self {
            destination: None,
            battery_repo: None,
            experiment_repo: None,
            experiments: None,
            config: BTreeMap::new(),
            make_config: true,
            template_file: None,
            config_template: None,
            sources: None,
            strict: false,
        }
    }
}

/// Scalar config value as written in YAML.
///
/// Numbers stay `serde_yaml::Number` so `1.0` is rendered as `1.0`, not `1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigScalar {
    Bool(bool),
    Number(serde_yaml::Number),
    Text(String),
}

impl fmt::Display for ConfigScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigScalar::Bool(value) => write!(f, "{value}"),
            ConfigScalar::Number(value) => write!(f, "{value}"),
            ConfigScalar::Text(value) => f.write_str(value),
        }
    }
}

/// Default source locations; `local` wins when both are set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourcesPlan {
    /// Directory containing `battery/` and `experiments/`.
    #[serde(default)]
    pub local: Option<PathBuf>,
    #[serde(default)]
    pub git: Option<GitSources>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitSources {
    pub battery: String,
    pub experiments: String,
}

impl BatteryPlan {
    pub fn load(path: &Path) -> Result<Self, BatteryError> {
        let contents = read_text(path)?;
        Self::from_yaml_str(&contents).map_err(|err| {
            let info = err.info().clone().with_path(path);
            BatteryError::Config(info)
        })
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, BatteryError> {
        serde_yaml::from_str(contents).map_err(|err| {
            BatteryError::Config(ErrorInfo::new("battery_gen.parse_plan", err.to_string()))
        })
    }

    /// Config overrides rendered as the strings written into `config.txt`.
    pub fn config_fields(&self) -> BTreeMap<String, String> {
        self.config
            .iter()
            .map(|(key, value)| (key.clone(), value.to_string()))
            .collect()
    }

    pub fn to_request(&self) -> Result<GenerateRequest, BatteryError> {
        let destination = self.destination.clone().ok_or_else(|| {
            BatteryError::Config(
                ErrorInfo::new("battery_gen.plan_destination", "plan has no destination")
                    .with_hint("set `destination` in the plan or pass it on the command line"),
            )
        })?;
        let mut request = GenerateRequest::new(destination)
            .make_config(self.make_config)
            .strict(self.strict);
        request.battery_repo = self.battery_repo.clone();
        request.experiment_repo = self.experiment_repo.clone();
        request.experiments = self.experiments.clone();
        request.template_file = self.template_file.clone();
        request.config_template = self.config_template.clone();
        if !self.config.is_empty() {
            request.config = Some(self.config_fields());
        }
        Ok(request)
    }

    pub fn resolver(&self) -> Box<dyn SourceResolver> {
        let Some(sources) = &self.sources else {
            return Box::new(NoSourceResolver);
        };
        match (&sources.local, &sources.git) {
            (Some(root), _) => Box::new(LocalSourceResolver::new(root)),
            (None, Some(git)) => {
                Box::new(GitSourceResolver::new(&git.battery, &git.experiments))
            }
            (None, None) => Box::new(NoSourceResolver),
        }
    }
}
