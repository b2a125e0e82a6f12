//! Experiment battery generation.
//!
//! A battery is a skeleton runner project plus a set of experiment modules.
//! [`generate`] copies the skeleton, discovers the modules of an experiment
//! repository, copies the selected ones into `static/experiments/<tag>`,
//! renders the load template's dispatch code and writes `config.txt`.

pub mod catalog;
pub mod codegen;
pub mod config;
pub mod descriptor;
pub mod generate;
pub mod plan;
pub mod relocate;
pub mod select;
pub mod source;

pub use battery_core::errors::{BatteryError, ErrorInfo};
pub use catalog::ExperimentCatalog;
pub use codegen::{
    concat_fragment, load_fragment, render_load_template, template_experiments, timing_fragment,
    Fragments, GeneratorPolicy, RenderedTemplate, TemplateOutput, CONCAT_TOKEN, LOAD_TOKEN,
    TIMES_TOKEN,
};
pub use config::{
    generate_config, render_config, ConfigDocument, ConfigLine, DEFAULT_CONFIG_TEMPLATE,
};
pub use descriptor::{load_descriptor, ExperimentDescriptor, METADATA_FILE};
pub use generate::{generate, BatteryReport, GenerateOutcome, GenerateRequest};
pub use plan::{BatteryPlan, ConfigScalar, GitSources, SourcesPlan};
pub use relocate::{relocate, RelocatedExperiment, RelocationError, RelocationReport};
pub use select::select;
pub use source::{
    GitSourceResolver, LocalSourceResolver, NoSourceResolver, ResolvedSources, SourceResolver,
};
