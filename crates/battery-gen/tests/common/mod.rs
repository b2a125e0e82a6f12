#![allow(dead_code)]

use std::path::{Path, PathBuf};

use battery_core::fsio::write_text;
use battery_gen::{ExperimentDescriptor, CONCAT_TOKEN, LOAD_TOKEN, TIMES_TOKEN};
use tempfile::TempDir;

pub const LOAD_TEMPLATE: &str = "\
function loadExperiments(name) {
  switch (name) {[SUB_EXPERIMENTLOAD_SUB]  }
}
function concatExperiments(name) {
  switch (name) {[SUB_EXPERIMENTCONCAT_SUB]  }
}
var experiment_times = [SUB_EXPERIMENTTIMES_SUB];
";

/// Temporary workspace holding a skeleton battery and an experiment repository.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().expect("tempdir"),
        };
        write_text(
            &fixture.battery_repo().join("static/js/load_experiments.js"),
            LOAD_TEMPLATE,
        )
        .expect("template");
        write_text(&fixture.battery_repo().join("index.html"), "<html></html>").expect("index");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn battery_repo(&self) -> PathBuf {
        self.root().join("battery")
    }

    pub fn experiment_repo(&self) -> PathBuf {
        self.root().join("experiments")
    }

    pub fn destination(&self) -> PathBuf {
        self.root().join("out")
    }

    /// Adds a module whose metadata is `{"tag": dir, "run": run, "time": time}`.
    pub fn add_experiment(&self, dir: &str, run: &[&str], time: &str) -> PathBuf {
        self.add_experiment_tagged(dir, dir, run, time)
    }

    /// Adds a module in `dir` whose metadata declares `tag`.
    pub fn add_experiment_tagged(&self, dir: &str, tag: &str, run: &[&str], time: &str) -> PathBuf {
        let module = self.experiment_repo().join(dir);
        let run_json = run
            .iter()
            .map(|asset| format!("\"{asset}\""))
            .collect::<Vec<_>>()
            .join(", ");
        write_text(
            &module.join("psiturk.json"),
            &format!("[{{\"tag\": \"{tag}\", \"run\": [{run_json}], \"time\": {time}}}]"),
        )
        .expect("metadata");
        for asset in run.iter().filter(|asset| !asset.contains('/')) {
            write_text(&module.join(asset), "// asset").expect("asset");
        }
        module
    }
}

pub fn descriptor(tag: &str, run: &[&str], time: f64) -> ExperimentDescriptor {
    ExperimentDescriptor {
        tag: tag.to_string(),
        run: run.iter().map(|s| s.to_string()).collect(),
        time: serde_json::Number::from_f64(time).expect("finite"),
        source_dir: PathBuf::from("experiments").join(tag),
    }
}

pub fn all_tokens() -> [&'static str; 3] {
    [LOAD_TOKEN, CONCAT_TOKEN, TIMES_TOKEN]
}
