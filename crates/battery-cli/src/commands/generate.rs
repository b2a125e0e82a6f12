use std::error::Error;
use std::path::PathBuf;

use battery_gen::{generate, BatteryPlan, ConfigScalar, GenerateOutcome, GitSources, SourcesPlan};
use clap::Args;

use super::parse_fields;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Output folder for the battery; must not exist.
    #[arg(long = "dest")]
    pub destination: Option<PathBuf>,
    /// YAML battery plan supplying defaults for every other flag.
    #[arg(long)]
    pub plan: Option<PathBuf>,
    /// Battery skeleton repository.
    #[arg(long)]
    pub battery_repo: Option<PathBuf>,
    /// Experiment repository to scan.
    #[arg(long)]
    pub experiment_repo: Option<PathBuf>,
    /// Experiments to include (directory names); all when omitted.
    #[arg(long = "experiment", value_name = "TAG", value_delimiter = ',')]
    pub experiments: Vec<String>,
    /// Config override, repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
    /// Skip writing config.txt.
    #[arg(long)]
    pub no_config: bool,
    /// Load template to use instead of the skeleton's.
    #[arg(long)]
    pub template_file: Option<PathBuf>,
    /// Config template to use instead of the bundled one.
    #[arg(long)]
    pub config_template: Option<PathBuf>,
    /// Directory holding previously fetched `battery/` and `experiments/`.
    #[arg(long, conflicts_with_all = ["battery_url", "experiments_url"])]
    pub sources: Option<PathBuf>,
    /// Git URL of the battery skeleton used when --battery-repo is omitted.
    #[arg(long, requires = "experiments_url")]
    pub battery_url: Option<String>,
    /// Git URL of the experiment repository used when --experiment-repo is omitted.
    #[arg(long, requires = "battery_url")]
    pub experiments_url: Option<String>,
    /// Fail on duplicate tags or missing template placeholders.
    #[arg(long)]
    pub strict: bool,
    /// Print the generation report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let plan = build_plan(args)?;
    tracing::debug!(?plan, "battery plan");
    let request = plan.to_request()?;
    let resolver = plan.resolver();
    match generate(&request, resolver.as_ref())? {
        GenerateOutcome::Aborted { destination } => {
            println!(
                "Folder exists at {}, cannot generate.",
                destination.display()
            );
        }
        GenerateOutcome::Done(report) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "battery written to {} ({} experiments)",
                    report.destination.display(),
                    report.relocated.len()
                );
                for failure in &report.failures {
                    let info = failure.error.info();
                    match info.path() {
                        Some(path) => {
                            println!("skipped {} ({path}): {}", failure.tag, info.message)
                        }
                        None => println!("skipped {}: {}", failure.tag, info.message),
                    }
                }
                for tag in &report.duplicate_tags {
                    println!("duplicate tag {tag}: kept the first module only");
                }
            }
        }
    }
    Ok(())
}

/// Merges command line flags over the optional plan file.
pub fn build_plan(args: &GenerateArgs) -> Result<BatteryPlan, Box<dyn Error>> {
    let mut plan = match &args.plan {
        Some(path) => BatteryPlan::load(path)?,
        None => BatteryPlan::default(),
    };
    if let Some(destination) = &args.destination {
        plan.destination = Some(destination.clone());
    }
    if let Some(repo) = &args.battery_repo {
        plan.battery_repo = Some(repo.clone());
    }
    if let Some(repo) = &args.experiment_repo {
        plan.experiment_repo = Some(repo.clone());
    }
    if !args.experiments.is_empty() {
        plan.experiments = Some(args.experiments.clone());
    }
    for (key, value) in parse_fields(&args.fields)? {
        plan.config.insert(key, ConfigScalar::Text(value));
    }
    if args.no_config {
        plan.make_config = false;
    }
    if let Some(path) = &args.template_file {
        plan.template_file = Some(path.clone());
    }
    if let Some(path) = &args.config_template {
        plan.config_template = Some(path.clone());
    }
    if let Some(root) = &args.sources {
        plan.sources = Some(SourcesPlan {
            local: Some(root.clone()),
            git: None,
        });
    }
    if let (Some(battery), Some(experiments)) = (&args.battery_url, &args.experiments_url) {
        plan.sources = Some(SourcesPlan {
            local: None,
            git: Some(GitSources {
                battery: battery.clone(),
                experiments: experiments.clone(),
            }),
        });
    }
    if args.strict {
        plan.strict = true;
    }
    Ok(plan)
}
