use std::error::Error;
use std::path::PathBuf;

use battery_gen::ExperimentCatalog;
use clap::Args;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Experiment repository to scan.
    #[arg(long, default_value = "experiments")]
    pub repo: PathBuf,
    /// Emit JSON instead of one line per experiment.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ListedExperiment<'a> {
    tag: &'a str,
    time: &'a serde_json::Number,
    run: &'a [String],
}

pub fn run(args: &ListArgs) -> Result<(), Box<dyn Error>> {
    let catalog = ExperimentCatalog::scan(&args.repo)?;
    if args.json {
        let listed: Vec<_> = catalog
            .experiments()
            .iter()
            .map(|exp| ListedExperiment {
                tag: &exp.tag,
                time: &exp.time,
                run: &exp.run,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }
    for exp in catalog.experiments() {
        println!("{} {} {}", exp.tag, exp.time, exp.run.len());
    }
    Ok(())
}
