use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    generate::{self, GenerateArgs},
    list::{self, ListArgs},
    render_config::{self, RenderConfigArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "battery", about = "Experiment battery generator")]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a battery from a skeleton and an experiment repository.
    Generate(GenerateArgs),
    /// List the valid experiments found in an experiment repository.
    List(ListArgs),
    /// Print a rendered config.txt without generating a battery.
    RenderConfig(RenderConfigArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Command::Generate(args) => generate::run(&args),
        Command::List(args) => list::run(&args),
        Command::RenderConfig(args) => render_config::run(&args),
        Command::Version(args) => version::run(&args),
    }
}
