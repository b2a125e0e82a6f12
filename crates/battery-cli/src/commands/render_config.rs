use std::error::Error;
use std::path::PathBuf;

use battery_core::fsio::read_text;
use battery_gen::{render_config, DEFAULT_CONFIG_TEMPLATE};
use clap::Args;

use super::parse_fields;

#[derive(Args, Debug)]
pub struct RenderConfigArgs {
    /// Config template; the bundled one when omitted.
    #[arg(long)]
    pub template: Option<PathBuf>,
    /// Config override, repeatable.
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,
}

pub fn run(args: &RenderConfigArgs) -> Result<(), Box<dyn Error>> {
    let template = match &args.template {
        Some(path) => read_text(path)?,
        None => DEFAULT_CONFIG_TEMPLATE.to_string(),
    };
    let fields = parse_fields(&args.fields)?;
    print!("{}", render_config(&template, &fields)?);
    Ok(())
}
