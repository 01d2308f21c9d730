//! `stackwire env` — Print a function's resolved environment.

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use stackwire_common::types::ResourceKind;
use stackwire_descriptor::Resolution;

use super::Globals;
use crate::output::render_env;

/// Arguments for the `env` command.
#[derive(Args, Debug)]
pub struct EnvArgs {
    /// Path to the .stk descriptor file.
    pub file: Option<PathBuf>,

    /// Function to print. May be omitted when the descriptor has only one.
    #[arg(long, short)]
    pub resource: Option<String>,
}

/// Executes the `env` command.
///
/// # Errors
///
/// Returns an error if resolution fails or the function cannot be chosen.
pub fn execute(args: EnvArgs, globals: &Globals) -> anyhow::Result<()> {
    let path = globals.descriptor_path(args.file);
    let (_, resolution) = globals.load_and_resolve(&path)?;
    let name = select_function(&resolution, args.resource.as_deref())?;

    if let Some(resource) = resolution.resource(&name) {
        print!("{}", render_env(&resource.environment));
    }
    Ok(())
}

fn select_function(resolution: &Resolution, requested: Option<&str>) -> anyhow::Result<String> {
    let functions: Vec<&str> = resolution
        .resources
        .iter()
        .filter(|r| r.kind == ResourceKind::Function)
        .map(|r| r.name.as_str())
        .collect();

    match requested {
        Some(name) if functions.contains(&name) => Ok(name.to_string()),
        Some(name) => match resolution.resource(name) {
            Some(r) => bail!("resource \"{name}\" is a {}, not a FUNCTION", r.kind),
            None => bail!("no resource named \"{name}\""),
        },
        None => match functions.as_slice() {
            [only] => Ok((*only).to_string()),
            [] => bail!("descriptor declares no FUNCTION resources"),
            many => bail!("pick a function with --resource: {}", many.join(", ")),
        },
    }
}
