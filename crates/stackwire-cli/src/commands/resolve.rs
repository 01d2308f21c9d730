//! `stackwire resolve` — Print the output manifest for a stage.

use std::path::PathBuf;

use clap::Args;
use stackwire_common::config::OutputFormat;

use super::Globals;
use crate::output::{render_manifest, render_resolution};

/// Arguments for the `resolve` command.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Path to the .stk descriptor file.
    pub file: Option<PathBuf>,

    /// Output format: text, json, or yaml.
    #[arg(long, short)]
    pub format: Option<OutputFormat>,

    /// Print every materialized resource, not just the manifest.
    #[arg(long)]
    pub full: bool,
}

/// Executes the `resolve` command.
///
/// # Errors
///
/// Returns an error if loading, resolution, or rendering fails.
pub fn execute(args: ResolveArgs, globals: &Globals) -> anyhow::Result<()> {
    let path = globals.descriptor_path(args.file);
    let (_, resolution) = globals.load_and_resolve(&path)?;
    let format = args.format.unwrap_or(globals.config.output_format);

    let rendered = if args.full {
        render_resolution(&resolution, format)?
    } else {
        render_manifest(resolution.manifest(), format)?
    };
    print!("{rendered}");
    Ok(())
}
