//! `stackwire plan` — Display the resources a stage would materialize.

use std::path::PathBuf;

use clap::Args;
use stackwire_descriptor::executor::{Executor, PlanExecutor};
use stackwire_descriptor::parser::ast::ResourceSpec;

use super::Globals;
use crate::output::{RULE, format_duration, format_megabytes};

/// Arguments for the `plan` command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Path to the .stk descriptor file.
    pub file: Option<PathBuf>,
}

/// Executes the `plan` command.
///
/// Resolves the descriptor, hands it to the dry-run executor, and prints
/// each resource in materialization order.
///
/// # Errors
///
/// Returns an error if loading, resolution, or planning fails.
pub fn execute(args: PlanArgs, globals: &Globals) -> anyhow::Result<()> {
    let path = globals.descriptor_path(args.file);
    let (_, resolution) = globals.load_and_resolve(&path)?;
    let statuses = PlanExecutor.provision(&resolution)?;

    println!(
        "Plan for: {} ({} on {} {})",
        resolution.app, resolution.stage, resolution.platform, resolution.region
    );
    println!("{RULE}");
    println!();

    for (status, resource) in statuses.iter().zip(&resolution.resources) {
        println!("  + {} [{}]", status.resource, status.kind);
        println!("      identity: {}", status.identity);
        match &resource.spec {
            ResourceSpec::Function(f) => {
                println!("      memory: {}", format_megabytes(f.memory_mb));
                println!("      timeout: {}", format_duration(f.timeout_secs));
                println!("      environment: {} variable(s)", resource.environment.len());
            }
            ResourceSpec::Router(_) => {
                for (route, target) in &resource.routes {
                    println!("      {route} -> {target}");
                }
            }
            ResourceSpec::Bucket(_) | ResourceSpec::Table(_) => {}
        }
        if !resource.links.is_empty() {
            println!("      link: {}", resource.links.join(", "));
        }
        if status.retained_on_removal {
            println!("      retained on removal");
        }
    }

    println!();
    println!("  {} resource(s) will be materialized.", statuses.len());

    if !resolution.outputs.is_empty() {
        println!();
        println!("  Outputs:");
        for (name, value) in resolution.outputs.iter() {
            println!("    {name} = {value}");
        }
    }

    Ok(())
}
