//! CLI command definitions and dispatch.

pub mod env;
pub mod plan;
pub mod resolve;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use stackwire_common::config::StackwireConfig;
use stackwire_common::constants;
use stackwire_common::types::Stage;
use stackwire_descriptor::{Descriptor, Resolution, Secrets};

/// stackwire: stage-scoped deployment descriptor resolver.
#[derive(Parser, Debug)]
#[command(name = "stackwire", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Stage to resolve for. Falls back to the descriptor's stage, then the
    /// configured default.
    #[arg(long, short, global = true, env = constants::STAGE_ENV_VAR)]
    pub stage: Option<String>,

    /// Path to a JSON configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check a descriptor for schema and reference errors.
    Validate(validate::ValidateArgs),
    /// Show the materialization plan for a stage.
    Plan(plan::PlanArgs),
    /// Resolve a descriptor and print its output manifest.
    Resolve(resolve::ResolveArgs),
    /// Print a function's resolved environment as KEY=VALUE lines.
    Env(env::EnvArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug)]
pub struct Globals {
    /// Effective configuration.
    pub config: StackwireConfig,
    /// Stage named on the command line or in the environment.
    pub stage: Option<String>,
}

impl Globals {
    /// Returns the descriptor path: the given one, or the configured default.
    pub fn descriptor_path(&self, file: Option<PathBuf>) -> PathBuf {
        file.unwrap_or_else(|| self.config.descriptor.clone())
    }

    /// Picks the stage: command line or environment, then the descriptor's
    /// own stage, then the configured default.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen stage name is invalid.
    pub fn select_stage(&self, descriptor: &Descriptor) -> anyhow::Result<Stage> {
        if let Some(name) = &self.stage {
            return Ok(Stage::new(name.as_str())?);
        }
        if let Some(stage) = &descriptor.app.stage {
            return Ok(stage.clone());
        }
        Ok(Stage::new(self.config.default_stage.as_str())?)
    }

    /// Loads a descriptor, captures the secrets it names from the process
    /// environment, and resolves it.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or resolution fails.
    pub fn load_and_resolve(&self, path: &Path) -> anyhow::Result<(Descriptor, Resolution)> {
        let descriptor = stackwire_descriptor::load_descriptor_file(path)?;
        let stage = self.select_stage(&descriptor)?;
        let secrets = Secrets::from_process(descriptor.secret_names());
        tracing::info!(secrets = secrets.len(), "captured secrets from environment");
        let resolution = stackwire_descriptor::resolve(&descriptor, &stage, &secrets)
            .with_context(|| format!("failed to resolve {} for stage {stage}", path.display()))?;
        Ok((descriptor, resolution))
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<StackwireConfig> {
    match path {
        Some(path) => StackwireConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(StackwireConfig::default()),
    }
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let globals = Globals {
        config: load_config(cli.config.as_deref())?,
        stage: cli.stage,
    };

    match cli.command {
        Command::Validate(args) => validate::execute(args, &globals),
        Command::Plan(args) => plan::execute(args, &globals),
        Command::Resolve(args) => resolve::execute(args, &globals),
        Command::Env(args) => env::execute(args, &globals),
    }
}
