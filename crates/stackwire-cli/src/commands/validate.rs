//! `stackwire validate` — Check a descriptor without capturing secrets.

use std::path::PathBuf;

use clap::Args;
use stackwire_descriptor::Secrets;

use super::Globals;

/// Arguments for the `validate` command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the .stk descriptor file.
    pub file: Option<PathBuf>,
}

/// Executes the `validate` command.
///
/// Loads the descriptor and resolves it for the selected stage with no
/// secrets, so schema, reference and cycle errors all surface.
///
/// # Errors
///
/// Returns an error if loading or resolution fails.
pub fn execute(args: ValidateArgs, globals: &Globals) -> anyhow::Result<()> {
    let path = globals.descriptor_path(args.file);
    let descriptor = stackwire_descriptor::load_descriptor_file(&path)?;
    let stage = globals.select_stage(&descriptor)?;
    let resolution = stackwire_descriptor::resolve(&descriptor, &stage, &Secrets::new())?;

    println!(
        "{}: ok ({} resource(s), {} output(s), {} secret(s) referenced)",
        path.display(),
        resolution.resources.len(),
        resolution.outputs.len(),
        descriptor.secret_names().len()
    );
    Ok(())
}
