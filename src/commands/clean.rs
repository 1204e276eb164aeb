//! Clean the output directory

use anyhow::Result;

use crate::output::OutputDir;
use crate::Mdpress;

/// Remove the output directory and any leftover staging directory
pub fn run(app: &Mdpress) -> Result<()> {
    OutputDir::new(&app.output_dir)?.clean()
}
