//! # Settings Check
//!
//! `swagdoc check-settings <path>` loads a settings file, applies the
//! load-time validation and prints a one-line summary.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::load_settings;

/// `check-settings` arguments.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Settings file (YAML or JSON).
    pub path: PathBuf,
}

/// Execute the settings check.
pub fn run_check(args: &CheckArgs) -> Result<u8> {
    let settings = load_settings(Some(&args.path))?;
    println!(
        "{}: ok (swagger {}, api path {}, api version '{}')",
        args.path.display(),
        settings.swagger_version,
        settings.api_path,
        settings.api_version()
    );
    Ok(0)
}
