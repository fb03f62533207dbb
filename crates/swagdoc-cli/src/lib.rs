//! # swagdoc-cli — Command-Line Interface
//!
//! ## Subcommands
//!
//! - `generate`: Build a document from a YAML manifest and print or save it
//! - `check-settings`: Load and validate a settings file
//! - `serve`: Serve the documentation of a manifest over HTTP
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; each subcommand module exposes an
//!   `Args` struct and a `run_*` function returning the process exit code.
//! - Handler functions delegate to the library crates.

pub mod check;
pub mod generate;
pub mod serve;

use std::path::Path;

use anyhow::{Context, Result};
use swagdoc_gen::SwaggerSettings;

/// Load settings from `path`, or the defaults when no path is given.
pub fn load_settings(path: Option<&Path>) -> Result<SwaggerSettings> {
    match path {
        Some(path) => SwaggerSettings::from_path(path)
            .with_context(|| format!("loading settings from {}", path.display())),
        None => Ok(SwaggerSettings::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let settings = load_settings(None).unwrap();
        assert_eq!(settings.api_path, "/");
    }

    #[test]
    fn settings_error_names_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"swagger_version: '3.0'\n").unwrap();
        let err = load_settings(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    }
}
