//! # Documentation Server
//!
//! `swagdoc serve <manifest>` serves the documentation routes of
//! `swagdoc-api` for one manifest.
//!
//! Callers are identified through an optional credentials file mapping
//! tokens to principals:
//!
//! ```yaml
//! s3cret: {name: alice, authenticated: true, superuser: false}
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use swagdoc_api::AppState;
use swagdoc_core::Principal;
use swagdoc_gen::{AccessHooks, SettingsStore};
use swagdoc_manifest::ManifestIntrospection;

use crate::load_settings;

/// `serve` arguments.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Manifest declaring schema objects, handlers and endpoints.
    pub manifest: PathBuf,

    /// Settings file (YAML or JSON). Defaults apply when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Token → principal table (YAML).
    #[arg(long)]
    pub credentials: Option<PathBuf>,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8000")]
    pub addr: SocketAddr,
}

/// Load the token table.
pub fn load_credentials(path: &Path) -> Result<HashMap<String, Principal>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading credentials {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing credentials {}", path.display()))
}

/// Assemble the application state of a `serve` invocation.
pub fn build_state(args: &ServeArgs) -> Result<AppState> {
    let settings = load_settings(args.settings.as_deref())?;
    let hooks = AccessHooks::new();
    hooks
        .check_bindings(&settings)
        .context("settings name hooks this binary does not provide")?;
    let layer = ManifestIntrospection::from_path(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest.display()))?;
    let endpoints = layer.endpoints();

    let mut state = AppState::new(
        Arc::new(SettingsStore::new(settings)?),
        Arc::new(layer),
        endpoints,
    )
    .with_hooks(hooks);
    if let Some(path) = &args.credentials {
        state = state.with_credentials(load_credentials(path)?);
    }
    Ok(state)
}

/// Execute the serve subcommand.
pub fn run_serve(args: &ServeArgs) -> Result<u8> {
    let state = build_state(args)?;
    tracing::info!(endpoints = state.endpoints.len(), "manifest loaded");
    let runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;
    runtime
        .block_on(swagdoc_api::serve(state, args.addr))
        .with_context(|| format!("serving on {}", args.addr))?;
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    fn serve_args(manifest: &Path) -> ServeArgs {
        ServeArgs {
            manifest: manifest.to_path_buf(),
            settings: None,
            credentials: None,
            addr: "127.0.0.1:0".parse().unwrap(),
        }
    }

    #[test]
    fn credentials_file_maps_tokens() {
        let file = write("s3cret: {name: alice, authenticated: true, superuser: true}\n");
        let credentials = load_credentials(file.path()).unwrap();
        assert_eq!(credentials["s3cret"], Principal::superuser("alice"));
    }

    #[test]
    fn state_from_manifest_and_credentials() {
        let manifest = write("handlers:\n  - {name: ping, kind: function_view}\nendpoints:\n  - {path: /ping, handler: ping}\n");
        let credentials = write("t: {name: bob, authenticated: true, superuser: false}\n");
        let args = ServeArgs {
            credentials: Some(credentials.path().to_path_buf()),
            ..serve_args(manifest.path())
        };
        let state = build_state(&args).unwrap();
        assert_eq!(state.endpoints.len(), 1);
        assert!(state.credentials.contains_key("t"));
    }

    #[test]
    fn unbound_hook_is_rejected() {
        let manifest = write("{}\n");
        let settings = write("permission_denied_handler: redirect_to_login\n");
        let args = ServeArgs {
            settings: Some(settings.path().to_path_buf()),
            ..serve_args(manifest.path())
        };
        let err = build_state(&args).unwrap_err();
        assert!(format!("{err:#}").contains("redirect_to_login"));
    }
}
