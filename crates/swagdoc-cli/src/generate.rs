//! # Document Generation
//!
//! `swagdoc generate <manifest>` builds documentation from a YAML manifest.
//!
//! ```bash
//! # Swagger document on stdout:
//! swagdoc generate api.yaml --pretty
//!
//! # Swagger 1.2 resource listing, then one API declaration:
//! swagdoc generate api.yaml --listing
//! swagdoc generate api.yaml --resource widgets -o widgets.json
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use swagdoc_core::Principal;
use swagdoc_gen::{ApiDeclaration, DocumentGenerator, ResourceListing, SwaggerSettings};
use swagdoc_manifest::ManifestIntrospection;

use crate::load_settings;

/// `generate` arguments.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Manifest declaring schema objects, handlers and endpoints.
    pub manifest: PathBuf,

    /// Settings file (YAML or JSON). Defaults apply when omitted.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Write the output to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Emit the Swagger 1.2 resource listing.
    #[arg(long, conflicts_with = "resource")]
    pub listing: bool,

    /// Emit the Swagger 1.2 API declaration of one resource.
    #[arg(long)]
    pub resource: Option<String>,

    /// Generate as this authenticated caller instead of the anonymous one.
    #[arg(long)]
    pub user: Option<String>,
}

/// Execute the generate subcommand.
pub fn run_generate(args: &GenerateArgs) -> Result<u8> {
    let settings = Arc::new(load_settings(args.settings.as_deref())?);
    let layer = ManifestIntrospection::from_path(&args.manifest)
        .with_context(|| format!("loading manifest {}", args.manifest.display()))?;
    let endpoints = layer.endpoints();

    let json = if args.listing {
        render(&ResourceListing::build(&settings, &endpoints), args.pretty)?
    } else {
        let principal = args.user.as_deref().map(Principal::authenticated);
        let document = DocumentGenerator::new(&layer, Arc::clone(&settings))
            .for_principal(principal)
            .generate(&endpoints);
        match &args.resource {
            Some(resource) => {
                let declaration = ApiDeclaration::from_document(&settings, &document, resource)
                    .with_context(|| format!("no documented resource '{resource}'"))?;
                render(&declaration, args.pretty)?
            }
            None => render(&document, args.pretty)?,
        }
    };

    write_output(args.output.as_deref(), &json)?;
    Ok(0)
}

/// Generate the document of a manifest text with the given settings.
pub fn document_json(manifest: &str, settings: SwaggerSettings) -> Result<serde_json::Value> {
    let layer = ManifestIntrospection::from_yaml_str(manifest)?;
    let endpoints = layer.endpoints();
    let document = DocumentGenerator::new(&layer, Arc::new(settings)).generate(&endpoints);
    Ok(serde_json::to_value(document)?)
}

fn render<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn write_output(path: Option<&Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = json.len(), "document written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
