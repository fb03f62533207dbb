//! # Swagger 1.2 Resource Listing
//!
//! Swagger 1.2 splits the document in two: a resource listing naming one
//! resource per top-level path segment, and one API declaration per
//! resource carrying that resource's operations and models.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use swagdoc_core::{Definition, Document, EndpointDescriptor, Info, Operation};

use crate::settings::SwaggerSettings;

/// Resource a path belongs to: its first segment, `""` for the root.
pub fn resource_of(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}

/// Entry of the resource listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub path: String,
}

/// The Swagger 1.2 entry document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListing {
    pub api_version: String,
    pub swagger_version: String,
    pub apis: Vec<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
}

impl ResourceListing {
    /// One resource per distinct first path segment, sorted.
    pub fn build(settings: &SwaggerSettings, endpoints: &[EndpointDescriptor]) -> Self {
        let resources: BTreeSet<&str> = endpoints
            .iter()
            .map(|endpoint| resource_of(&endpoint.path))
            .filter(|resource| !resource.is_empty())
            .collect();
        Self {
            api_version: settings.api_version().to_string(),
            swagger_version: settings.swagger_version.as_str().to_string(),
            apis: resources
                .into_iter()
                .map(|resource| ResourceRef {
                    path: format!("/{resource}"),
                })
                .collect(),
            info: settings.info.clone(),
        }
    }
}

/// Operations of one path in an API declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiEntry {
    pub path: String,
    pub operations: BTreeMap<String, Operation>,
}

/// Operations and models of one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDeclaration {
    pub api_version: String,
    pub swagger_version: String,
    pub base_path: String,
    pub resource_path: String,
    pub apis: Vec<ApiEntry>,
    pub models: BTreeMap<String, Definition>,
}

impl ApiDeclaration {
    /// Cut the declaration of `resource` out of a generated document.
    /// Returns `None` when no path belongs to the resource.
    pub fn from_document(settings: &SwaggerSettings, document: &Document, resource: &str) -> Option<Self> {
        let resource = resource.trim_matches('/');
        let apis: Vec<ApiEntry> = document
            .paths
            .iter()
            .filter(|(path, _)| resource_of(path) == resource)
            .map(|(path, operations)| ApiEntry {
                path: path.clone(),
                operations: operations.clone(),
            })
            .collect();
        if apis.is_empty() {
            return None;
        }
        Some(Self {
            api_version: settings.api_version().to_string(),
            swagger_version: settings.swagger_version.as_str().to_string(),
            base_path: settings.api_path.clone(),
            resource_path: format!("/{resource}"),
            apis,
            models: document.definitions.clone(),
        })
    }
}
