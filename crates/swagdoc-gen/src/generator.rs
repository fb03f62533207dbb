//! # Document Assembler
//!
//! Top-level orchestration of one generation pass:
//!
//! ```text
//! endpoints ──► ViewIntrospector ──► compile_operation ──► paths
//!                                          │
//!                                          ▼
//!                                   GenerationScope ──► SchemaRegistry ──► definitions
//! ```
//!
//! A pass is a pure function of the endpoint list, the principal, and the
//! settings snapshot it was started with. All accumulated state lives in
//! the pass's own [`GenerationScope`].

use std::collections::BTreeMap;
use std::sync::Arc;

use swagdoc_core::{
    Definition, Document, EndpointDescriptor, Introspection, Operation, Paths, Principal,
};
use swagdoc_schema::{RegistryOptions, SchemaRegistry};

use crate::operation::{compile_operation, GenerationScope};
use crate::settings::SwaggerSettings;
use crate::view::ViewIntrospector;

/// Generates documents against one introspection layer.
pub struct DocumentGenerator<'a, I: Introspection + ?Sized> {
    introspection: &'a I,
    settings: Arc<SwaggerSettings>,
    principal: Principal,
    registry_options: RegistryOptions,
}

impl<'a, I: Introspection + ?Sized> DocumentGenerator<'a, I> {
    /// A generator for the unauthenticated principal of `settings`.
    pub fn new(introspection: &'a I, settings: Arc<SwaggerSettings>) -> Self {
        let principal = Principal::anonymous(settings.unauthenticated_user.clone());
        Self {
            introspection,
            settings,
            principal,
            registry_options: RegistryOptions::default(),
        }
    }

    /// Generate for a specific caller; `None` keeps the unauthenticated
    /// principal.
    pub fn for_principal(mut self, principal: Option<Principal>) -> Self {
        if let Some(principal) = principal {
            self.principal = principal;
        }
        self
    }

    pub fn with_registry_options(mut self, options: RegistryOptions) -> Self {
        self.registry_options = options;
        self
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn settings(&self) -> &SwaggerSettings {
        &self.settings
    }

    /// Operations of one endpoint, keyed by lower-cased method. `all` is
    /// the full endpoint list, which viewsets consult for sibling routes.
    pub fn operations(
        &self,
        endpoint: &EndpointDescriptor,
        all: &[EndpointDescriptor],
        scope: &mut GenerationScope,
    ) -> BTreeMap<String, Operation> {
        let view = match ViewIntrospector::resolve(self.introspection, endpoint, all) {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(path = %endpoint.path, "skipping endpoint: {e}");
                return BTreeMap::new();
            }
        };
        view.method_introspectors(self.introspection, &self.principal)
            .iter()
            .filter_map(|method| compile_operation(method.as_ref(), scope))
            .collect()
    }

    /// Compile every endpoint. Endpoints sharing a path merge their
    /// operations; a later endpoint wins for the same method.
    pub fn paths(&self, endpoints: &[EndpointDescriptor], scope: &mut GenerationScope) -> Paths {
        let mut paths = Paths::new();
        for endpoint in endpoints {
            let operations = self.operations(endpoint, endpoints, scope);
            paths.entry(endpoint.path.clone()).or_default().extend(operations);
        }
        paths
    }

    /// Build the `definitions` map from what a pass collected.
    pub fn definitions(&self, scope: &GenerationScope) -> BTreeMap<String, Definition> {
        SchemaRegistry::with_options(self.introspection, self.registry_options)
            .definitions(&scope.schema_objects, &scope.explicit_models)
    }

    /// Generate the full document.
    pub fn generate(&self, endpoints: &[EndpointDescriptor]) -> Document {
        let mut scope = GenerationScope::new();
        let paths = self.paths(endpoints, &mut scope);
        let definitions = self.definitions(&scope);
        tracing::info!(
            principal = %self.principal.name,
            paths = paths.len(),
            definitions = definitions.len(),
            "document generated"
        );
        Document {
            swagger: self.settings.swagger_version.as_str().to_string(),
            info: self.settings.info.clone(),
            host: None,
            base_path: Some(self.settings.api_path.clone()),
            paths,
            definitions,
        }
    }
}
