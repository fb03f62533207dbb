//! # Operation Compiler
//!
//! Compiles one HTTP method of one handler into an [`Operation`].
//!
//! Everything an operation needs comes from the method's introspector and
//! its documentation metadata. The compiler records what it learns about
//! models in a [`GenerationScope`]: schema objects to publish, and inline
//! custom response types registered as explicit models. The scope lives for
//! one generation pass and is discarded afterwards.

use std::collections::BTreeMap;

use swagdoc_core::naming::response_type_name;
use swagdoc_core::{
    is_options_probe, DeclaredSchema, Definition, ExplicitModel, MethodIntrospector, Operation,
    Reference, ResponseSchema, ResponseSpec,
};
use swagdoc_schema::{response_schema_object, SchemaSet};

/// Description of the synthetic response published when none are declared.
pub const DEFAULT_RESPONSE_DESCRIPTION: &str = "Default response";

/// Append the visible marker of a malformed metadata block.
pub fn parse_error_marker(description: &mut String, error: &str) {
    description.push_str(&format!("<pre>YAMLError:\n {error}</pre>"));
}

/// Per-pass accumulator of model sources.
#[derive(Debug, Clone, Default)]
pub struct GenerationScope {
    /// Schema objects referenced by compiled operations.
    pub schema_objects: SchemaSet,
    /// Custom response types declared inline, keyed by model name.
    pub explicit_models: BTreeMap<String, Definition>,
}

impl GenerationScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an inline response type under `name`. A later registration
    /// of the same name replaces the earlier one.
    pub fn register_response_type(
        &mut self,
        name: String,
        properties: serde_json::Map<String, serde_json::Value>,
    ) {
        tracing::debug!(model = %name, "registered custom response type");
        self.explicit_models.insert(
            name.clone(),
            Definition::Explicit(ExplicitModel { id: name, properties }),
        );
    }
}

/// Model name of a method's response: its custom response type (registered
/// in `scope` on the way), else its response schema object.
fn method_response_type(method: &dyn MethodIntrospector, scope: &mut GenerationScope) -> Option<String> {
    let parser = method.doc_parser();
    if let Some(properties) = parser.response_type() {
        let name = response_type_name(&method.handler().name, method.method_name());
        scope.register_response_type(name.clone(), properties.clone());
        return Some(name);
    }
    response_schema_object(method).map(|schema| schema.model_name().to_string())
}

/// Compile one method. Returns the lower-cased method key and the
/// operation, or `None` for the implicit `OPTIONS` probe.
pub fn compile_operation(
    method: &dyn MethodIntrospector,
    scope: &mut GenerationScope,
) -> Option<(String, Operation)> {
    let http_method = method.http_method();
    if is_options_probe(http_method) {
        return None;
    }

    let handler = method.handler();
    let parser = method.doc_parser();

    let mut description = method.notes();
    if let Some(error) = parser.parse_error() {
        tracing::warn!(
            handler = %handler.qualified_name(),
            method = %http_method,
            "malformed documentation metadata: {error}"
        );
        parse_error_marker(&mut description, error);
    }

    let declared = parser.responses(handler);
    let response_type = method_response_type(method, scope);
    scope.schema_objects.collect_method(method);

    let mut responses = BTreeMap::new();
    if declared.is_empty() {
        responses.insert(
            "default".to_string(),
            ResponseSpec {
                description: DEFAULT_RESPONSE_DESCRIPTION.to_string(),
                schema: response_type.map(|name| ResponseSchema::Ref(Reference::model(&name))),
                example: None,
            },
        );
    } else {
        for decl in declared {
            let schema = match decl.schema {
                Some(DeclaredSchema::Named(name)) => {
                    match parser.load_schema_object_by_name(&name, handler) {
                        Ok(schema) => Some(ResponseSchema::Ref(Reference::model(schema.model_name()))),
                        Err(e) => {
                            tracing::error!(
                                handler = %handler.qualified_name(),
                                code = %decl.code,
                                "{e}"
                            );
                            None
                        }
                    }
                }
                Some(DeclaredSchema::Inline(value)) => Some(ResponseSchema::Inline(value)),
                None => None,
            };
            responses.insert(
                decl.code,
                ResponseSpec {
                    description: decl.description.unwrap_or_default(),
                    schema,
                    example: decl.example,
                },
            );
        }
    }

    let non_empty = |values: Vec<String>| (!values.is_empty()).then_some(values);
    let operation = Operation {
        summary: method.summary(),
        description,
        operation_id: method.nickname(),
        parameters: parser.discover_parameters(method),
        responses,
        tags: non_empty(parser.tags()),
        consumes: non_empty(parser.consumes()),
        produces: non_empty(parser.produces()),
    };
    Some((http_method.to_ascii_lowercase(), operation))
}
