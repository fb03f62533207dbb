//! # Introspection Capabilities
//!
//! The generator never looks at handlers or schema objects directly. It
//! asks an implementation of these traits, which plays the part of the
//! framework-specific introspection layer:
//!
//! - [`Introspection`]: entry point: method enumeration per handler,
//!   per-method introspectors, and field enumeration per schema object.
//! - [`MethodIntrospector`]: facts about one HTTP method of one handler.
//! - [`DocParser`]: the structured documentation metadata attached to a
//!   method (parameters, responses, tags, media types, custom types).
//!
//! Implementations must be side-effect free from the generator's point of
//! view; any caching is their own business.

use serde_json::{Map, Value};

use crate::document::Parameter;
use crate::endpoint::{EndpointDescriptor, HandlerRef, Principal};
use crate::error::IntrospectionResult;
use crate::field::{FieldDescriptor, SchemaObject};

/// One verb→action binding of a viewset route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSetRoute {
    /// Lower-cased HTTP method.
    pub method: String,
    /// Action name on the viewset (e.g. `list`, `partial_update`).
    pub action: String,
}

impl ViewSetRoute {
    pub fn new(method: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            action: action.into(),
        }
    }
}

/// What a per-method introspector is requested for.
#[derive(Debug, Clone, Copy)]
pub struct MethodTarget<'a> {
    pub endpoint: &'a EndpointDescriptor,
    /// Lower-cased HTTP method.
    pub method: &'a str,
    /// Viewset action bound to the method, if any.
    pub action: Option<&'a str>,
    pub principal: &'a Principal,
}

/// Schema attached to a declared response.
#[derive(Debug, Clone, PartialEq)]
pub enum DeclaredSchema {
    /// A schema object referenced by name, resolved through
    /// [`DocParser::load_schema_object_by_name`].
    Named(String),
    /// An inline schema published as-is.
    Inline(Value),
}

/// A response entry from documentation metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseDecl {
    /// Status code, or `default`.
    pub code: String,
    pub description: Option<String>,
    pub schema: Option<DeclaredSchema>,
    pub example: Option<Value>,
}

/// Structured documentation metadata of one method.
pub trait DocParser {
    /// Inline custom response type (a property map), if declared.
    fn response_type(&self) -> Option<&Map<String, Value>>;

    /// The metadata asks for the response schema object to be ignored.
    fn should_omit_schema_object(&self) -> bool;

    /// Parameters of the operation, in publication order.
    fn discover_parameters(&self, introspector: &dyn MethodIntrospector) -> Vec<Parameter>;

    /// Declared responses; empty when none were declared.
    fn responses(&self, handler: &HandlerRef) -> Vec<ResponseDecl>;

    /// Resolve a schema object named in the metadata.
    fn load_schema_object_by_name(
        &self,
        name: &str,
        handler: &HandlerRef,
    ) -> IntrospectionResult<SchemaObject>;

    fn tags(&self) -> Vec<String>;

    fn consumes(&self) -> Vec<String>;

    fn produces(&self) -> Vec<String>;

    /// Parse error of the metadata block, if it was malformed.
    fn parse_error(&self) -> Option<&str>;
}

/// Facts about one HTTP method of one handler.
pub trait MethodIntrospector {
    /// HTTP method as the handler declares it (any casing).
    fn http_method(&self) -> &str;

    /// Name used when deriving model names: the viewset action, or the
    /// lower-cased HTTP method.
    fn method_name(&self) -> &str;

    fn handler(&self) -> &HandlerRef;

    fn summary(&self) -> String;

    fn notes(&self) -> String;

    fn nickname(&self) -> String;

    /// Schema object describing the request body.
    fn request_schema_object(&self) -> Option<SchemaObject>;

    /// Schema object describing the response body.
    fn response_schema_object(&self) -> Option<SchemaObject>;

    /// Schema objects declared out-of-band that must be published.
    fn extra_schema_objects(&self) -> Vec<SchemaObject>;

    fn doc_parser(&self) -> &dyn DocParser;
}

/// The introspection layer as a whole.
pub trait Introspection {
    /// Methods a function or class view answers, in declaration order.
    fn allowed_methods(&self, endpoint: &EndpointDescriptor) -> IntrospectionResult<Vec<String>>;

    /// Verb→action bindings of the route a viewset endpoint was mounted on.
    fn viewset_routes(&self, endpoint: &EndpointDescriptor) -> IntrospectionResult<Vec<ViewSetRoute>>;

    /// Build the introspector of one method.
    fn method_introspector<'a>(
        &'a self,
        target: &MethodTarget<'_>,
    ) -> IntrospectionResult<Box<dyn MethodIntrospector + 'a>>;

    /// Enumerate the fields of a schema object, in declaration order.
    fn schema_fields(&self, schema: &SchemaObject) -> IntrospectionResult<Vec<FieldDescriptor>>;
}
