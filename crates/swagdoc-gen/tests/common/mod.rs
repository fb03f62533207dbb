//! In-memory introspection layer shared by the generator tests.

#![allow(dead_code)]

use std::collections::HashMap;

use serde_json::{Map, Value};
use swagdoc_core::{
    DeclaredSchema, DocParser, EndpointDescriptor, FieldDescriptor, HandlerRef, Introspection,
    IntrospectionError, IntrospectionResult, MethodIntrospector, MethodTarget, Parameter,
    ResponseDecl, SchemaObject, ViewSetRoute,
};

pub fn obj(name: &str) -> SchemaObject {
    SchemaObject::new("app.serializers", name)
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    pub response_type: Option<Map<String, Value>>,
    pub omit: bool,
    pub parameters: Vec<Parameter>,
    pub responses: Vec<ResponseDecl>,
    pub known: Vec<SchemaObject>,
    pub tags: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub parse_error: Option<String>,
}

impl DocParser for Parser {
    fn response_type(&self) -> Option<&Map<String, Value>> {
        self.response_type.as_ref()
    }
    fn should_omit_schema_object(&self) -> bool {
        self.omit
    }
    fn discover_parameters(&self, _: &dyn MethodIntrospector) -> Vec<Parameter> {
        self.parameters.clone()
    }
    fn responses(&self, _: &HandlerRef) -> Vec<ResponseDecl> {
        self.responses.clone()
    }
    fn load_schema_object_by_name(&self, name: &str, handler: &HandlerRef) -> IntrospectionResult<SchemaObject> {
        self.known
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .ok_or_else(|| IntrospectionError::UnknownSchemaObject {
                name: name.to_string(),
                handler: handler.name.clone(),
            })
    }
    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }
    fn consumes(&self) -> Vec<String> {
        self.consumes.clone()
    }
    fn produces(&self) -> Vec<String> {
        self.produces.clone()
    }
    fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }
}

#[derive(Debug, Clone)]
pub struct Method {
    pub http_method: String,
    pub method_name: String,
    pub handler: HandlerRef,
    pub summary: String,
    pub notes: String,
    pub request: Option<SchemaObject>,
    pub response: Option<SchemaObject>,
    pub extras: Vec<SchemaObject>,
    pub parser: Parser,
}

impl Method {
    pub fn new(handler: &HandlerRef, http_method: &str) -> Self {
        Self {
            http_method: http_method.to_string(),
            method_name: http_method.to_ascii_lowercase(),
            handler: handler.clone(),
            summary: format!("{} {}", http_method, handler.name),
            notes: String::new(),
            request: None,
            response: None,
            extras: Vec::new(),
            parser: Parser::default(),
        }
    }

    pub fn action(mut self, action: &str) -> Self {
        self.method_name = action.to_string();
        self
    }

    pub fn responds_with(mut self, schema: SchemaObject) -> Self {
        self.response = Some(schema);
        self
    }

    pub fn accepts(mut self, schema: SchemaObject) -> Self {
        self.request = Some(schema);
        self
    }

    pub fn declare(mut self, code: &str, description: &str, schema: Option<DeclaredSchema>) -> Self {
        self.parser.responses.push(ResponseDecl {
            code: code.to_string(),
            description: Some(description.to_string()),
            schema,
            example: None,
        });
        self
    }

    pub fn knows(mut self, schema: SchemaObject) -> Self {
        self.parser.known.push(schema);
        self
    }
}

impl MethodIntrospector for Method {
    fn http_method(&self) -> &str {
        &self.http_method
    }
    fn method_name(&self) -> &str {
        &self.method_name
    }
    fn handler(&self) -> &HandlerRef {
        &self.handler
    }
    fn summary(&self) -> String {
        self.summary.clone()
    }
    fn notes(&self) -> String {
        self.notes.clone()
    }
    fn nickname(&self) -> String {
        format!("{}_{}", self.handler.name, self.method_name)
    }
    fn request_schema_object(&self) -> Option<SchemaObject> {
        self.request.clone()
    }
    fn response_schema_object(&self) -> Option<SchemaObject> {
        self.response.clone()
    }
    fn extra_schema_objects(&self) -> Vec<SchemaObject> {
        self.extras.clone()
    }
    fn doc_parser(&self) -> &dyn DocParser {
        &self.parser
    }
}

/// Handlers, routes and schema objects, all in memory.
#[derive(Default)]
pub struct Layer {
    /// Handler name → methods in declaration order.
    pub methods: HashMap<String, Vec<Method>>,
    /// Endpoint pattern → viewset routes.
    pub routes: HashMap<String, Vec<ViewSetRoute>>,
    pub schemas: HashMap<SchemaObject, Vec<FieldDescriptor>>,
}

impl Layer {
    pub fn method(mut self, method: Method) -> Self {
        self.methods.entry(method.handler.name.clone()).or_default().push(method);
        self
    }

    pub fn route(mut self, pattern: &str, routes: &[(&str, &str)]) -> Self {
        self.routes.insert(
            pattern.to_string(),
            routes.iter().map(|(m, a)| ViewSetRoute::new(*m, *a)).collect(),
        );
        self
    }

    pub fn schema(mut self, schema: SchemaObject, fields: Vec<FieldDescriptor>) -> Self {
        self.schemas.insert(schema, fields);
        self
    }

    fn handler_methods(&self, handler: &HandlerRef) -> IntrospectionResult<&Vec<Method>> {
        self.methods
            .get(&handler.name)
            .ok_or_else(|| IntrospectionError::UnknownHandler(handler.name.clone()))
    }
}

impl Introspection for Layer {
    fn allowed_methods(&self, endpoint: &EndpointDescriptor) -> IntrospectionResult<Vec<String>> {
        Ok(self
            .handler_methods(&endpoint.handler)?
            .iter()
            .map(|m| m.http_method.clone())
            .collect())
    }

    fn viewset_routes(&self, endpoint: &EndpointDescriptor) -> IntrospectionResult<Vec<ViewSetRoute>> {
        self.routes
            .get(&endpoint.pattern)
            .cloned()
            .ok_or_else(|| IntrospectionError::Methods {
                handler: endpoint.handler.name.clone(),
                reason: format!("no routes for pattern {}", endpoint.pattern),
            })
    }

    fn method_introspector<'a>(
        &'a self,
        target: &MethodTarget<'_>,
    ) -> IntrospectionResult<Box<dyn MethodIntrospector + 'a>> {
        let methods = self.handler_methods(&target.endpoint.handler)?;
        let found = methods.iter().find(|m| match target.action {
            Some(action) => m.method_name == action,
            None => m.http_method.eq_ignore_ascii_case(target.method),
        });
        match found {
            Some(method) => {
                let mut method = method.clone();
                method.http_method = target.method.to_ascii_uppercase();
                Ok(Box::new(method))
            }
            None => Err(IntrospectionError::Methods {
                handler: target.endpoint.handler.name.clone(),
                reason: format!("no method {}", target.method),
            }),
        }
    }

    fn schema_fields(&self, schema: &SchemaObject) -> IntrospectionResult<Vec<FieldDescriptor>> {
        self.schemas
            .get(schema)
            .cloned()
            .ok_or_else(|| IntrospectionError::Fields {
                schema: schema.name.clone(),
                reason: "unknown".into(),
            })
    }
}
