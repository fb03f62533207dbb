//! # Manifest Introspection
//!
//! Answers the generator's questions from a [`Manifest`]: which methods a
//! handler serves, which actions a viewset route binds, which schema
//! objects a method reads and writes, and what its docstring says.

use std::path::Path;

use swagdoc_core::naming::default_nickname;
use swagdoc_core::{
    DocParser, EndpointDescriptor, FieldDescriptor, HandlerRef, Introspection, IntrospectionError,
    IntrospectionResult, MethodIntrospector, MethodTarget, SchemaObject, ViewSetRoute,
};

use crate::docstring::{ParsedDoc, YamlDocParser};
use crate::error::ManifestResult;
use crate::model::{HandlerDecl, Manifest, SchemaIndex};

/// The introspection layer over a validated manifest.
#[derive(Debug, Clone)]
pub struct ManifestIntrospection {
    manifest: Manifest,
    index: SchemaIndex,
}

impl ManifestIntrospection {
    pub fn new(manifest: Manifest) -> ManifestResult<Self> {
        manifest.validate()?;
        let index = SchemaIndex::new(&manifest.schemas);
        Ok(Self { manifest, index })
    }

    pub fn from_path(path: &Path) -> ManifestResult<Self> {
        Self::new(Manifest::from_path(path)?)
    }

    pub fn from_yaml_str(text: &str) -> ManifestResult<Self> {
        Self::new(Manifest::from_yaml_str(text)?)
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Endpoint descriptors of every routed path.
    pub fn endpoints(&self) -> Vec<EndpointDescriptor> {
        self.manifest.endpoints()
    }

    fn handler(&self, handler: &HandlerRef) -> IntrospectionResult<&HandlerDecl> {
        self.manifest
            .handler_for(handler)
            .ok_or_else(|| IntrospectionError::UnknownHandler(handler.qualified_name()))
    }

    /// Resolve a schema object named by a handler, logging and dropping
    /// unknown names.
    fn resolve_named(&self, name: &str, handler: &HandlerDecl) -> Option<SchemaObject> {
        let resolved = self.index.resolve(name);
        if resolved.is_none() {
            tracing::warn!(
                handler = %handler.name,
                schema = %name,
                "handler names an undeclared schema object"
            );
        }
        resolved
    }
}

impl Introspection for ManifestIntrospection {
    fn allowed_methods(&self, endpoint: &EndpointDescriptor) -> IntrospectionResult<Vec<String>> {
        let handler = self.handler(&endpoint.handler)?;
        Ok(handler
            .methods
            .iter()
            .map(|m| m.name.to_ascii_uppercase())
            .collect())
    }

    fn viewset_routes(&self, endpoint: &EndpointDescriptor) -> IntrospectionResult<Vec<ViewSetRoute>> {
        let declared = self
            .manifest
            .endpoints
            .iter()
            .find(|decl| {
                decl.pattern() == endpoint.pattern
                    && self
                        .manifest
                        .handler(&decl.handler)
                        .is_some_and(|h| h.handler_ref() == endpoint.handler)
            })
            .ok_or_else(|| IntrospectionError::Methods {
                handler: endpoint.handler.name.clone(),
                reason: format!("no route registered for pattern {}", endpoint.pattern),
            })?;
        Ok(declared
            .actions
            .iter()
            .map(|(method, action)| ViewSetRoute::new(method.to_ascii_lowercase(), action.clone()))
            .collect())
    }

    fn method_introspector<'a>(
        &'a self,
        target: &MethodTarget<'_>,
    ) -> IntrospectionResult<Box<dyn MethodIntrospector + 'a>> {
        let handler = self.handler(&target.endpoint.handler)?;
        let method_name = match target.action {
            Some(action) => action.to_string(),
            None => target.method.to_ascii_lowercase(),
        };
        let declared = handler.method(&method_name);

        let doc = declared
            .map(|m| m.doc.as_str())
            .filter(|doc| !doc.trim().is_empty())
            .unwrap_or(handler.doc.as_str());
        let parsed = ParsedDoc::parse(doc);

        let method_serializer = declared.and_then(|m| m.serializer.as_deref());
        let default_serializer = parsed
            .meta
            .serializer
            .as_deref()
            .or(method_serializer)
            .or(handler.serializer.as_deref());
        let request = parsed
            .meta
            .request_serializer
            .as_deref()
            .or(default_serializer)
            .and_then(|name| self.resolve_named(name, handler));
        let response = parsed
            .meta
            .response_serializer
            .as_deref()
            .or(default_serializer)
            .and_then(|name| self.resolve_named(name, handler));
        let extras = handler
            .extra_serializers
            .iter()
            .filter_map(|name| self.resolve_named(name, handler))
            .collect();

        let nickname = declared
            .and_then(|m| m.nickname.clone())
            .unwrap_or_else(|| default_nickname(&handler.name, &method_name));

        Ok(Box::new(ManifestMethod {
            http_method: target.method.to_ascii_uppercase(),
            method_name,
            handler: target.endpoint.handler.clone(),
            nickname,
            request,
            response,
            extras,
            parser: YamlDocParser::new(parsed, target.endpoint.path.clone(), &self.index),
        }))
    }

    fn schema_fields(&self, schema: &SchemaObject) -> IntrospectionResult<Vec<FieldDescriptor>> {
        let declared = self
            .manifest
            .schemas
            .iter()
            .find(|s| s.name == schema.name && s.module == schema.module)
            .ok_or_else(|| IntrospectionError::Fields {
                schema: schema.name.clone(),
                reason: "not declared in the manifest".into(),
            })?;
        let resolve = |name: &str| self.index.resolve(name);
        declared
            .fields
            .iter()
            .map(|field| field.to_descriptor(&resolve))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| IntrospectionError::Fields {
                schema: schema.name.clone(),
                reason,
            })
    }
}

// ─── Method ─────────────────────────────────────────────────────────

/// One method of one manifest handler.
#[derive(Debug)]
pub struct ManifestMethod<'a> {
    http_method: String,
    method_name: String,
    handler: HandlerRef,
    nickname: String,
    request: Option<SchemaObject>,
    response: Option<SchemaObject>,
    extras: Vec<SchemaObject>,
    parser: YamlDocParser<'a>,
}

impl MethodIntrospector for ManifestMethod<'_> {
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
        self.parser.summary().to_string()
    }

    fn notes(&self) -> String {
        self.parser.notes().to_string()
    }

    fn nickname(&self) -> String {
        self.nickname.clone()
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

#[cfg(test)]
mod tests {
    use super::*;
    use swagdoc_core::{ParameterLocation, Principal};

    const MANIFEST: &str = r#"
schemas:
  - name: Widget
    module: shop.serializers
    fields:
      - {name: id, kind: integer, read_only: true}
      - {name: name, kind: string}
      - {name: parts, nested: Part, many: true}
  - name: Part
    module: shop.serializers
    fields:
      - {name: sku, kind: slug}
  - name: Broken
    module: shop.serializers
    fields:
      - {name: ghost, nested: Ghost}
handlers:
  - name: WidgetDetail
    module: shop.views
    serializer: Widget
    doc: Widget detail.
    methods:
      - name: get
      - name: put
        doc: |
          Replace a widget.
          ---
          request_serializer: Part
      - name: delete
        nickname: drop_widget
  - name: WidgetViewSet
    module: shop.views
    kind: viewset
    serializer: Widget
    extra_serializers: [Part, Nope]
    methods:
      - {name: list, doc: List widgets.}
endpoints:
  - path: /widgets/{pk}
    handler: WidgetDetail
  - path: /widgets
    handler: WidgetViewSet
    actions: {GET: list, POST: create}
"#;

    fn layer() -> ManifestIntrospection {
        ManifestIntrospection::from_yaml_str(MANIFEST).unwrap()
    }

    fn target<'a>(
        endpoint: &'a EndpointDescriptor,
        method: &'a str,
        action: Option<&'a str>,
        principal: &'a Principal,
    ) -> MethodTarget<'a> {
        MethodTarget {
            endpoint,
            method,
            action,
            principal,
        }
    }

    #[test]
    fn allowed_methods_are_upper_case() {
        let layer = layer();
        let endpoints = layer.endpoints();
        assert_eq!(
            layer.allowed_methods(&endpoints[0]).unwrap(),
            vec!["GET", "PUT", "DELETE"]
        );
    }

    #[test]
    fn viewset_routes_are_lower_case() {
        let layer = layer();
        let endpoints = layer.endpoints();
        let routes = layer.viewset_routes(&endpoints[1]).unwrap();
        assert_eq!(
            routes,
            vec![ViewSetRoute::new("get", "list"), ViewSetRoute::new("post", "create")]
        );
        assert!(layer.viewset_routes(&endpoints[0]).unwrap().is_empty());
    }

    #[test]
    fn method_falls_back_to_handler_doc_and_serializer() {
        let layer = layer();
        let endpoints = layer.endpoints();
        let anon = Principal::anonymous("AnonymousUser");
        let get = layer
            .method_introspector(&target(&endpoints[0], "get", None, &anon))
            .unwrap();
        assert_eq!(get.summary(), "Widget detail.");
        assert_eq!(get.http_method(), "GET");
        assert_eq!(get.nickname(), "Widget_Detail_Get");
        assert_eq!(get.response_schema_object().unwrap().name, "Widget");
    }

    #[test]
    fn docstring_overrides_request_serializer() {
        let layer = layer();
        let endpoints = layer.endpoints();
        let anon = Principal::anonymous("AnonymousUser");
        let put = layer
            .method_introspector(&target(&endpoints[0], "put", None, &anon))
            .unwrap();
        assert_eq!(put.request_schema_object().unwrap().name, "Part");
        assert_eq!(put.response_schema_object().unwrap().name, "Widget");
        let parameters = put.doc_parser().discover_parameters(&*put);
        assert_eq!(parameters[0].name, "pk");
        assert_eq!(parameters[0].location, ParameterLocation::Path);
        assert_eq!(parameters[1].schema.as_ref().and_then(|s| s.ref_path.as_deref()), Some("#/definitions/Part"));
    }

    #[test]
    fn declared_nickname_wins() {
        let layer = layer();
        let endpoints = layer.endpoints();
        let anon = Principal::anonymous("AnonymousUser");
        let delete = layer
            .method_introspector(&target(&endpoints[0], "delete", None, &anon))
            .unwrap();
        assert_eq!(delete.nickname(), "drop_widget");
    }

    #[test]
    fn viewset_action_without_declaration_uses_handler_doc() {
        let layer = layer();
        let endpoints = layer.endpoints();
        let anon = Principal::anonymous("AnonymousUser");
        let create = layer
            .method_introspector(&target(&endpoints[1], "post", Some("create"), &anon))
            .unwrap();
        assert_eq!(create.method_name(), "create");
        assert_eq!(create.summary(), "");
        let names: Vec<_> = create.extra_schema_objects().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["Part"]);
    }

    #[test]
    fn schema_fields_in_declaration_order() {
        let layer = layer();
        let fields = layer
            .schema_fields(&SchemaObject::new("shop.serializers", "Widget"))
            .unwrap();
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "parts"]);
        assert!(!fields[0].is_required());
    }

    #[test]
    fn schema_field_errors() {
        let layer = layer();
        let err = layer
            .schema_fields(&SchemaObject::new("shop.serializers", "Broken"))
            .unwrap_err();
        assert!(err.to_string().contains("Ghost"));
        assert!(layer
            .schema_fields(&SchemaObject::new("elsewhere", "Widget"))
            .is_err());
    }

    #[test]
    fn unknown_handler() {
        let layer = layer();
        let stray = EndpointDescriptor::new("/x", "/x", HandlerRef::class_view("shop.views", "Stray"));
        assert!(matches!(
            layer.allowed_methods(&stray),
            Err(IntrospectionError::UnknownHandler(_))
        ));
    }
}
