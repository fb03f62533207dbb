//! # Manifest Model
//!
//! The YAML shape of an API manifest:
//!
//! ```text
//! Manifest
//! ├── schemas:    [SchemaDecl]   name, module, ordered fields
//! ├── handlers:   [HandlerDecl]  name, module, kind, serializer, methods
//! └── endpoints:  [EndpointDecl] path, pattern, handler, actions (viewsets)
//! ```
//!
//! ```yaml
//! schemas:
//!   - name: Widget
//!     module: shop.serializers
//!     fields:
//!       - {name: id, kind: integer, read_only: true}
//!       - {name: name, kind: string, required: true}
//! handlers:
//!   - name: WidgetViewSet
//!     kind: viewset
//!     serializer: Widget
//!     methods:
//!       - name: list
//!         doc: List widgets.
//! endpoints:
//!   - path: /widgets
//!     handler: WidgetViewSet
//!     actions: {get: list}
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use swagdoc_core::{
    Choices, EndpointDescriptor, FieldDescriptor, FieldKind, HandlerKind, HandlerRef, SchemaObject,
};

use crate::error::{ManifestError, ManifestResult};

// ─── Schemas ────────────────────────────────────────────────────────

/// A schema object and its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDecl {
    pub name: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

impl SchemaDecl {
    pub fn schema_object(&self) -> SchemaObject {
        SchemaObject::new(self.module.clone(), self.name.clone())
    }
}

/// Choice set as written in YAML: `[[value, label], ...]`, a plain list of
/// values, or a `value: label` mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoicesDecl {
    Pairs(Vec<(Value, String)>),
    Values(Vec<Value>),
    Mapping(serde_yaml::Mapping),
}

impl ChoicesDecl {
    fn to_choices(&self) -> Result<Choices, String> {
        Ok(match self {
            Self::Pairs(pairs) => Choices::Pairs(pairs.clone()),
            Self::Values(values) => Choices::Pairs(
                values
                    .iter()
                    .map(|v| (v.clone(), label_of(v)))
                    .collect(),
            ),
            Self::Mapping(mapping) => {
                let mut pairs = Vec::with_capacity(mapping.len());
                for (key, label) in mapping {
                    let key = serde_json::to_value(key).map_err(|e| format!("invalid choice key: {e}"))?;
                    let label = serde_json::to_value(label).map_err(|e| format!("invalid choice label: {e}"))?;
                    pairs.push((key, label_of(&label)));
                }
                Choices::Mapping(pairs)
            }
        })
    }
}

fn label_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One field of a schema object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldDecl {
    pub name: String,
    pub kind: Option<FieldKind>,
    pub required: Option<bool>,
    pub read_only: bool,
    pub write_only: bool,
    pub help_text: Option<String>,
    pub choices: Option<ChoicesDecl>,
    pub min_value: Option<Number>,
    pub max_value: Option<Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub default: Option<Value>,
    /// Name of a nested schema object.
    pub nested: Option<String>,
    /// With `nested`: a list of the nested shape.
    pub many: bool,
    /// Item description of a list of plain values.
    pub child: Option<Box<FieldDecl>>,
}

impl FieldDecl {
    /// Build the descriptor, resolving nested schema names through `resolve`.
    pub fn to_descriptor(
        &self,
        resolve: &dyn Fn(&str) -> Option<SchemaObject>,
    ) -> Result<FieldDescriptor, String> {
        let mut field = if let Some(name) = &self.nested {
            let schema = resolve(name).ok_or_else(|| {
                format!("field '{}' nests unknown schema object '{name}'", self.name)
            })?;
            if self.many {
                FieldDescriptor::many(self.name.clone(), schema)
            } else {
                FieldDescriptor::nested(self.name.clone(), schema)
            }
        } else if let Some(child) = &self.child {
            let mut list = FieldDescriptor::list_of(self.name.clone(), child.to_descriptor(resolve)?);
            if let Some(kind) = &self.kind {
                list.kind = Some(kind.clone());
            }
            list
        } else {
            match &self.kind {
                Some(kind) => FieldDescriptor::new(self.name.clone(), kind.clone()),
                None => FieldDescriptor::untyped(self.name.clone()),
            }
        };

        if let Some(required) = self.required {
            field = field.required(required);
        }
        if self.read_only {
            field = field.read_only();
        }
        if self.write_only {
            field = field.write_only();
        }
        field.help_text = self.help_text.clone();
        field.choices = self.choices.as_ref().map(ChoicesDecl::to_choices).transpose()?;
        field = field
            .bounds(self.min_value.clone(), self.max_value.clone())
            .lengths(self.min_length, self.max_length);
        field.default = self.default.clone();
        Ok(field)
    }
}

/// Schema objects of a manifest, looked up by name.
///
/// A dotted `module.Name` reference resolves by its last segment.
#[derive(Debug, Clone, Default)]
pub struct SchemaIndex {
    by_name: HashMap<String, SchemaObject>,
}

impl SchemaIndex {
    pub fn new(schemas: &[SchemaDecl]) -> Self {
        Self {
            by_name: schemas
                .iter()
                .map(|s| (s.name.clone(), s.schema_object()))
                .collect(),
        }
    }

    pub fn resolve(&self, reference: &str) -> Option<SchemaObject> {
        let name = reference.rsplit('.').next().unwrap_or(reference);
        self.by_name.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ─── Handlers ───────────────────────────────────────────────────────

fn class_view() -> HandlerKind {
    HandlerKind::ClassView
}

/// One documented method (class views) or action (viewsets).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodDecl {
    /// HTTP method or viewset action.
    pub name: String,
    /// Docstring: summary line, notes, optional YAML block after `---`.
    pub doc: String,
    /// Schema object overriding the handler's default serializer.
    pub serializer: Option<String>,
    /// Explicit operation id.
    pub nickname: Option<String>,
}

/// A request handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerDecl {
    pub name: String,
    #[serde(default)]
    pub module: String,
    #[serde(default = "class_view")]
    pub kind: HandlerKind,
    /// Default schema object for requests and responses.
    #[serde(default)]
    pub serializer: Option<String>,
    /// Schema objects published regardless of use.
    #[serde(default)]
    pub extra_serializers: Vec<String>,
    /// Handler-level docstring, used by methods without their own.
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl HandlerDecl {
    pub fn handler_ref(&self) -> HandlerRef {
        match self.kind {
            HandlerKind::FunctionView => HandlerRef::function_view(self.module.clone(), self.name.clone()),
            HandlerKind::ClassView => HandlerRef::class_view(self.module.clone(), self.name.clone()),
            HandlerKind::ViewSet => HandlerRef::viewset(self.module.clone(), self.name.clone()),
        }
    }

    /// Whether `reference` (a plain or `module.Name` form) names this handler.
    pub fn is_named(&self, reference: &str) -> bool {
        reference == self.name || reference == self.handler_ref().qualified_name()
    }

    /// The declaration of `name`, matched case-insensitively.
    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods.iter().find(|m| m.name.eq_ignore_ascii_case(name))
    }
}

// ─── Endpoints ──────────────────────────────────────────────────────

/// A routed path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDecl {
    pub path: String,
    /// Routing pattern; defaults to the path.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Handler name, plain or `module.Name`.
    pub handler: String,
    /// Viewsets only: HTTP method → action.
    #[serde(default)]
    pub actions: BTreeMap<String, String>,
}

impl EndpointDecl {
    pub fn pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(&self.path)
    }
}

// ─── Manifest ───────────────────────────────────────────────────────

/// A complete API manifest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    pub schemas: Vec<SchemaDecl>,
    pub handlers: Vec<HandlerDecl>,
    pub endpoints: Vec<EndpointDecl>,
}

impl Manifest {
    /// Parse and check a manifest.
    pub fn from_yaml_str(text: &str) -> ManifestResult<Self> {
        let manifest: Self = serde_yaml::from_str(text)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read, parse and check a manifest file.
    pub fn from_path(path: &Path) -> ManifestResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest = Self::from_yaml_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            schemas = manifest.schemas.len(),
            handlers = manifest.handlers.len(),
            endpoints = manifest.endpoints.len(),
            "manifest loaded"
        );
        Ok(manifest)
    }

    /// Check cross-references: unique names, known handlers, viewset
    /// endpoints with actions.
    pub fn validate(&self) -> ManifestResult<()> {
        let mut names = HashSet::new();
        for schema in &self.schemas {
            if !names.insert(schema.name.as_str()) {
                return Err(ManifestError::Invalid(format!(
                    "duplicate schema object '{}'",
                    schema.name
                )));
            }
        }
        let mut names = HashSet::new();
        for handler in &self.handlers {
            if !names.insert(handler.handler_ref().qualified_name()) {
                return Err(ManifestError::Invalid(format!(
                    "duplicate handler '{}'",
                    handler.name
                )));
            }
        }
        for endpoint in &self.endpoints {
            let handler = self.handler(&endpoint.handler).ok_or_else(|| {
                ManifestError::Invalid(format!(
                    "endpoint '{}' refers to unknown handler '{}'",
                    endpoint.path, endpoint.handler
                ))
            })?;
            match handler.kind {
                HandlerKind::ViewSet if endpoint.actions.is_empty() => {
                    return Err(ManifestError::Invalid(format!(
                        "viewset endpoint '{}' declares no actions",
                        endpoint.path
                    )));
                }
                HandlerKind::FunctionView | HandlerKind::ClassView if !endpoint.actions.is_empty() => {
                    tracing::warn!(path = %endpoint.path, "actions ignored on a non-viewset endpoint");
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Look up a handler by plain or qualified name.
    pub fn handler(&self, reference: &str) -> Option<&HandlerDecl> {
        self.handlers.iter().find(|h| h.is_named(reference))
    }

    /// The declaration behind a handler reference.
    pub fn handler_for(&self, handler: &HandlerRef) -> Option<&HandlerDecl> {
        self.handlers
            .iter()
            .find(|h| h.name == handler.name && h.module == handler.module)
    }

    /// Endpoint descriptors in declaration order. Endpoints whose handler
    /// is unknown are skipped.
    pub fn endpoints(&self) -> Vec<EndpointDescriptor> {
        self.endpoints
            .iter()
            .filter_map(|endpoint| {
                let handler = self.handler(&endpoint.handler)?;
                Some(EndpointDescriptor::new(
                    endpoint.path.clone(),
                    endpoint.pattern().to_string(),
                    handler.handler_ref(),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(name: &str) -> Option<SchemaObject> {
        (name == "User").then(|| SchemaObject::new("app", "User"))
    }

    fn field(yaml: &str) -> FieldDecl {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn read_only_without_marker_is_optional() {
        let f = field("{name: id, kind: integer, read_only: true}").to_descriptor(&resolve).unwrap();
        assert!(f.read_only);
        assert!(!f.is_required());
        let f = field("{name: id, kind: integer, read_only: true, required: true}")
            .to_descriptor(&resolve)
            .unwrap();
        assert!(f.is_required());
    }

    #[test]
    fn nested_and_many_resolve_schema_objects() {
        let f = field("{name: owner, nested: User}").to_descriptor(&resolve).unwrap();
        assert_eq!(f.nested.schema_object().map(|s| s.name.as_str()), Some("User"));
        assert_eq!(f.kind, Some(FieldKind::Nested));
        let f = field("{name: owners, nested: User, many: true}").to_descriptor(&resolve).unwrap();
        assert_eq!(f.kind, Some(FieldKind::List));
        let err = field("{name: x, nested: Nope}").to_descriptor(&resolve).unwrap_err();
        assert!(err.contains("Nope"));
    }

    #[test]
    fn child_describes_list_items() {
        let f = field("{name: tags, child: {kind: slug}}").to_descriptor(&resolve).unwrap();
        assert_eq!(f.data_type().data_type, "array");
        assert!(matches!(f.nested, swagdoc_core::Nested::ArrayOf(swagdoc_core::ArrayItem::Field(_))));
    }

    #[test]
    fn choice_forms_keep_order() {
        let pairs = field("{name: c, kind: choice, choices: [[2, two], [1, one]]}")
            .to_descriptor(&resolve)
            .unwrap();
        assert_eq!(pairs.choices.unwrap().keys(), vec![json!(2), json!(1)]);

        let values = field("{name: c, kind: choice, choices: [b, a]}").to_descriptor(&resolve).unwrap();
        assert_eq!(values.choices.unwrap().keys(), vec![json!("b"), json!("a")]);

        let mapping = field("{name: c, kind: choice, choices: {z: Zed, a: Ay}}")
            .to_descriptor(&resolve)
            .unwrap();
        assert_eq!(mapping.choices.unwrap().keys(), vec![json!("z"), json!("a")]);
    }

    #[test]
    fn empty_help_text_survives_parsing() {
        let f = field("{name: secret, help_text: ''}").to_descriptor(&resolve).unwrap();
        assert_eq!(f.help_text.as_deref(), Some(""));
        let f = field("{name: open}").to_descriptor(&resolve).unwrap();
        assert!(f.help_text.is_none());
    }

    #[test]
    fn index_resolves_dotted_references() {
        let index = SchemaIndex::new(&[SchemaDecl {
            name: "Widget".into(),
            module: "shop.serializers".into(),
            fields: Vec::new(),
        }]);
        let expected = SchemaObject::new("shop.serializers", "Widget");
        assert_eq!(index.resolve("Widget"), Some(expected.clone()));
        assert_eq!(index.resolve("shop.serializers.Widget"), Some(expected));
        assert_eq!(index.resolve("Gadget"), None);
    }

    #[test]
    fn viewset_endpoint_requires_actions() {
        let text = "handlers:\n  - {name: V, kind: viewset}\nendpoints:\n  - {path: /v, handler: V}\n";
        assert!(matches!(Manifest::from_yaml_str(text), Err(ManifestError::Invalid(_))));
    }

    #[test]
    fn unknown_handler_is_rejected() {
        let text = "endpoints:\n  - {path: /v, handler: Ghost}\n";
        let err = Manifest::from_yaml_str(text).unwrap_err();
        assert!(err.to_string().contains("Ghost"));
    }

    #[test]
    fn duplicate_schema_is_rejected() {
        let text = "schemas:\n  - {name: A}\n  - {name: A, module: other}\n";
        assert!(Manifest::from_yaml_str(text).is_err());
    }

    #[test]
    fn endpoints_carry_handler_kind_and_pattern() {
        let text = "handlers:\n  - {name: ping, module: app.views, kind: function_view}\nendpoints:\n  - {path: /ping, handler: app.views.ping}\n";
        let manifest = Manifest::from_yaml_str(text).unwrap();
        let endpoints = manifest.endpoints();
        assert_eq!(endpoints[0].pattern, "/ping");
        assert_eq!(endpoints[0].handler.kind(), HandlerKind::FunctionView);
    }
}
