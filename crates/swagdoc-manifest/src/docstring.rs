//! # YAML Docstrings
//!
//! A method docstring is prose followed by an optional YAML block:
//!
//! ```text
//! Create a widget.
//!
//! Widgets are unique by name.
//! ---
//! request_serializer: WidgetInput
//! parameters:
//!   - name: dry_run
//!     paramType: query
//!     type: boolean
//! responseMessages:
//!   - code: 409
//!     message: Name taken
//! ```
//!
//! The first non-empty line is the summary; the rest of the prose is the
//! notes, with blank-line paragraph breaks rendered as `<br/>`. The YAML
//! block becomes [`DocMeta`], which [`YamlDocParser`] serves through the
//! [`DocParser`] capability.

use serde::Deserialize;
use serde_json::{Map, Value};
use swagdoc_core::{
    DeclaredSchema, DocParser, HandlerRef, IntrospectionError, IntrospectionResult,
    MethodIntrospector, Parameter, ParameterLocation, ResponseDecl, SchemaFragment, SchemaObject,
};

use crate::model::SchemaIndex;

/// Line separating prose from the YAML block.
pub const YAML_SEPARATOR: &str = "---";

/// Parameter types that never name a schema object.
const PRIMITIVE_TYPES: &[&str] = &["string", "integer", "number", "boolean", "array", "file"];

// ─── Splitting ──────────────────────────────────────────────────────

/// The three parts of a docstring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Docstring {
    pub summary: String,
    pub notes: String,
    /// Dedented YAML block, when a separator line is present.
    pub yaml: Option<String>,
}

/// Split a docstring into summary, notes and YAML block.
pub fn split_docstring(doc: &str) -> Docstring {
    let lines: Vec<&str> = doc.lines().collect();
    let separator = lines.iter().position(|line| line.trim() == YAML_SEPARATOR);
    let (prose, yaml) = match separator {
        Some(at) => (&lines[..at], Some(dedent(&lines[at + 1..]))),
        None => (&lines[..], None),
    };

    let mut prose = prose.iter().skip_while(|line| line.trim().is_empty());
    let summary = prose.next().map(|line| line.trim().to_string()).unwrap_or_default();
    let rest: Vec<&str> = prose.copied().collect();
    let notes = dedent(&rest).trim().replace("\n\n", "<br/>");

    Docstring {
        summary,
        notes,
        yaml,
    }
}

/// Strip the common leading whitespace of non-blank lines.
fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);
    lines
        .iter()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

// ─── Metadata ───────────────────────────────────────────────────────

/// How docstring parameters combine with discovered ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParametersStrategy {
    /// Replace discovered parameters of the same name and location, append
    /// the rest.
    #[default]
    Merge,
    /// Publish only the docstring parameters.
    Replace,
}

/// A parameter declared in a docstring.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ParamDecl {
    pub name: String,
    pub description: Option<String>,
    pub required: Option<bool>,
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    #[serde(rename = "paramType", alias = "in")]
    pub location: Option<ParameterLocation>,
    pub format: Option<String>,
    #[serde(rename = "defaultValue", alias = "default")]
    pub default_value: Option<Value>,
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<Value>>,
}

impl ParamDecl {
    /// Build the published parameter. Body parameters whose type is not a
    /// primitive reference the named model.
    pub fn to_parameter(&self, index: &SchemaIndex) -> Parameter {
        let location = self.location.unwrap_or(ParameterLocation::Query);
        let data_type = self.data_type.as_deref().unwrap_or("string");
        let mut parameter = Parameter::new(self.name.clone(), location, data_type);

        if location == ParameterLocation::Body && !PRIMITIVE_TYPES.contains(&data_type) {
            let model = index
                .resolve(data_type)
                .map(|schema| schema.model_name().to_string())
                .unwrap_or_else(|| data_type.to_string());
            parameter.param_type = None;
            parameter.schema = Some(SchemaFragment::reference(&model));
        }

        if let Some(required) = self.required {
            parameter.required = required;
        }
        parameter.description = self.description.clone();
        parameter.format = self.format.clone();
        parameter.default = self.default_value.clone();
        parameter.enum_values = self.enum_values.clone();
        parameter
    }
}

/// A response declared in a docstring.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ResponseMessage {
    pub code: Value,
    #[serde(alias = "description")]
    pub message: Option<String>,
    #[serde(rename = "responseModel")]
    pub response_model: Option<String>,
    pub schema: Option<Value>,
    pub example: Option<Value>,
}

impl ResponseMessage {
    fn to_decl(&self) -> ResponseDecl {
        let code = match &self.code {
            Value::String(code) => code.clone(),
            Value::Null => "default".to_string(),
            other => other.to_string(),
        };
        let schema = match (&self.response_model, &self.schema) {
            (Some(model), _) => Some(DeclaredSchema::Named(model.clone())),
            (None, Some(Value::String(name))) => Some(DeclaredSchema::Named(name.clone())),
            (None, Some(inline)) => Some(DeclaredSchema::Inline(inline.clone())),
            (None, None) => None,
        };
        ResponseDecl {
            code,
            description: self.message.clone(),
            schema,
            example: self.example.clone(),
        }
    }
}

/// Contents of a docstring YAML block.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DocMeta {
    /// Schema object for both request and response.
    pub serializer: Option<String>,
    pub request_serializer: Option<String>,
    pub response_serializer: Option<String>,
    pub omit_serializer: bool,
    /// Inline custom response type.
    #[serde(rename = "type")]
    pub response_type: Option<Map<String, Value>>,
    pub parameters: Vec<ParamDecl>,
    pub parameters_strategy: ParametersStrategy,
    pub omit_parameters: Vec<ParameterLocation>,
    #[serde(rename = "responseMessages")]
    pub response_messages: Vec<ResponseMessage>,
    pub tags: Vec<String>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
}

/// A parsed docstring.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedDoc {
    pub summary: String,
    pub notes: String,
    pub meta: DocMeta,
    /// Set when the YAML block is malformed; `meta` is then empty.
    pub parse_error: Option<String>,
}

impl ParsedDoc {
    pub fn parse(doc: &str) -> Self {
        let Docstring {
            summary,
            notes,
            yaml,
        } = split_docstring(doc);
        let (meta, parse_error) = match yaml {
            Some(block) if !block.trim().is_empty() => match serde_yaml::from_str::<DocMeta>(&block) {
                Ok(meta) => (meta, None),
                Err(e) => {
                    tracing::debug!(summary = %summary, "malformed docstring metadata: {e}");
                    (DocMeta::default(), Some(e.to_string()))
                }
            },
            _ => (DocMeta::default(), None),
        };
        Self {
            summary,
            notes,
            meta,
            parse_error,
        }
    }
}

// ─── Parser ─────────────────────────────────────────────────────────

/// Path parameter names in `{name}` segments, in order.
pub fn path_parameters(path: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = path;
    while let Some(open) = rest.find('{') {
        let tail = &rest[open + 1..];
        let Some(close) = tail.find('}') else { break };
        let name = tail[..close].trim();
        if !name.is_empty() {
            names.push(name.to_string());
        }
        rest = &tail[close + 1..];
    }
    names
}

/// [`DocParser`] over one parsed docstring.
#[derive(Debug, Clone)]
pub struct YamlDocParser<'a> {
    doc: ParsedDoc,
    /// Documented path of the endpoint, for path parameters.
    path: String,
    index: &'a SchemaIndex,
}

impl<'a> YamlDocParser<'a> {
    pub fn new(doc: ParsedDoc, path: impl Into<String>, index: &'a SchemaIndex) -> Self {
        Self {
            doc,
            path: path.into(),
            index,
        }
    }

    pub fn meta(&self) -> &DocMeta {
        &self.doc.meta
    }

    pub fn summary(&self) -> &str {
        &self.doc.summary
    }

    pub fn notes(&self) -> &str {
        &self.doc.notes
    }
}

impl DocParser for YamlDocParser<'_> {
    fn response_type(&self) -> Option<&Map<String, Value>> {
        self.doc.meta.response_type.as_ref()
    }

    fn should_omit_schema_object(&self) -> bool {
        self.doc.meta.omit_serializer
    }

    fn discover_parameters(&self, introspector: &dyn MethodIntrospector) -> Vec<Parameter> {
        let meta = &self.doc.meta;
        let mut parameters = Vec::new();

        if meta.parameters_strategy == ParametersStrategy::Merge {
            for name in path_parameters(&self.path) {
                parameters.push(Parameter::new(name, ParameterLocation::Path, "string"));
            }
            let method = introspector.http_method().to_ascii_uppercase();
            if matches!(method.as_str(), "POST" | "PUT" | "PATCH") {
                if let Some(schema) = introspector.request_schema_object() {
                    parameters.push(Parameter::body(schema.model_name()));
                }
            }
        }

        for decl in &meta.parameters {
            let parameter = decl.to_parameter(self.index);
            match parameters
                .iter()
                .position(|p| p.name == parameter.name && p.location == parameter.location)
            {
                Some(at) => parameters[at] = parameter,
                None => parameters.push(parameter),
            }
        }

        parameters.retain(|p| !meta.omit_parameters.contains(&p.location));
        parameters
    }

    fn responses(&self, _handler: &HandlerRef) -> Vec<ResponseDecl> {
        self.doc
            .meta
            .response_messages
            .iter()
            .map(ResponseMessage::to_decl)
            .collect()
    }

    fn load_schema_object_by_name(
        &self,
        name: &str,
        handler: &HandlerRef,
    ) -> IntrospectionResult<SchemaObject> {
        self.index
            .resolve(name)
            .ok_or_else(|| IntrospectionError::UnknownSchemaObject {
                name: name.to_string(),
                handler: handler.name.clone(),
            })
    }

    fn tags(&self) -> Vec<String> {
        self.doc.meta.tags.clone()
    }

    fn consumes(&self) -> Vec<String> {
        self.doc.meta.consumes.clone()
    }

    fn produces(&self) -> Vec<String> {
        self.doc.meta.produces.clone()
    }

    fn parse_error(&self) -> Option<&str> {
        self.doc.parse_error.as_deref()
    }
}
