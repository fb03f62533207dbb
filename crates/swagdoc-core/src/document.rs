//! # Swagger Document Model
//!
//! Serde types for the generated document. The shape follows Swagger 2.0:
//! `paths` maps a path to lower-cased HTTP methods to [`Operation`]s, and
//! `definitions` maps model names to compiled models. Every optional key is
//! skipped when absent so the serialized output only carries what was
//! actually derived.
//!
//! ```text
//! Document
//! ├── swagger / info / host / basePath
//! ├── paths:        path → method → Operation
//! │                                  ├── parameters: [Parameter]
//! │                                  └── responses:  code → ResponseSpec
//! └── definitions:  name → Definition (compiled model | explicit model)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Prefix of every model reference.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Build a `#/definitions/<name>` reference string.
pub fn definition_ref(name: &str) -> String {
    format!("{DEFINITIONS_PREFIX}{name}")
}

// ─── Schema fragments ───────────────────────────────────────────────

/// Compiled schema of one field or array item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFragment {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaFragment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaFragment {
    /// A bare `{$ref}` fragment.
    pub fn reference(model_name: &str) -> Self {
        Self {
            ref_path: Some(definition_ref(model_name)),
            ..Self::default()
        }
    }

    /// A fragment with only a type.
    pub fn typed(schema_type: impl Into<String>) -> Self {
        Self {
            schema_type: Some(schema_type.into()),
            ..Self::default()
        }
    }
}

/// Ordered `name → fragment` map; serializes as a JSON object in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, SchemaFragment)>);

impl Properties {
    /// An empty map.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or replace, keeping the original position on replace.
    pub fn insert(&mut self, name: impl Into<String>, fragment: SchemaFragment) {
        let name = name.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = fragment,
            None => self.0.push((name, fragment)),
        }
    }

    /// Look up a property.
    pub fn get(&self, name: &str) -> Option<&SchemaFragment> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, f)| f)
    }

    /// Whether a property exists.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Property names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaFragment)> {
        self.0.iter().map(|(key, f)| (key.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, SchemaFragment)> for Properties {
    fn from_iter<T: IntoIterator<Item = (String, SchemaFragment)>>(iter: T) -> Self {
        let mut props = Self::new();
        for (name, fragment) in iter {
            props.insert(name, fragment);
        }
        props
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, fragment) in &self.0 {
            map.serialize_entry(name, fragment)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of property schemas")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut props = Properties::new();
                while let Some((name, fragment)) = access.next_entry::<String, SchemaFragment>()? {
                    props.insert(name, fragment);
                }
                Ok(props)
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

// ─── Definitions ────────────────────────────────────────────────────

/// Published form of a schema object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDefinition {
    /// Always `"object"`.
    #[serde(rename = "type")]
    pub model_type: String,
    pub properties: Properties,
    pub required: Vec<String>,
}

impl ModelDefinition {
    /// An object model.
    pub fn object(properties: Properties, required: Vec<String>) -> Self {
        Self {
            model_type: "object".to_string(),
            properties,
            required,
        }
    }
}

/// A model declared inline in documentation metadata rather than derived
/// from a schema object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplicitModel {
    pub id: String,
    pub properties: Map<String, Value>,
}

/// Entry of the `definitions` map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Definition {
    Model(ModelDefinition),
    Explicit(ExplicitModel),
}

impl Definition {
    /// The compiled model, if this entry is one.
    pub fn as_model(&self) -> Option<&ModelDefinition> {
        match self {
            Self::Model(model) => Some(model),
            Self::Explicit(_) => None,
        }
    }
}

// ─── Operations ─────────────────────────────────────────────────────

/// Where a parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Body,
    #[serde(alias = "form")]
    FormData,
}

/// One operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaFragment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

impl Parameter {
    /// A parameter with only a name, a location and a type.
    pub fn new(name: impl Into<String>, location: ParameterLocation, param_type: &str) -> Self {
        Self {
            name: name.into(),
            location,
            description: None,
            required: location == ParameterLocation::Path,
            param_type: Some(param_type.to_string()),
            format: None,
            schema: None,
            default: None,
            enum_values: None,
        }
    }

    /// A `body` parameter carrying a model reference.
    pub fn body(model_name: &str) -> Self {
        Self {
            name: "body".to_string(),
            location: ParameterLocation::Body,
            description: None,
            required: true,
            param_type: None,
            format: None,
            schema: Some(SchemaFragment::reference(model_name)),
            default: None,
            enum_values: None,
        }
    }
}

/// A `{$ref}` pointer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub ref_path: String,
}

impl Reference {
    /// Reference a model definition by name.
    pub fn model(name: &str) -> Self {
        Self {
            ref_path: definition_ref(name),
        }
    }
}

/// Schema of a response: a model reference or an inline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseSchema {
    Ref(Reference),
    Inline(Value),
}

/// Documented response for one status code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseSpec {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ResponseSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl ResponseSpec {
    /// A response with a description only.
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            schema: None,
            example: None,
        }
    }
}

/// Documentation of one HTTP method on one path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub summary: String,
    pub description: String,
    pub operation_id: String,
    pub parameters: Vec<Parameter>,
    /// Keyed by status code or `"default"`.
    pub responses: BTreeMap<String, ResponseSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub produces: Option<Vec<String>>,
}

// ─── Document ───────────────────────────────────────────────────────

/// Contact details of the `info` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License of the `info` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// API metadata. Which keys are mandatory depends on the Swagger version
/// and is checked when settings load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Info {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Path → lower-cased method → operation.
pub type Paths = BTreeMap<String, BTreeMap<String, Operation>>;

/// The generated API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub swagger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    pub paths: Paths,
    pub definitions: BTreeMap<String, Definition>,
}
