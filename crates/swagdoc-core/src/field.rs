//! # Schema Objects and Field Descriptors
//!
//! A [`SchemaObject`] names a field-bearing data shape (a serializer, in
//! the frameworks this tool documents). It is a pure identity: fields are
//! not stored on it but fetched on demand from the introspection layer,
//! which is free to cache them.
//!
//! A [`FieldDescriptor`] is one attribute of such a shape. Whether a field
//! points at another shape is expressed by the explicit [`Nested`] union
//! rather than by inspecting runtime types.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Data kinds that accept a finite choice set.
pub const ENUM_KINDS: &[&str] = &["choice", "multiple choice"];

/// Identity of a data-shape declaration.
///
/// Two schema objects are the same iff they name the same declaration
/// (same module, same name). Ordering is by module then name, which keeps
/// every set of schema objects deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Module the declaration lives in.
    pub module: String,
    /// Declared name (e.g. `Widget`).
    pub name: String,
}

impl SchemaObject {
    /// Build a schema object identity.
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }

    /// Name of the published model definition for this shape.
    pub fn model_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SchemaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.module, self.name)
        }
    }
}

/// A `(type, format)` pair as published in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataType {
    /// Swagger `type` (or a pseudo type such as `hidden` or `choice`).
    pub data_type: String,
    /// Swagger `format`; equal to `data_type` when there is none.
    pub data_format: String,
}

impl DataType {
    /// Build a pair.
    pub fn new(data_type: impl Into<String>, data_format: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            data_format: data_format.into(),
        }
    }

    /// The fallback pair for fields without a declared kind.
    pub fn string() -> Self {
        Self::new("string", "string")
    }

    /// Whether the type accepts a choice set.
    pub fn is_enum_capable(&self) -> bool {
        ENUM_KINDS.contains(&self.data_type.as_str())
    }

    /// Whether the type carries numeric bounds.
    pub fn is_numeric(&self) -> bool {
        matches!(self.data_type.as_str(), "integer" | "number")
    }
}

/// Declared primitive kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Boolean,
    Integer,
    Int32,
    Int64,
    #[serde(alias = "number")]
    Float,
    #[serde(alias = "double")]
    Decimal,
    String,
    Email,
    Url,
    Slug,
    Uuid,
    Date,
    #[serde(alias = "date_time")]
    Datetime,
    Time,
    File,
    Image,
    Choice,
    MultipleChoice,
    Hidden,
    List,
    Nested,
    /// Escape hatch for kinds the collaborator maps itself.
    Custom {
        data_type: String,
        data_format: String,
    },
}

impl FieldKind {
    /// Map the kind onto its published `(type, format)` pair.
    pub fn data_type(&self) -> DataType {
        let (t, f) = match self {
            Self::Boolean => ("boolean", "boolean"),
            Self::Integer => ("integer", "integer"),
            Self::Int32 => ("integer", "int32"),
            Self::Int64 => ("integer", "int64"),
            Self::Float => ("number", "float"),
            Self::Decimal => ("number", "double"),
            Self::String => ("string", "string"),
            Self::Email => ("string", "email"),
            Self::Url => ("string", "url"),
            Self::Slug => ("string", "slug"),
            Self::Uuid => ("string", "uuid"),
            Self::Date => ("string", "date"),
            Self::Datetime => ("string", "date-time"),
            Self::Time => ("string", "time"),
            Self::File | Self::Image => ("string", "binary"),
            Self::Choice => ("choice", "choice"),
            Self::MultipleChoice => ("multiple choice", "multiple choice"),
            Self::Hidden => ("hidden", "hidden"),
            Self::List => ("array", "array"),
            Self::Nested => ("object", "object"),
            Self::Custom {
                data_type,
                data_format,
            } => return DataType::new(data_type.clone(), data_format.clone()),
        };
        DataType::new(t, f)
    }
}

/// Infer the `(type, format)` pair of a literal value.
pub fn primitive_type(value: &Value) -> DataType {
    match value {
        Value::Bool(_) => DataType::new("boolean", "boolean"),
        Value::Number(n) if n.is_f64() => DataType::new("number", "float"),
        Value::Number(_) => DataType::new("integer", "int32"),
        _ => DataType::string(),
    }
}

/// A finite set of literal values a field accepts.
#[derive(Debug, Clone, PartialEq)]
pub enum Choices {
    /// Ordered `(value, label)` pairs.
    Pairs(Vec<(Value, String)>),
    /// A mapping of value to label, in declaration order.
    Mapping(Vec<(Value, String)>),
}

impl Choices {
    /// The literal values, in declaration order.
    pub fn keys(&self) -> Vec<Value> {
        match self {
            Self::Pairs(pairs) | Self::Mapping(pairs) => {
                pairs.iter().map(|(value, _)| value.clone()).collect()
            }
        }
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Pairs(pairs) | Self::Mapping(pairs) => pairs.is_empty(),
        }
    }
}

/// What an array field holds.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayItem {
    /// A list of nested shapes.
    Object(SchemaObject),
    /// A list of plain values described by a child field.
    Field(Box<FieldDescriptor>),
}

/// Explicit replacement for runtime "is this a serializer" checks.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Nested {
    /// A plain field.
    #[default]
    None,
    /// A single nested shape.
    Object(SchemaObject),
    /// An array of shapes or of plain values.
    ArrayOf(ArrayItem),
}

impl Nested {
    /// The schema object reachable through this relation, if any.
    pub fn schema_object(&self) -> Option<&SchemaObject> {
        match self {
            Self::Object(schema) | Self::ArrayOf(ArrayItem::Object(schema)) => Some(schema),
            Self::ArrayOf(ArrayItem::Field(child)) => child.nested.schema_object(),
            Self::None => None,
        }
    }
}

/// One attribute of a schema object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDescriptor {
    pub name: String,
    /// Declared primitive kind; `None` publishes as a plain string.
    pub kind: Option<FieldKind>,
    /// Explicit required marker; absent means required.
    pub required: Option<bool>,
    pub read_only: bool,
    pub write_only: bool,
    /// Help text. `Some("")` hides the field, `None` does not.
    pub help_text: Option<String>,
    pub choices: Option<Choices>,
    pub min_value: Option<Number>,
    pub max_value: Option<Number>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub default: Option<Value>,
    pub nested: Nested,
}

impl FieldDescriptor {
    /// A field of the given kind with every optional attribute absent.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// A field with no declared kind.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A single nested shape.
    pub fn nested(name: impl Into<String>, schema: SchemaObject) -> Self {
        Self {
            nested: Nested::Object(schema),
            ..Self::new(name, FieldKind::Nested)
        }
    }

    /// An array of nested shapes.
    pub fn many(name: impl Into<String>, schema: SchemaObject) -> Self {
        Self {
            nested: Nested::ArrayOf(ArrayItem::Object(schema)),
            ..Self::new(name, FieldKind::List)
        }
    }

    /// An array of plain values described by `child`.
    pub fn list_of(name: impl Into<String>, child: FieldDescriptor) -> Self {
        Self {
            nested: Nested::ArrayOf(ArrayItem::Field(Box::new(child))),
            ..Self::new(name, FieldKind::List)
        }
    }

    /// Mark the field read-only. A read-only field is not required unless
    /// a required marker was set explicitly.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        if self.required.is_none() {
            self.required = Some(false);
        }
        self
    }

    /// Mark the field write-only.
    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    /// Set the required marker.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Attach help text.
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = Some(text.into());
        self
    }

    /// Attach a choice set.
    pub fn choices(mut self, choices: Choices) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Attach numeric bounds.
    pub fn bounds(mut self, min: Option<Number>, max: Option<Number>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    /// Attach length bounds.
    pub fn lengths(mut self, min: Option<u64>, max: Option<u64>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Attach a default value.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Effective required flag.
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(true)
    }

    /// Published `(type, format)` pair of the declared kind.
    pub fn data_type(&self) -> DataType {
        self.kind
            .as_ref()
            .map(FieldKind::data_type)
            .unwrap_or_else(DataType::string)
    }
}
