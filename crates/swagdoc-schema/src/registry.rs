//! # Schema-Object Registry
//!
//! Discovers every schema object reachable from the documented operations
//! and compiles each one into a named model definition.
//!
//! ## Discovery
//!
//! [`SchemaSet`] gathers the roots: request shapes, response shapes
//! (declared directly or named in response metadata), out-of-band extras,
//! and explicitly registered objects. [`SchemaRegistry::discover`] then
//! walks nested fields transitively. The walk carries an explicit visited
//! set scoped to one call, so cyclic graphs terminate and every object is
//! reported once.
//!
//! ## Compilation
//!
//! Each discovered object's fields are compiled through
//! [`compile_field`](crate::compile::compile_field). The published model is
//! the read variant: write-only properties are removed. A `Write`-prefixed
//! variant (read-only properties removed) is published for objects that
//! are nested through a write-only field, or for every object under
//! [`WriteVariants::All`].
//!
//! A schema object whose fields cannot be enumerated publishes an empty
//! model; it never prevents the others from compiling.

use std::collections::{BTreeMap, BTreeSet};

use swagdoc_core::naming::write_model_name;
use swagdoc_core::{
    ArrayItem, DeclaredSchema, Definition, FieldDescriptor, Introspection, MethodIntrospector,
    ModelDefinition, Nested, Properties, SchemaObject,
};

use crate::compile::compile_field;

/// Which `Write` variants the registry publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteVariants {
    /// Only for objects nested through a write-only field.
    #[default]
    Referenced,
    /// For every discovered object.
    All,
    /// Never.
    Never,
}

/// Registry options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryOptions {
    pub write_variants: WriteVariants,
}

// ─── Roots ──────────────────────────────────────────────────────────

/// The response schema object a method publishes, unless its metadata
/// declares a custom response type or asks for the object to be omitted.
pub fn response_schema_object(method: &dyn MethodIntrospector) -> Option<SchemaObject> {
    let parser = method.doc_parser();
    if parser.response_type().is_some() || parser.should_omit_schema_object() {
        return None;
    }
    method.response_schema_object()
}

/// Root schema objects of one generation pass.
#[derive(Debug, Clone, Default)]
pub struct SchemaSet {
    roots: BTreeSet<SchemaObject>,
}

impl SchemaSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an explicitly registered schema object.
    pub fn insert(&mut self, schema: SchemaObject) -> bool {
        self.roots.insert(schema)
    }

    /// Collect the schema objects one method refers to.
    pub fn collect_method(&mut self, method: &dyn MethodIntrospector) {
        if let Some(request) = method.request_schema_object() {
            self.roots.insert(request);
        }
        if let Some(response) = response_schema_object(method) {
            self.roots.insert(response);
        }
        self.roots.extend(method.extra_schema_objects());

        let parser = method.doc_parser();
        for response in parser.responses(method.handler()) {
            let Some(DeclaredSchema::Named(name)) = response.schema else {
                continue;
            };
            match parser.load_schema_object_by_name(&name, method.handler()) {
                Ok(schema) => {
                    self.roots.insert(schema);
                }
                Err(e) => tracing::warn!(
                    handler = %method.handler().qualified_name(),
                    code = %response.code,
                    "skipping response schema during discovery: {e}"
                ),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchemaObject> {
        self.roots.iter()
    }
}

impl Extend<SchemaObject> for SchemaSet {
    fn extend<T: IntoIterator<Item = SchemaObject>>(&mut self, iter: T) {
        self.roots.extend(iter);
    }
}

// ─── Discovery result ───────────────────────────────────────────────

/// Every schema object reachable from a [`SchemaSet`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovered {
    /// All reachable objects, roots included.
    pub objects: BTreeSet<SchemaObject>,
    /// Objects nested through at least one write-only field.
    pub write_referenced: BTreeSet<SchemaObject>,
}

// ─── Compiled schema ────────────────────────────────────────────────

/// All compiled properties of one schema object, before visibility
/// filtering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledSchema {
    pub properties: Properties,
    /// Names of required fields, published or not.
    pub required: Vec<String>,
    pub read_only: BTreeSet<String>,
    pub write_only: BTreeSet<String>,
}

impl CompiledSchema {
    /// Compile a field list.
    pub fn from_fields(fields: &[FieldDescriptor]) -> Self {
        let mut compiled = Self::default();
        for field in fields {
            if field.write_only {
                compiled.write_only.insert(field.name.clone());
            }
            if field.read_only {
                compiled.read_only.insert(field.name.clone());
            }
            if field.is_required() {
                compiled.required.push(field.name.clone());
            }
            if let Some(fragment) = compile_field(field) {
                compiled.properties.insert(field.name.clone(), fragment);
            }
        }
        compiled
    }

    /// The response-oriented model: no write-only properties.
    pub fn read_model(&self) -> ModelDefinition {
        self.filtered(&self.write_only)
    }

    /// The request-oriented model: no read-only properties.
    pub fn write_model(&self) -> ModelDefinition {
        self.filtered(&self.read_only)
    }

    fn filtered(&self, excluded: &BTreeSet<String>) -> ModelDefinition {
        let properties: Properties = self
            .properties
            .iter()
            .filter(|(name, _)| !excluded.contains(*name))
            .map(|(name, fragment)| (name.to_string(), fragment.clone()))
            .collect();
        let required = self
            .required
            .iter()
            .filter(|name| properties.contains_key(name))
            .cloned()
            .collect();
        ModelDefinition::object(properties, required)
    }
}

/// The object a list item points at through a write-only nested child,
/// at any list depth.
fn write_only_item(nested: &Nested) -> Option<&SchemaObject> {
    let Nested::ArrayOf(ArrayItem::Field(child)) = nested else {
        return None;
    };
    match &child.nested {
        Nested::Object(schema) if child.write_only => Some(schema),
        inner => write_only_item(inner),
    }
}

// ─── Registry ───────────────────────────────────────────────────────

/// Builds the `definitions` map of a document.
pub struct SchemaRegistry<'a, I: Introspection + ?Sized> {
    introspection: &'a I,
    options: RegistryOptions,
}

impl<'a, I: Introspection + ?Sized> SchemaRegistry<'a, I> {
    pub fn new(introspection: &'a I) -> Self {
        Self::with_options(introspection, RegistryOptions::default())
    }

    pub fn with_options(introspection: &'a I, options: RegistryOptions) -> Self {
        Self {
            introspection,
            options,
        }
    }

    /// Fields of a schema object; a collaborator failure yields none.
    fn fields(&self, schema: &SchemaObject) -> Vec<FieldDescriptor> {
        self.introspection.schema_fields(schema).unwrap_or_else(|e| {
            tracing::warn!(schema = %schema, "publishing empty model: {e}");
            Vec::new()
        })
    }

    /// Walk nested fields from `roots` until no new object appears.
    pub fn discover<'r>(&self, roots: impl IntoIterator<Item = &'r SchemaObject>) -> Discovered {
        let mut discovered = Discovered::default();
        let mut visited: BTreeSet<SchemaObject> = BTreeSet::new();
        let mut pending: Vec<SchemaObject> = roots.into_iter().cloned().collect();

        while let Some(schema) = pending.pop() {
            if !visited.insert(schema.clone()) {
                continue;
            }
            discovered.objects.insert(schema.clone());

            for field in self.fields(&schema) {
                let Some(nested) = field.nested.schema_object() else {
                    continue;
                };
                if field.write_only && matches!(field.nested, Nested::Object(_)) {
                    discovered.write_referenced.insert(nested.clone());
                }
                if let Some(item) = write_only_item(&field.nested) {
                    discovered.write_referenced.insert(item.clone());
                }
                discovered.objects.insert(nested.clone());
                if !visited.contains(nested) {
                    pending.push(nested.clone());
                }
            }
        }

        tracing::debug!(
            objects = discovered.objects.len(),
            write_referenced = discovered.write_referenced.len(),
            "schema discovery finished"
        );
        discovered
    }

    /// Compile one schema object.
    pub fn compile(&self, schema: &SchemaObject) -> CompiledSchema {
        CompiledSchema::from_fields(&self.fields(schema))
    }

    /// Compile every object reachable from `roots`, then overlay the
    /// explicit models (which win on name collisions).
    pub fn definitions(
        &self,
        roots: &SchemaSet,
        explicit: &BTreeMap<String, Definition>,
    ) -> BTreeMap<String, Definition> {
        let discovered = self.discover(roots.iter());
        let mut definitions = BTreeMap::new();

        for schema in &discovered.objects {
            let compiled = self.compile(schema);
            let name = schema.model_name();
            let write = match self.options.write_variants {
                WriteVariants::All => true,
                WriteVariants::Referenced => discovered.write_referenced.contains(schema),
                WriteVariants::Never => false,
            };
            if write {
                definitions.insert(
                    write_model_name(name),
                    Definition::Model(compiled.write_model()),
                );
            }
            definitions.insert(name.to_string(), Definition::Model(compiled.read_model()));
        }

        definitions.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
        definitions
    }
}
