//! # swagdoc-schema — Field Compilation & Model Registry
//!
//! The core of swagdoc: turning schema objects into published models.
//!
//! ## Field Compiler (`compile`)
//!
//! [`compile_field`] converts one field descriptor into a schema fragment
//! (type, format, constraints, nested reference) or omits it.
//!
//! ## Schema-Object Registry (`registry`)
//!
//! [`SchemaSet`] collects the schema objects operations refer to;
//! [`SchemaRegistry`] expands them transitively through nested fields,
//! compiles each one, applies read/write visibility, and merges explicitly
//! declared models on top.
//!
//! ## Crate Policy
//!
//! - Depends only on `swagdoc-core` internally.
//! - Never fails: collaborator errors degrade to empty models and are logged.

pub mod compile;
pub mod registry;

pub use compile::compile_field;
pub use registry::{
    response_schema_object, CompiledSchema, Discovered, RegistryOptions, SchemaRegistry,
    SchemaSet, WriteVariants,
};
