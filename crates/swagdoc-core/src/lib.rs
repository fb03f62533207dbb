//! # swagdoc-core — Foundational Types for swagdoc
//!
//! This crate is the leaf of the swagdoc workspace. It defines the inputs of
//! a generation pass, the published document model, and the capability
//! traits through which the generator questions the introspection layer.
//!
//! ## Key Design Principles
//!
//! 1. **Schema objects are identities.** A [`SchemaObject`] is a
//!    `(module, name)` pair usable as a set/map key. Its fields are fetched
//!    on demand through [`Introspection::schema_fields`].
//!
//! 2. **No runtime type probing.** Nested shapes are expressed by the
//!    explicit [`Nested`] union; handler variants by [`HandlerKind`], decided
//!    once by a pure classification over handler metadata.
//!
//! 3. **Serde all the way out.** Every published type derives `Serialize`
//!    and skips absent keys, so the document only carries derived facts.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `swagdoc-*` crates.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod document;
pub mod endpoint;
pub mod error;
pub mod field;
pub mod introspect;
pub mod naming;

// Re-export primary types for ergonomic imports.
pub use document::{
    definition_ref, Contact, Definition, Document, ExplicitModel, Info, License, ModelDefinition,
    Operation, Parameter, ParameterLocation, Paths, Properties, Reference, ResponseSchema,
    ResponseSpec, SchemaFragment,
};
pub use endpoint::{is_options_probe, EndpointDescriptor, HandlerKind, HandlerRef, Principal};
pub use error::{IntrospectionError, IntrospectionResult, SwagdocError};
pub use field::{
    primitive_type, ArrayItem, Choices, DataType, FieldDescriptor, FieldKind, Nested,
    SchemaObject,
};
pub use introspect::{
    DeclaredSchema, DocParser, Introspection, MethodIntrospector, MethodTarget, ResponseDecl,
    ViewSetRoute,
};
