//! # swagdoc-manifest — YAML Manifest Introspection
//!
//! A concrete introspection layer for swagdoc. Schema objects, handlers and
//! endpoints are declared in a YAML manifest; per-method documentation
//! metadata lives in docstrings with an optional YAML block.
//!
//! ## Modules
//!
//! - **Model** (`model.rs`): manifest serde types, validation, field
//!   conversion and schema lookup by name.
//! - **Docstring** (`docstring.rs`): docstring splitting and the YAML
//!   documentation-metadata parser.
//! - **Introspection** (`introspection.rs`): the
//!   [`Introspection`](swagdoc_core::Introspection) implementation.
//! - **Error** (`error.rs`): load and validation errors.

pub mod docstring;
pub mod error;
pub mod introspection;
pub mod model;

pub use docstring::{split_docstring, DocMeta, Docstring, ParametersStrategy, ParsedDoc, YamlDocParser};
pub use error::{ManifestError, ManifestResult};
pub use introspection::{ManifestIntrospection, ManifestMethod};
pub use model::{
    ChoicesDecl, EndpointDecl, FieldDecl, HandlerDecl, Manifest, MethodDecl, SchemaDecl, SchemaIndex,
};
