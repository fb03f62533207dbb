//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by every swagdoc crate. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Collaborator failures (`IntrospectionError`) are recoverable: the
//!   generator logs them and keeps going with the rest of the document.
//! - Configuration failures are fatal at load time and never surface
//!   during generation.

use thiserror::Error;

/// Top-level error type for swagdoc.
#[derive(Error, Debug)]
pub enum SwagdocError {
    /// The introspection layer could not answer a question about a handler
    /// or schema object.
    #[error("introspection error: {0}")]
    Introspection(#[from] IntrospectionError),

    /// Configuration was rejected at load or reload time.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the introspection (collaborator) layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectionError {
    /// A schema object referenced by name could not be found.
    #[error("unknown schema object '{name}' referenced from handler '{handler}'")]
    UnknownSchemaObject {
        /// The name as written in the documentation metadata.
        name: String,
        /// Handler whose metadata carried the reference.
        handler: String,
    },

    /// An endpoint refers to a handler the layer knows nothing about.
    #[error("unknown handler '{0}'")]
    UnknownHandler(String),

    /// The fields of a schema object could not be enumerated.
    #[error("cannot enumerate fields of schema object '{schema}': {reason}")]
    Fields {
        /// Declared name of the schema object.
        schema: String,
        /// Reason given by the collaborator.
        reason: String,
    },

    /// The supported methods of a handler could not be resolved.
    #[error("cannot resolve methods of handler '{handler}': {reason}")]
    Methods {
        /// Handler name.
        handler: String,
        /// Reason given by the collaborator.
        reason: String,
    },
}

/// Convenience alias for results carrying an [`IntrospectionError`].
pub type IntrospectionResult<T> = Result<T, IntrospectionError>;
