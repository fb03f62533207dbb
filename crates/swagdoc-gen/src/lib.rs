//! # swagdoc-gen — Document Generation
//!
//! Turns a list of endpoint descriptors into a Swagger document, asking an
//! [`Introspection`](swagdoc_core::Introspection) implementation for every
//! fact about handlers and schema objects.
//!
//! ## Modules
//!
//! - **Settings** (`settings.rs`): load, validate and reload the
//!   process-wide configuration; UI configuration payload.
//! - **Access** (`access.rs`): permission checks and per-caller endpoint
//!   filtering through named hooks.
//! - **View** (`view.rs`): handler variant resolution and per-method
//!   introspector enumeration.
//! - **Operation** (`operation.rs`): the operation compiler and the
//!   per-pass generation scope.
//! - **Generator** (`generator.rs`): the document assembler.
//! - **Listing** (`listing.rs`): the Swagger 1.2 resource listing and API
//!   declarations.
//!
//! ## Failure policy
//!
//! Nothing that goes wrong for one endpoint, method, response or schema
//! object aborts the pass. Collaborator failures are logged through
//! `tracing` and the affected piece is skipped or published empty.

pub mod access;
pub mod generator;
pub mod listing;
pub mod operation;
pub mod settings;
pub mod view;

pub use access::{
    check_permission, visible_endpoints, AccessError, AccessHooks, PermissionDeniedHook,
    ResourceAccessHook,
};
pub use generator::DocumentGenerator;
pub use listing::{ApiDeclaration, ResourceListing};
pub use operation::{compile_operation, GenerationScope};
pub use settings::{
    DocExpansion, SettingsError, SettingsStore, SwaggerSettings, SwaggerVersion, UiConfig,
};
pub use view::{MethodBinding, ViewIntrospector};
