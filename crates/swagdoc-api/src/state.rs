//! # Application State
//!
//! Shared state for the Axum application: the settings store, the
//! introspection layer, the routed endpoints, access hooks and the token
//! table used to identify callers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use swagdoc_core::{EndpointDescriptor, Introspection, Principal};
use swagdoc_gen::{AccessHooks, SettingsStore};

/// The introspection layer as shared across request handlers.
pub type SharedIntrospection = Arc<dyn Introspection + Send + Sync>;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<SettingsStore>,
    pub introspection: SharedIntrospection,
    pub endpoints: Arc<Vec<EndpointDescriptor>>,
    pub hooks: Arc<AccessHooks>,
    /// Token → caller. Requests without a known token are anonymous.
    pub credentials: Arc<HashMap<String, Principal>>,
}

impl AppState {
    pub fn new(
        settings: Arc<SettingsStore>,
        introspection: SharedIntrospection,
        endpoints: Vec<EndpointDescriptor>,
    ) -> Self {
        Self {
            settings,
            introspection,
            endpoints: Arc::new(endpoints),
            hooks: Arc::new(AccessHooks::default()),
            credentials: Arc::new(HashMap::new()),
        }
    }

    pub fn with_hooks(mut self, hooks: AccessHooks) -> Self {
        self.hooks = Arc::new(hooks);
        self
    }

    pub fn with_credentials(mut self, credentials: HashMap<String, Principal>) -> Self {
        self.credentials = Arc::new(credentials);
        self
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("settings", &self.settings)
            .field("endpoints", &self.endpoints.len())
            .field("hooks", &self.hooks)
            .field("credentials", &self.credentials.len())
            .finish()
    }
}
