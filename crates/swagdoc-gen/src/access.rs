//! # Access Control
//!
//! Decides whether a caller may read the documentation at all, and which
//! endpoints it may see.
//!
//! Settings only *name* hooks (`permission_denied_handler`,
//! `resource_access_handler`); the code that implements them is bound at
//! startup through an [`AccessHooks`] registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use swagdoc_core::{EndpointDescriptor, Principal};
use thiserror::Error;

use crate::settings::{SettingsError, SwaggerSettings};

/// Access to the documentation was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// The caller lacks the rights the settings require.
    #[error("permission denied for '{principal}': {reason}")]
    PermissionDenied { principal: String, reason: String },

    /// A permission-denied hook produced its own answer.
    #[error("{message}")]
    Handled { status: u16, message: String },
}

/// Produces the answer to a refused caller.
pub trait PermissionDeniedHook: Send + Sync {
    fn handle(&self, principal: &Principal, denial: AccessError) -> AccessError;
}

/// Decides per caller whether an endpoint is documented.
pub trait ResourceAccessHook: Send + Sync {
    fn allows(&self, principal: &Principal, endpoint: &EndpointDescriptor) -> bool;
}

/// Named hook implementations.
#[derive(Default, Clone)]
pub struct AccessHooks {
    permission_denied: HashMap<String, Arc<dyn PermissionDeniedHook>>,
    resource_access: HashMap<String, Arc<dyn ResourceAccessHook>>,
}

impl fmt::Debug for AccessHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessHooks")
            .field("permission_denied", &self.permission_denied.keys().collect::<Vec<_>>())
            .field("resource_access", &self.resource_access.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AccessHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_permission_denied(
        &mut self,
        name: impl Into<String>,
        hook: Arc<dyn PermissionDeniedHook>,
    ) -> &mut Self {
        self.permission_denied.insert(name.into(), hook);
        self
    }

    pub fn register_resource_access(
        &mut self,
        name: impl Into<String>,
        hook: Arc<dyn ResourceAccessHook>,
    ) -> &mut Self {
        self.resource_access.insert(name.into(), hook);
        self
    }

    /// Fail if the settings name a hook that is not registered.
    pub fn check_bindings(&self, settings: &SwaggerSettings) -> Result<(), SettingsError> {
        if let Some(name) = &settings.permission_denied_handler {
            if !self.permission_denied.contains_key(name) {
                return Err(SettingsError::UnboundHook {
                    setting: "permission_denied_handler",
                    name: name.clone(),
                });
            }
        }
        if let Some(name) = &settings.resource_access_handler {
            if !self.resource_access.contains_key(name) {
                return Err(SettingsError::UnboundHook {
                    setting: "resource_access_handler",
                    name: name.clone(),
                });
            }
        }
        Ok(())
    }

    fn permission_denied_hook(&self, settings: &SwaggerSettings) -> Option<&Arc<dyn PermissionDeniedHook>> {
        let name = settings.permission_denied_handler.as_ref()?;
        let hook = self.permission_denied.get(name);
        if hook.is_none() {
            tracing::warn!(hook = %name, "permission_denied_handler is not registered");
        }
        hook
    }

    fn resource_access_hook(&self, settings: &SwaggerSettings) -> Option<&Arc<dyn ResourceAccessHook>> {
        let name = settings.resource_access_handler.as_ref()?;
        let hook = self.resource_access.get(name);
        if hook.is_none() {
            tracing::warn!(hook = %name, "resource_access_handler is not registered");
        }
        hook
    }
}

/// Check the caller against `is_authenticated` and `is_superuser`.
pub fn check_permission(
    settings: &SwaggerSettings,
    hooks: &AccessHooks,
    principal: &Principal,
) -> Result<(), AccessError> {
    let reason = if settings.is_authenticated && !principal.authenticated {
        "authentication required"
    } else if settings.is_superuser && !principal.superuser {
        "superuser required"
    } else {
        return Ok(());
    };

    tracing::debug!(principal = %principal.name, reason, "documentation access denied");
    let denial = AccessError::PermissionDenied {
        principal: principal.name.clone(),
        reason: reason.to_string(),
    };
    Err(match hooks.permission_denied_hook(settings) {
        Some(hook) => hook.handle(principal, denial),
        None => denial,
    })
}

/// The endpoints `principal` may see.
pub fn visible_endpoints(
    settings: &SwaggerSettings,
    hooks: &AccessHooks,
    principal: &Principal,
    endpoints: &[EndpointDescriptor],
) -> Vec<EndpointDescriptor> {
    match hooks.resource_access_hook(settings) {
        Some(hook) => endpoints
            .iter()
            .filter(|endpoint| hook.allows(principal, endpoint))
            .cloned()
            .collect(),
        None => endpoints.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swagdoc_core::HandlerRef;

    struct Redirect;

    impl PermissionDeniedHook for Redirect {
        fn handle(&self, _: &Principal, _: AccessError) -> AccessError {
            AccessError::Handled {
                status: 302,
                message: "login first".into(),
            }
        }
    }

    struct HideAdmin;

    impl ResourceAccessHook for HideAdmin {
        fn allows(&self, principal: &Principal, endpoint: &EndpointDescriptor) -> bool {
            principal.superuser || !endpoint.path.starts_with("/admin")
        }
    }

    fn endpoints() -> Vec<EndpointDescriptor> {
        vec![
            EndpointDescriptor::new("/widgets", "^widgets/$", HandlerRef::class_view("app", "Widgets")),
            EndpointDescriptor::new("/admin/users", "^admin/users/$", HandlerRef::class_view("app", "Users")),
        ]
    }

    #[test]
    fn open_settings_admit_anonymous() {
        let settings = SwaggerSettings::default();
        assert!(check_permission(&settings, &AccessHooks::new(), &Principal::anonymous("anon")).is_ok());
    }

    #[test]
    fn authentication_and_superuser_requirements() {
        let hooks = AccessHooks::new();
        let settings = SwaggerSettings {
            is_authenticated: true,
            ..SwaggerSettings::default()
        };
        assert!(matches!(
            check_permission(&settings, &hooks, &Principal::anonymous("anon")),
            Err(AccessError::PermissionDenied { .. })
        ));
        assert!(check_permission(&settings, &hooks, &Principal::authenticated("ann")).is_ok());

        let settings = SwaggerSettings {
            is_superuser: true,
            ..SwaggerSettings::default()
        };
        assert!(check_permission(&settings, &hooks, &Principal::authenticated("ann")).is_err());
        assert!(check_permission(&settings, &hooks, &Principal::superuser("root")).is_ok());
    }

    #[test]
    fn denial_goes_through_bound_hook() {
        let mut hooks = AccessHooks::new();
        hooks.register_permission_denied("redirect", Arc::new(Redirect));
        let settings = SwaggerSettings {
            is_authenticated: true,
            permission_denied_handler: Some("redirect".into()),
            ..SwaggerSettings::default()
        };
        let err = check_permission(&settings, &hooks, &Principal::anonymous("anon")).unwrap_err();
        assert_eq!(
            err,
            AccessError::Handled {
                status: 302,
                message: "login first".into()
            }
        );
    }

    #[test]
    fn resource_hook_filters_endpoints() {
        let mut hooks = AccessHooks::new();
        hooks.register_resource_access("hide_admin", Arc::new(HideAdmin));
        let settings = SwaggerSettings {
            resource_access_handler: Some("hide_admin".into()),
            ..SwaggerSettings::default()
        };
        let all = endpoints();
        let visible = visible_endpoints(&settings, &hooks, &Principal::authenticated("ann"), &all);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].path, "/widgets");
        let visible = visible_endpoints(&settings, &hooks, &Principal::superuser("root"), &all);
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn unregistered_hook_names_are_reported() {
        let settings = SwaggerSettings {
            resource_access_handler: Some("missing".into()),
            ..SwaggerSettings::default()
        };
        let hooks = AccessHooks::new();
        assert!(matches!(
            hooks.check_bindings(&settings),
            Err(SettingsError::UnboundHook { setting: "resource_access_handler", .. })
        ));
        // Unbound at generation time means unfiltered.
        assert_eq!(
            visible_endpoints(&settings, &hooks, &Principal::anonymous("a"), &endpoints()).len(),
            2
        );
    }
}
