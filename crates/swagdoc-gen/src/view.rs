//! # Handler Variants
//!
//! Resolves an endpoint's handler into the introspection path matching its
//! variant, then yields one [`MethodIntrospector`] per HTTP method.
//!
//! | Variant | Methods come from |
//! |---|---|
//! | function view | [`Introspection::allowed_methods`] |
//! | class view | [`Introspection::allowed_methods`] |
//! | viewset | [`Introspection::viewset_routes`] of every endpoint sharing the handler and path |
//!
//! A viewset is usually mounted twice per path prefix (collection and
//! detail routes); each mount carries its own verb→action map. Routes for
//! the same path are merged, the first binding of a verb wins. Mounts at
//! other paths are separate routes and keep their own verbs.

use swagdoc_core::{
    EndpointDescriptor, HandlerKind, Introspection, IntrospectionResult, MethodIntrospector,
    MethodTarget, Principal, ViewSetRoute,
};

/// One documented method of an endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodBinding {
    /// Lower-cased HTTP method.
    pub method: String,
    /// Viewset action, if the handler is a viewset.
    pub action: Option<String>,
}

/// An endpoint resolved to its handler variant.
#[derive(Debug, Clone)]
pub enum ViewIntrospector<'e> {
    Function {
        endpoint: &'e EndpointDescriptor,
        methods: Vec<String>,
    },
    Class {
        endpoint: &'e EndpointDescriptor,
        methods: Vec<String>,
    },
    ViewSet {
        endpoint: &'e EndpointDescriptor,
        routes: Vec<ViewSetRoute>,
    },
}

impl<'e> ViewIntrospector<'e> {
    /// Resolve `endpoint`. `all` is the full endpoint list of the pass.
    pub fn resolve<I: Introspection + ?Sized>(
        introspection: &I,
        endpoint: &'e EndpointDescriptor,
        all: &[EndpointDescriptor],
    ) -> IntrospectionResult<Self> {
        let resolved = match endpoint.handler.kind() {
            HandlerKind::FunctionView => Self::Function {
                endpoint,
                methods: introspection.allowed_methods(endpoint)?,
            },
            HandlerKind::ClassView => Self::Class {
                endpoint,
                methods: introspection.allowed_methods(endpoint)?,
            },
            HandlerKind::ViewSet => {
                let mut routes: Vec<ViewSetRoute> = Vec::new();
                let siblings = all
                    .iter()
                    .filter(|other| other.handler == endpoint.handler && other.path == endpoint.path);
                // The endpoint itself first, then siblings in declaration order.
                for mount in std::iter::once(endpoint).chain(siblings.filter(|o| *o != endpoint)) {
                    for route in introspection.viewset_routes(mount)? {
                        let method = route.method.to_ascii_lowercase();
                        if !routes.iter().any(|r| r.method == method) {
                            routes.push(ViewSetRoute::new(method, route.action));
                        }
                    }
                }
                Self::ViewSet { endpoint, routes }
            }
        };
        tracing::debug!(
            path = %endpoint.path,
            handler = %endpoint.handler.qualified_name(),
            kind = %endpoint.handler.kind(),
            methods = resolved.methods().len(),
            "resolved handler"
        );
        Ok(resolved)
    }

    pub fn endpoint(&self) -> &'e EndpointDescriptor {
        match self {
            Self::Function { endpoint, .. }
            | Self::Class { endpoint, .. }
            | Self::ViewSet { endpoint, .. } => endpoint,
        }
    }

    /// The documented methods, in declaration order.
    pub fn methods(&self) -> Vec<MethodBinding> {
        match self {
            Self::Function { methods, .. } | Self::Class { methods, .. } => methods
                .iter()
                .map(|m| MethodBinding {
                    method: m.to_ascii_lowercase(),
                    action: None,
                })
                .collect(),
            Self::ViewSet { routes, .. } => routes
                .iter()
                .map(|r| MethodBinding {
                    method: r.method.clone(),
                    action: Some(r.action.clone()),
                })
                .collect(),
        }
    }

    /// Build one introspector per method. A method the collaborator cannot
    /// describe is logged and skipped.
    pub fn method_introspectors<'a, I: Introspection + ?Sized>(
        &self,
        introspection: &'a I,
        principal: &Principal,
    ) -> Vec<Box<dyn MethodIntrospector + 'a>> {
        let endpoint = self.endpoint();
        self.methods()
            .iter()
            .filter_map(|binding| {
                let target = MethodTarget {
                    endpoint,
                    method: &binding.method,
                    action: binding.action.as_deref(),
                    principal,
                };
                match introspection.method_introspector(&target) {
                    Ok(method) => Some(method),
                    Err(e) => {
                        tracing::warn!(
                            path = %endpoint.path,
                            method = %binding.method,
                            "skipping method: {e}"
                        );
                        None
                    }
                }
            })
            .collect()
    }
}
