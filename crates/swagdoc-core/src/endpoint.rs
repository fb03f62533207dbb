//! # Endpoints, Handlers and Principals
//!
//! The immutable input of a generation pass: one [`EndpointDescriptor`] per
//! registered route, each pointing at the [`HandlerRef`] that serves it.
//! A route may appear several times when a viewset is mounted under more
//! than one pattern.
//!
//! Handlers come in three variants. The variant is decided once, by the
//! pure classification in [`HandlerRef::kind`], and drives which
//! introspection path the generator takes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The method every handler answers implicitly; never documented.
pub const OPTIONS_METHOD: &str = "options";

/// Variant of a request handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandlerKind {
    /// A plain function wrapped into a view.
    FunctionView,
    /// A class-based view with one handler method per HTTP verb.
    ClassView,
    /// A viewset whose actions are bound to verbs per route.
    #[serde(rename = "viewset")]
    ViewSet,
}

impl HandlerKind {
    /// Canonical string name of the variant.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FunctionView => "function_view",
            Self::ClassView => "class_view",
            Self::ViewSet => "viewset",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to the code object serving an endpoint.
///
/// Two references denote the same handler iff module and name match; the
/// classification flags are metadata, not identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandlerRef {
    /// Declared name (e.g. `WidgetViewSet`).
    pub name: String,
    /// Module the handler is declared in.
    pub module: String,
    /// The handler was produced by wrapping a plain function.
    #[serde(default)]
    pub function_based: bool,
    /// The handler derives from the viewset machinery.
    #[serde(default)]
    pub viewset: bool,
}

impl HandlerRef {
    /// A class-based view reference.
    pub fn class_view(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: module.into(),
            function_based: false,
            viewset: false,
        }
    }

    /// A function-based view reference.
    pub fn function_view(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            function_based: true,
            ..Self::class_view(module, name)
        }
    }

    /// A viewset reference.
    pub fn viewset(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            viewset: true,
            ..Self::class_view(module, name)
        }
    }

    /// Classify the handler. Function wrapping wins over viewset ancestry.
    pub fn kind(&self) -> HandlerKind {
        if self.function_based {
            HandlerKind::FunctionView
        } else if self.viewset {
            HandlerKind::ViewSet
        } else {
            HandlerKind::ClassView
        }
    }

    /// Fully qualified `module.Name` form.
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

impl PartialEq for HandlerRef {
    fn eq(&self, other: &Self) -> bool {
        self.module == other.module && self.name == other.name
    }
}

impl Eq for HandlerRef {}

impl std::hash::Hash for HandlerRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.module.hash(state);
        self.name.hash(state);
    }
}

/// One registered route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Documented path (e.g. `/widgets/{pk}`).
    pub path: String,
    /// Routing pattern as registered; opaque to the generator.
    pub pattern: String,
    /// Handler serving the route.
    pub handler: HandlerRef,
}

impl EndpointDescriptor {
    /// Build a descriptor.
    pub fn new(path: impl Into<String>, pattern: impl Into<String>, handler: HandlerRef) -> Self {
        Self {
            path: path.into(),
            pattern: pattern.into(),
            handler,
        }
    }
}

/// Whether `method` is the implicit `OPTIONS` probe (any casing).
pub fn is_options_probe(method: &str) -> bool {
    method.eq_ignore_ascii_case(OPTIONS_METHOD)
}

/// The caller a document is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Display name of the caller.
    pub name: String,
    /// The caller presented valid credentials.
    pub authenticated: bool,
    /// The caller holds superuser rights.
    pub superuser: bool,
}

impl Principal {
    /// An unauthenticated caller.
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authenticated: false,
            superuser: false,
        }
    }

    /// An authenticated, non-superuser caller.
    pub fn authenticated(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            authenticated: true,
            superuser: false,
        }
    }

    /// An authenticated superuser.
    pub fn superuser(name: impl Into<String>) -> Self {
        Self {
            superuser: true,
            ..Self::authenticated(name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_prefers_function_wrapping() {
        let mut handler = HandlerRef::viewset("app.views", "WidgetViewSet");
        assert_eq!(handler.kind(), HandlerKind::ViewSet);
        handler.function_based = true;
        assert_eq!(handler.kind(), HandlerKind::FunctionView);
        assert_eq!(
            HandlerRef::class_view("app.views", "WidgetList").kind(),
            HandlerKind::ClassView
        );
    }

    #[test]
    fn handler_identity_ignores_flags() {
        let a = HandlerRef::class_view("app.views", "Widget");
        let b = HandlerRef::viewset("app.views", "Widget");
        let c = HandlerRef::class_view("other.views", "Widget");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn options_probe_is_case_insensitive() {
        assert!(is_options_probe("OPTIONS"));
        assert!(is_options_probe("options"));
        assert!(!is_options_probe("get"));
    }

    #[test]
    fn qualified_name_skips_empty_module() {
        assert_eq!(HandlerRef::class_view("", "Ping").qualified_name(), "Ping");
        assert_eq!(
            HandlerRef::class_view("app.views", "Ping").qualified_name(),
            "app.views.Ping"
        );
    }
}
