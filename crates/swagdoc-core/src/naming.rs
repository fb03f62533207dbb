//! # Name Derivation
//!
//! Deterministic naming rules shared by the generator and introspection
//! layers: write-variant model names, synthesized custom response type
//! names, and human-readable view names.

/// Generic handler-name suffixes stripped when naming custom response
/// types. Applied in this order, every occurrence.
const VIEW_SUFFIXES: &[&str] = &["ViewSet", "APIView", "View"];

/// Prefix of write-oriented model variants.
pub const WRITE_PREFIX: &str = "Write";

/// Name of the write-oriented variant of a model.
pub fn write_model_name(model_name: &str) -> String {
    format!("{WRITE_PREFIX}{model_name}")
}

/// Remove generic view suffixes from a handler name.
pub fn strip_view_suffixes(handler_name: &str) -> String {
    VIEW_SUFFIXES
        .iter()
        .fold(handler_name.to_string(), |name, suffix| name.replace(suffix, ""))
}

/// Title-case a method or action name and drop underscores:
/// `partial_update` → `PartialUpdate`, `get` → `Get`.
pub fn title_method(method_name: &str) -> String {
    let mut out = String::with_capacity(method_name.len());
    let mut in_word = false;
    for c in method_name.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            in_word = false;
            if c != '_' {
                out.push(c);
            }
        }
    }
    out
}

/// Model name of a custom response type declared on a handler method.
pub fn response_type_name(handler_name: &str, method_name: &str) -> String {
    format!(
        "{}{}Response",
        strip_view_suffixes(handler_name),
        title_method(method_name)
    )
}

/// Split a CamelCase identifier into space-separated words:
/// `WidgetList` → `Widget List`, `APIRoot` → `API Root`.
pub fn camelcase_to_spaces(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let after_lower = i > 0 && chars[i - 1].is_lowercase();
            let before_lower = chars.get(i + 1).is_some_and(|next| !next.is_uppercase());
            if after_lower || before_lower {
                out.push(' ');
            }
        }
        out.push(c);
    }
    out.trim_matches(|c| c == ' ' || c == '_').to_string()
}

/// Human-readable view name: trailing `View`/`ViewSet` removed, words split.
pub fn view_name(handler_name: &str) -> String {
    let trimmed = handler_name
        .strip_suffix("ViewSet")
        .or_else(|| handler_name.strip_suffix("View"))
        .unwrap_or(handler_name);
    camelcase_to_spaces(trimmed)
}

/// Default operation id: view name and title-cased method, joined by `_`.
pub fn default_nickname(handler_name: &str, method_name: &str) -> String {
    format!("{} {}", view_name(handler_name), title_method(method_name)).replace(' ', "_")
}
