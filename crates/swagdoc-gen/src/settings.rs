//! # Swagger Settings
//!
//! Process-wide configuration of the generator and its publishing surface.
//!
//! Settings are loaded from YAML (or JSON, which YAML subsumes) with every
//! key optional; absent keys take their documented defaults. Validation
//! happens once, at load or reload time, and never during generation:
//!
//! - `swagger_version` must be `1.2` or `2.0`.
//! - When an `info` object is present, Swagger 1.2 requires `title` and
//!   `description`; Swagger 2.0 requires `title` and `version` and rejects
//!   an explicitly supplied `api_version`.
//!
//! ## Lifecycle
//!
//! [`SettingsStore`] owns the current value as an `Arc<SwaggerSettings>`.
//! Each generation takes a [`SettingsStore::snapshot`] and works against that
//! immutable value; [`SettingsStore::reload`] validates a candidate and swaps
//! it in for subsequent generations only. A rejected reload leaves the
//! previous settings in place.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use swagdoc_core::Info;
use thiserror::Error;

/// Methods the UI offers to submit when none are configured.
pub const DEFAULT_ENABLED_METHODS: &[&str] = &["get", "post", "put", "patch", "delete"];

// ─── Errors ─────────────────────────────────────────────────────────

/// A configuration was rejected.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// `swagger_version` is not a supported version.
    #[error("'swagger_version' should be '1.2' or '2.0', got '{0}'")]
    InvalidVersion(String),

    /// A key the selected version requires in `info` is absent.
    #[error("missing key '{key}' for field 'info' (required by Swagger {version})")]
    MissingInfoKey {
        key: &'static str,
        version: SwaggerVersion,
    },

    /// A key the selected version forbids is present.
    #[error("extra field '{key}' for Swagger {version}")]
    ForbiddenKey {
        key: &'static str,
        version: SwaggerVersion,
    },

    /// `doc_expansion` is not one of `none`, `list`, `full`.
    #[error("'doc_expansion' should be 'none', 'list' or 'full', got '{0}'")]
    InvalidDocExpansion(String),

    /// A hook name in the settings is not bound in code.
    #[error("{setting} names hook '{name}', which is not registered")]
    UnboundHook { setting: &'static str, name: String },

    /// The settings document could not be parsed.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ─── Enumerations ───────────────────────────────────────────────────

/// Supported Swagger versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwaggerVersion {
    #[default]
    V1_2,
    V2_0,
}

impl SwaggerVersion {
    /// Version string as published in documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V1_2 => "1.2",
            Self::V2_0 => "2.0",
        }
    }
}

impl fmt::Display for SwaggerVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwaggerVersion {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.2" => Ok(Self::V1_2),
            "2.0" => Ok(Self::V2_0),
            other => Err(SettingsError::InvalidVersion(other.to_string())),
        }
    }
}

impl Serialize for SwaggerVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Initial expansion state of the UI's operation list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocExpansion {
    #[default]
    None,
    List,
    Full,
}

impl FromStr for DocExpansion {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "list" => Ok(Self::List),
            "full" => Ok(Self::Full),
            other => Err(SettingsError::InvalidDocExpansion(other.to_string())),
        }
    }
}

// ─── Settings ───────────────────────────────────────────────────────

/// The on-disk form: every key optional, versions still raw strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    swagger_version: Option<String>,
    api_version: Option<String>,
    api_path: Option<String>,
    api_key: Option<String>,
    relative_paths: Option<bool>,
    token_type: Option<String>,
    enabled_methods: Option<Vec<String>>,
    is_authenticated: Option<bool>,
    is_superuser: Option<bool>,
    unauthenticated_user: Option<String>,
    permission_denied_handler: Option<String>,
    resource_access_handler: Option<String>,
    template_path: Option<String>,
    doc_expansion: Option<String>,
    info: Option<Info>,
}

/// Validated generator settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwaggerSettings {
    pub swagger_version: SwaggerVersion,
    /// Explicitly configured API version; `None` publishes an empty string.
    pub api_version: Option<String>,
    /// Published `basePath`.
    pub api_path: String,
    /// API key pre-filled in the UI.
    pub api_key: String,
    /// Publish a relative document (no `host`).
    pub relative_paths: bool,
    /// Scheme prefix of the `Authorization` header.
    pub token_type: String,
    /// Methods the UI may submit.
    pub enabled_methods: Vec<String>,
    /// Only authenticated callers may read the documentation.
    pub is_authenticated: bool,
    /// Only superusers may read the documentation.
    pub is_superuser: bool,
    /// Name of the principal used when no caller is supplied.
    pub unauthenticated_user: String,
    /// Registered hook invoked when access is denied.
    pub permission_denied_handler: Option<String>,
    /// Registered hook filtering endpoints per caller.
    pub resource_access_handler: Option<String>,
    pub template_path: String,
    pub doc_expansion: DocExpansion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<Info>,
}

impl Default for SwaggerSettings {
    fn default() -> Self {
        Self {
            swagger_version: SwaggerVersion::default(),
            api_version: None,
            api_path: "/".to_string(),
            api_key: String::new(),
            relative_paths: false,
            token_type: "Token".to_string(),
            enabled_methods: DEFAULT_ENABLED_METHODS.iter().map(|m| m.to_string()).collect(),
            is_authenticated: false,
            is_superuser: false,
            unauthenticated_user: "AnonymousUser".to_string(),
            permission_denied_handler: None,
            resource_access_handler: None,
            template_path: "rest_framework_swagger/index.html".to_string(),
            doc_expansion: DocExpansion::default(),
            info: None,
        }
    }
}

impl SwaggerSettings {
    /// Parse and validate a YAML or JSON settings document.
    pub fn from_yaml_str(text: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = if text.trim().is_empty() {
            SettingsFile::default()
        } else {
            serde_yaml::from_str(text)?
        };
        Self::from_file(file)
    }

    /// Read, parse and validate a settings file.
    pub fn from_path(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), version = %settings.swagger_version, "settings loaded");
        Ok(settings)
    }

    fn from_file(file: SettingsFile) -> Result<Self, SettingsError> {
        let defaults = Self::default();
        let settings = Self {
            swagger_version: match file.swagger_version {
                Some(v) => v.parse()?,
                None => defaults.swagger_version,
            },
            api_version: file.api_version,
            api_path: file.api_path.unwrap_or(defaults.api_path),
            api_key: file.api_key.unwrap_or(defaults.api_key),
            relative_paths: file.relative_paths.unwrap_or(defaults.relative_paths),
            token_type: file.token_type.unwrap_or(defaults.token_type),
            enabled_methods: file.enabled_methods.unwrap_or(defaults.enabled_methods),
            is_authenticated: file.is_authenticated.unwrap_or(defaults.is_authenticated),
            is_superuser: file.is_superuser.unwrap_or(defaults.is_superuser),
            unauthenticated_user: file
                .unauthenticated_user
                .unwrap_or(defaults.unauthenticated_user),
            permission_denied_handler: file.permission_denied_handler,
            resource_access_handler: file.resource_access_handler,
            template_path: file.template_path.unwrap_or(defaults.template_path),
            doc_expansion: match file.doc_expansion {
                Some(d) => d.parse()?,
                None => defaults.doc_expansion,
            },
            info: file.info,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Check the version-dependent constraints on `info`.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let Some(info) = &self.info else {
            return Ok(());
        };
        let version = self.swagger_version;
        let required: [(&'static str, bool); 2] = match version {
            SwaggerVersion::V1_2 => [
                ("title", info.title.is_some()),
                ("description", info.description.is_some()),
            ],
            SwaggerVersion::V2_0 => {
                if self.api_version.is_some() {
                    return Err(SettingsError::ForbiddenKey {
                        key: "api_version",
                        version,
                    });
                }
                [("title", info.title.is_some()), ("version", info.version.is_some())]
            }
        };
        match required.iter().find(|(_, present)| !present) {
            Some(&(key, _)) => Err(SettingsError::MissingInfoKey { key, version }),
            None => Ok(()),
        }
    }

    /// API version as published; empty when not configured.
    pub fn api_version(&self) -> &str {
        self.api_version.as_deref().unwrap_or_default()
    }
}

// ─── Store ──────────────────────────────────────────────────────────

/// Holder of the process-wide settings value.
#[derive(Debug, Default)]
pub struct SettingsStore {
    current: RwLock<Arc<SwaggerSettings>>,
}

impl SettingsStore {
    /// Validate and wrap the initial settings.
    pub fn new(settings: SwaggerSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            current: RwLock::new(Arc::new(settings)),
        })
    }

    /// The settings value for one generation.
    pub fn snapshot(&self) -> Arc<SwaggerSettings> {
        Arc::clone(&self.current.read())
    }

    /// Swap in new settings for subsequent generations. Generations holding
    /// an earlier snapshot are unaffected.
    pub fn reload(&self, settings: SwaggerSettings) -> Result<Arc<SwaggerSettings>, SettingsError> {
        if let Err(e) = settings.validate() {
            tracing::warn!("settings reload rejected: {e}");
            return Err(e);
        }
        let next = Arc::new(settings);
        *self.current.write() = Arc::clone(&next);
        tracing::info!(version = %next.swagger_version, "settings reloaded");
        Ok(next)
    }

    /// Parse, validate and swap in a settings document.
    pub fn reload_from_yaml(&self, text: &str) -> Result<Arc<SwaggerSettings>, SettingsError> {
        self.reload(SwaggerSettings::from_yaml_str(text)?)
    }
}

// ─── UI configuration ───────────────────────────────────────────────

/// Configuration handed to the documentation UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiConfig {
    pub swagger_version: SwaggerVersion,
    pub doc_expansion: DocExpansion,
    pub supported_submit_methods: Vec<String>,
    pub api_key: String,
    pub token_type: String,
    pub template_path: String,
    /// Where the UI fetches the document from.
    pub discovery_url: String,
}

impl UiConfig {
    /// Derive the UI configuration from settings.
    pub fn from_settings(settings: &SwaggerSettings) -> Self {
        let discovery_url = match settings.swagger_version {
            SwaggerVersion::V1_2 => "api-docs/v1.2/",
            SwaggerVersion::V2_0 => "api-docs/v2.0/",
        };
        Self {
            swagger_version: settings.swagger_version,
            doc_expansion: settings.doc_expansion,
            supported_submit_methods: settings.enabled_methods.clone(),
            api_key: settings.api_key.clone(),
            token_type: settings.token_type.clone(),
            template_path: settings.template_path.clone(),
            discovery_url: discovery_url.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_takes_every_default() {
        let settings = SwaggerSettings::from_yaml_str("").unwrap();
        assert_eq!(settings, SwaggerSettings::default());
        assert_eq!(settings.api_version(), "");
        assert_eq!(settings.enabled_methods.len(), 5);
        assert_eq!(settings.unauthenticated_user, "AnonymousUser");
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let settings = SwaggerSettings::from_yaml_str("api_path: /api\nis_authenticated: true\n").unwrap();
        assert_eq!(settings.api_path, "/api");
        assert!(settings.is_authenticated);
        assert_eq!(settings.token_type, "Token");
    }

    #[test]
    fn json_settings_are_accepted() {
        let settings =
            SwaggerSettings::from_yaml_str(r#"{"swagger_version": "2.0", "doc_expansion": "list"}"#).unwrap();
        assert_eq!(settings.swagger_version, SwaggerVersion::V2_0);
        assert_eq!(settings.doc_expansion, DocExpansion::List);
    }

    #[test]
    fn unknown_version_is_rejected() {
        let err = SwaggerSettings::from_yaml_str("swagger_version: '3.0'").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidVersion(v) if v == "3.0"));
    }

    #[test]
    fn unknown_doc_expansion_is_rejected() {
        let err = SwaggerSettings::from_yaml_str("doc_expansion: everything").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidDocExpansion(_)));
    }

    #[test]
    fn v1_2_info_requires_description() {
        let err = SwaggerSettings::from_yaml_str("info:\n  title: Pets\n").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::MissingInfoKey { key: "description", version: SwaggerVersion::V1_2 }
        ));
        assert!(SwaggerSettings::from_yaml_str("info:\n  title: Pets\n  description: d\n").is_ok());
    }

    #[test]
    fn v2_0_info_requires_title_and_version() {
        let err = SwaggerSettings::from_yaml_str("swagger_version: '2.0'\ninfo:\n  version: '1'\n")
            .unwrap_err();
        assert!(matches!(err, SettingsError::MissingInfoKey { key: "title", .. }));
        let err = SwaggerSettings::from_yaml_str("swagger_version: '2.0'\ninfo:\n  title: Pets\n")
            .unwrap_err();
        assert!(matches!(err, SettingsError::MissingInfoKey { key: "version", .. }));
    }

    #[test]
    fn v2_0_forbids_explicit_api_version() {
        let text = "swagger_version: '2.0'\napi_version: '1'\ninfo:\n  title: Pets\n  version: '1'\n";
        let err = SwaggerSettings::from_yaml_str(text).unwrap_err();
        assert!(matches!(err, SettingsError::ForbiddenKey { key: "api_version", .. }));

        let text = "swagger_version: '2.0'\ninfo:\n  title: Pets\n  version: '1'\n";
        assert!(SwaggerSettings::from_yaml_str(text).is_ok());
    }

    #[test]
    fn info_constraints_only_apply_when_info_present() {
        let settings = SwaggerSettings::from_yaml_str("swagger_version: '2.0'\napi_version: '1'\n").unwrap();
        assert_eq!(settings.api_version(), "1");
    }

    #[test]
    fn reload_swaps_only_valid_settings() {
        let store = SettingsStore::new(SwaggerSettings::default()).unwrap();
        let before = store.snapshot();

        let err = store.reload_from_yaml("swagger_version: '9'").unwrap_err();
        assert!(matches!(err, SettingsError::InvalidVersion(_)));
        assert_eq!(*store.snapshot(), *before);

        let invalid = SwaggerSettings {
            info: Some(Info::default()),
            ..SwaggerSettings::default()
        };
        assert!(store.reload(invalid).is_err());
        assert_eq!(*store.snapshot(), *before);

        store.reload_from_yaml("api_path: /v2").unwrap();
        assert_eq!(store.snapshot().api_path, "/v2");
        // The earlier snapshot is untouched.
        assert_eq!(before.api_path, "/");
    }

    #[test]
    fn from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("swagger.yaml");
        std::fs::write(&path, "token_type: Bearer\n").unwrap();
        assert_eq!(SwaggerSettings::from_path(&path).unwrap().token_type, "Bearer");

        let err = SwaggerSettings::from_path(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(err, SettingsError::Read { .. }));
    }

    #[test]
    fn ui_config_serializes_camel_case() {
        let settings = SwaggerSettings {
            swagger_version: SwaggerVersion::V2_0,
            ..SwaggerSettings::default()
        };
        let value = serde_json::to_value(UiConfig::from_settings(&settings)).unwrap();
        assert_eq!(value["docExpansion"], json!("none"));
        assert_eq!(value["swaggerVersion"], json!("2.0"));
        assert_eq!(value["discoveryUrl"], json!("api-docs/v2.0/"));
        assert_eq!(value["supportedSubmitMethods"][0], json!("get"));
    }
}
