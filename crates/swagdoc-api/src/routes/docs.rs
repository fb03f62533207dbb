//! # Documentation Routes
//!
//! - `GET /`                      : UI configuration
//! - `GET /api-docs/v1.2/`        : Swagger 1.2 resource listing
//! - `GET /api-docs/v1.2/{*path}` : Swagger 1.2 API declaration of one resource
//! - `GET /api-docs/v2.0/`        : Swagger 2.0 document
//!
//! Every route checks the caller against the access settings first and
//! documents only the endpoints the caller may see.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header::HOST;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use swagdoc_core::{Document, EndpointDescriptor};
use swagdoc_gen::{
    check_permission, visible_endpoints, ApiDeclaration, DocumentGenerator, ResourceListing,
    SwaggerSettings, UiConfig,
};

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Assemble the documentation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ui_config))
        .route("/api-docs/v1.2/", get(resource_listing))
        .route("/api-docs/v1.2/{*path}", get(api_declaration))
        .route("/api-docs/v2.0/", get(document))
}

/// The caller's settings snapshot and the endpoints visible to the caller,
/// after the permission check.
fn authorize(
    state: &AppState,
    caller: &Caller,
) -> Result<(Arc<SwaggerSettings>, Vec<EndpointDescriptor>), AppError> {
    let settings = Arc::clone(&caller.settings);
    check_permission(&settings, &state.hooks, &caller.principal)?;
    let endpoints = visible_endpoints(&settings, &state.hooks, &caller.principal, &state.endpoints);
    Ok((settings, endpoints))
}

fn generate(
    state: &AppState,
    settings: Arc<SwaggerSettings>,
    caller: Caller,
    endpoints: &[EndpointDescriptor],
) -> Document {
    DocumentGenerator::new(state.introspection.as_ref(), settings)
        .for_principal(Some(caller.principal))
        .generate(endpoints)
}

async fn ui_config(State(state): State<AppState>, caller: Caller) -> Result<Json<UiConfig>, AppError> {
    let (settings, _) = authorize(&state, &caller)?;
    Ok(Json(UiConfig::from_settings(&settings)))
}

async fn resource_listing(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ResourceListing>, AppError> {
    let (settings, endpoints) = authorize(&state, &caller)?;
    Ok(Json(ResourceListing::build(&settings, &endpoints)))
}

async fn api_declaration(
    State(state): State<AppState>,
    caller: Caller,
    Path(path): Path<String>,
) -> Result<Json<ApiDeclaration>, AppError> {
    let (settings, endpoints) = authorize(&state, &caller)?;
    let document = generate(&state, Arc::clone(&settings), caller, &endpoints);
    ApiDeclaration::from_document(&settings, &document, &path)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no documented resource '{}'", path.trim_matches('/'))))
}

async fn document(
    State(state): State<AppState>,
    caller: Caller,
    headers: HeaderMap,
) -> Result<Json<Document>, AppError> {
    let (settings, endpoints) = authorize(&state, &caller)?;
    let relative = settings.relative_paths;
    let mut document = generate(&state, settings, caller, &endpoints);
    if !relative {
        document.host = headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
    }
    Ok(Json(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;
    use swagdoc_gen::SettingsStore;
    use swagdoc_manifest::ManifestIntrospection;

    const MANIFEST: &str = r#"
handlers:
  - name: Ping
    module: app.views
    methods:
      - {name: get, doc: Ping.}
endpoints:
  - path: /ping
    handler: Ping
"#;

    fn state() -> AppState {
        let layer = ManifestIntrospection::from_yaml_str(MANIFEST).unwrap();
        let endpoints = layer.endpoints();
        AppState::new(
            Arc::new(SettingsStore::new(SwaggerSettings::default()).unwrap()),
            Arc::new(layer),
            endpoints,
        )
    }

    #[tokio::test]
    async fn reload_after_identification_does_not_change_the_request() {
        let state = state();
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let caller = Caller::from_request_parts(&mut parts, &state).await.unwrap();

        state
            .settings
            .reload(SwaggerSettings {
                is_authenticated: true,
                ..SwaggerSettings::default()
            })
            .unwrap();

        let (settings, endpoints) = authorize(&state, &caller).unwrap();
        assert!(Arc::ptr_eq(&settings, &caller.settings));
        assert!(!settings.is_authenticated);
        assert_eq!(endpoints.len(), 1);

        // A request identified after the reload is refused.
        let (mut parts, _) = Request::builder().uri("/").body(()).unwrap().into_parts();
        let later = Caller::from_request_parts(&mut parts, &state).await.unwrap();
        assert!(matches!(authorize(&state, &later), Err(AppError::Forbidden(_))));
    }
}
