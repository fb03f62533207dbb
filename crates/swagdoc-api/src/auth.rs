//! # Caller Identification
//!
//! Reads `Authorization: <token_type> <token>` and maps the token to a
//! [`Principal`] through the credential table. Missing, malformed or
//! unknown credentials yield the configured anonymous principal.
//!
//! The settings snapshot taken to identify the caller travels with the
//! [`Caller`], so the access checks and generation of the same request
//! read the same settings value.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use swagdoc_core::Principal;
use swagdoc_gen::SwaggerSettings;

use crate::state::AppState;

/// The caller of a documentation request, with the settings snapshot the
/// request is served under.
#[derive(Debug, Clone)]
pub struct Caller {
    pub principal: Principal,
    pub settings: Arc<SwaggerSettings>,
}

/// Extract the token of an `Authorization` value of the given scheme.
pub fn bearer_token<'a>(header: &'a str, token_type: &str) -> Option<&'a str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case(token_type) && !token.is_empty()).then_some(token)
}

/// Map request headers to a principal under one settings value.
pub fn identify(
    headers: &HeaderMap,
    settings: &SwaggerSettings,
    credentials: &HashMap<String, Principal>,
) -> Principal {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| bearer_token(value, &settings.token_type))
        .and_then(|token| credentials.get(token))
        .cloned()
        .unwrap_or_else(|| Principal::anonymous(settings.unauthenticated_user.clone()))
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let settings = state.settings.snapshot();
        let principal = identify(&parts.headers, &settings, &state.credentials);
        Ok(Self {
            principal,
            settings,
        })
    }
}
