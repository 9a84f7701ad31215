// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication gate for Axum.
//!
//! Every request passes through [`auth_gate`] before reaching a handler.
//! The gate never rejects a request itself. A valid bearer token results in
//! an [`AuthenticatedUser`] in the request extensions; anything else leaves
//! the extensions untouched and the protected handler's [`Auth`] extractor
//! answers 401.
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .nest("/api/v1", routes)
//!     .layer(axum::middleware::from_fn_with_state(codec, auth_gate));
//! ```
//!
//! [`Auth`]: super::Auth

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use super::{AuthError, AuthenticatedUser, TokenCodec};

/// Path prefixes that are reachable without a token.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &[
    "/api/v1/auth",
    "/v3/api-docs",
    "/swagger-ui",
    "/health",
    "/error",
];

const BEARER_PREFIX: &str = "Bearer ";

/// What the gate decided for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// Path is on the bypass list; the token (if any) was not inspected.
    Exempt,
    /// No identity attached. `Missing` when there was no bearer token,
    /// otherwise the codec failure.
    Unauthenticated(AuthError),
    /// Token verified and identity attached.
    Authenticated(AuthenticatedUser),
}

/// Whether `path` skips authentication.
pub fn is_exempt(path: &str) -> bool {
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

/// The token after an exact `"Bearer "` prefix in the `Authorization` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}

/// Run the gate against a request, attaching the identity on success.
pub fn authenticate(codec: &TokenCodec, request: &mut Request) -> GateOutcome {
    if is_exempt(request.uri().path()) {
        return GateOutcome::Exempt;
    }

    let Some(token) = extract_bearer_token(request.headers()) else {
        return GateOutcome::Unauthenticated(AuthError::Missing);
    };

    match codec.verify(token) {
        Ok(user) => {
            request.extensions_mut().insert(user.clone());
            GateOutcome::Authenticated(user)
        }
        Err(err) => GateOutcome::Unauthenticated(err),
    }
}

/// Axum middleware wrapping [`authenticate`].
///
/// Always forwards the request to the next layer.
pub async fn auth_gate(State(codec): State<TokenCodec>, mut request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match authenticate(&codec, &mut request) {
        GateOutcome::Exempt => {}
        GateOutcome::Authenticated(user) => {
            debug!(%method, %path, user_id = user.user_id, "Request authenticated");
        }
        GateOutcome::Unauthenticated(err) if err.is_token_error() => {
            warn!(%method, %path, error = %err, "Bearer token rejected");
        }
        GateOutcome::Unauthenticated(err) => {
            debug!(%method, %path, reason = %err, "No identity attached");
        }
    }

    next.run(request).await
}
