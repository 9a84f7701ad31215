// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login endpoints. Both are on the gate's bypass list.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::{
        hash_blocking,
        service::{self, AuthOutcome, CredentialStore},
        AuthError,
    },
    error::ApiError,
    models::{AuthResponse, LoginRequest, RegisterRequest},
    state::AppState,
};

fn auth_response(state: &AppState, outcome: AuthOutcome) -> AuthResponse {
    AuthResponse {
        user_id: outcome.credential.user_id,
        username: outcome.credential.username,
        email: outcome.credential.email,
        role: outcome.credential.role,
        access_token: outcome.access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl().as_secs(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    tag = "Auth",
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid registration data"),
        (status = 409, description = "Username or email already registered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    request.validate()?;
    let password_hash = hash_blocking(Arc::clone(&state.hasher), request.password.clone()).await?;

    let mut store = state.store.write().await;
    let outcome = service::register(&mut *store, &state.tokens, &request, password_hash)?;
    drop(store);

    Ok((StatusCode::CREATED, Json(auth_response(&state, outcome))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Login succeeded", body = AuthResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 403, description = "Account is disabled"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let credential = state.store.read().await.find_by_username(&request.username);

    let hasher = Arc::clone(&state.hasher);
    let tokens = state.tokens.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        service::login(credential, hasher.as_ref(), &tokens, &request)
    })
    .await
    .map_err(|e| AuthError::Internal(format!("login task failed: {e}")))??;

    Ok(Json(auth_response(&state, outcome)))
}
