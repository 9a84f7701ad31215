// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User management endpoints.
//!
//! Every route needs a valid token. Role is carried on the account but not
//! checked here.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::{
    auth::{hash_blocking, Auth},
    error::ApiError,
    models::{CreateUserRequest, Page, PageQuery, UpdateUserRequest, UserResponse},
    state::AppState,
    store::{NewUser, UserChanges},
};

#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Page<UserResponse>),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn list_users(
    Auth(_user): Auth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Json<Page<UserResponse>> {
    let store = state.store.read().await;
    let users = store.list_users().into_iter().map(UserResponse::from).collect();
    Json(Page::from_items(users, page))
}

/// Get the account behind the presented token.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "User information", body = UserResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 404, description = "Account was deleted after the token was issued"),
    )
)]
pub async fn get_current_user(
    Auth(user): Auth,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.user(user.user_id)?.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserResponse),
        (status = 404, description = "No such user"),
    )
)]
pub async fn get_user(
    Auth(_user): Auth,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.user(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 201, body = UserResponse),
        (status = 400, description = "Invalid user data"),
        (status = 409, description = "Username or email already registered"),
    )
)]
pub async fn create_user(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    request.validate()?;
    let password_hash = hash_blocking(Arc::clone(&state.hasher), request.password.clone()).await?;

    let mut store = state.store.write().await;
    let user = store.insert_user(NewUser {
        username: request.username,
        email: request.email,
        password_hash,
        role: request.role.unwrap_or_default(),
        active: request.active.unwrap_or(true),
    })?;
    info!(user_id = user.id, created_by = caller.user_id, "User created");

    Ok((StatusCode::CREATED, Json((&user).into())))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    request_body = UpdateUserRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, body = UserResponse),
        (status = 404, description = "No such user"),
        (status = 409, description = "Username or email already registered"),
    )
)]
pub async fn update_user(
    Auth(caller): Auth,
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;
    let password_hash = match request.new_password() {
        Some(password) => Some(hash_blocking(Arc::clone(&state.hasher), password.to_owned()).await?),
        None => None,
    };

    let mut store = state.store.write().await;
    let user = store.update_user(
        id,
        UserChanges {
            username: request.username,
            email: request.email,
            password_hash,
            role: request.role,
            active: request.active,
        },
    )?;
    info!(user_id = id, updated_by = caller.user_id, "User updated");

    Ok(Json((&user).into()))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "User and their expenses deleted"),
        (status = 404, description = "No such user"),
    )
)]
pub async fn delete_user(
    Auth(caller): Auth,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_user(id)?;
    info!(user_id = id, deleted_by = caller.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role};
    use crate::state::tests::test_state;

    fn caller(user_id: i64) -> Auth {
        Auth(AuthenticatedUser {
            user_id,
            username: "caller".into(),
        })
    }

    fn create_request(username: &str) -> CreateUserRequest {
        CreateUserRequest {
            username: username.into(),
            email: format!("{username}@example.com"),
            password: "secret1".into(),
            role: None,
            active: None,
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let state = test_state();
        let (status, Json(created)) = create_user(caller(1), State(state.clone()), Json(create_request("bob")))
            .await
            .expect("user creation succeeds");
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.role, Role::User);
        assert!(created.active);

        let Json(fetched) = get_user(caller(1), Path(created.id), State(state.clone()))
            .await
            .unwrap();
        assert_eq!(fetched, created);

        let stored = state.store.read().await.user(created.id).unwrap().clone();
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn me_returns_callers_account() {
        let state = test_state();
        let (_, Json(created)) = create_user(caller(1), State(state.clone()), Json(create_request("carol")))
            .await
            .unwrap();

        let Json(me) = get_current_user(caller(created.id), State(state)).await.unwrap();
        assert_eq!(me.username, "carol");
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let err = get_user(caller(1), Path(99), State(test_state())).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_keeps_password_when_blank() {
        let state = test_state();
        let (_, Json(created)) = create_user(caller(1), State(state.clone()), Json(create_request("dave")))
            .await
            .unwrap();
        let old_hash = state.store.read().await.user(created.id).unwrap().password_hash.clone();

        let Json(updated) = update_user(
            caller(1),
            Path(created.id),
            State(state.clone()),
            Json(UpdateUserRequest {
                username: "dave2".into(),
                email: "dave2@example.com".into(),
                password: Some(String::new()),
                role: Some(Role::Admin),
                active: Some(false),
            }),
        )
        .await
        .unwrap();

        assert_eq!(updated.username, "dave2");
        assert_eq!(updated.role, Role::Admin);
        assert!(!updated.active);
        let new_hash = state.store.read().await.user(created.id).unwrap().password_hash.clone();
        assert_eq!(old_hash, new_hash);
    }

    #[tokio::test]
    async fn update_rejects_taken_username() {
        let state = test_state();
        create_user(caller(1), State(state.clone()), Json(create_request("erin"))).await.unwrap();
        let (_, Json(frank)) = create_user(caller(1), State(state.clone()), Json(create_request("frank")))
            .await
            .unwrap();

        let err = update_user(
            caller(1),
            Path(frank.id),
            State(state),
            Json(UpdateUserRequest {
                username: "erin".into(),
                email: "frank@example.com".into(),
                password: None,
                role: None,
                active: None,
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn list_is_paginated() {
        let state = test_state();
        for name in ["ann", "ben", "cat"] {
            create_user(caller(1), State(state.clone()), Json(create_request(name))).await.unwrap();
        }

        let Json(page) = list_users(caller(1), State(state), Query(PageQuery { page: 1, size: 2 })).await;
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.content.len(), 1);
        assert_eq!(page.content[0].username, "cat");
    }

    #[tokio::test]
    async fn delete_then_missing() {
        let state = test_state();
        let (_, Json(created)) = create_user(caller(1), State(state.clone()), Json(create_request("gina")))
            .await
            .unwrap();

        let status = delete_user(caller(1), Path(created.id), State(state.clone())).await.unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = delete_user(caller(1), Path(created.id), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
