// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{auth_gate, Role},
    models::{
        AuthResponse, CategorySummary, CreateUserRequest, Expense, ExpenseCategory,
        ExpenseRequest, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse,
    },
    state::AppState,
};

pub mod analytics;
pub mod auth;
pub mod expenses;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::get_current_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/expenses",
            get(expenses::list_expenses).post(expenses::create_expense),
        )
        .route("/expenses/range", get(expenses::expenses_in_range))
        .route(
            "/expenses/category/{category}",
            get(expenses::expenses_by_category),
        )
        .route(
            "/expenses/{id}",
            get(expenses::get_expense)
                .put(expenses::update_expense)
                .delete(expenses::delete_expense),
        )
        .route(
            "/analytics/category-summary",
            get(analytics::category_summary),
        );

    let tokens = state.tokens.clone();

    Router::new()
        .nest("/api/v1", v1_routes)
        .route("/health", get(health::health))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/v3/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(tokens, auth_gate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/v1/auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::login,
        users::list_users,
        users::get_current_user,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        expenses::list_expenses,
        expenses::get_expense,
        expenses::expenses_by_category,
        expenses::expenses_in_range,
        expenses::create_expense,
        expenses::update_expense,
        expenses::delete_expense,
        analytics::category_summary,
        health::health
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            UserResponse,
            CreateUserRequest,
            UpdateUserRequest,
            Role,
            Expense,
            ExpenseCategory,
            ExpenseRequest,
            CategorySummary,
            health::HealthResponse,
            health::HealthChecks
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User management"),
        (name = "Expenses", description = "Expense tracking"),
        (name = "Analytics", description = "Expense reports"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
