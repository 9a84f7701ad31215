// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Expense endpoints, scoped to the authenticated owner.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{DateRangeQuery, Expense, ExpenseCategory, ExpenseRequest, Page, PageQuery},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/v1/expenses",
    params(PageQuery),
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Page<Expense>),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn list_expenses(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Json<Page<Expense>> {
    let store = state.store.read().await;
    Json(Page::from_items(store.expenses_for_user(user.user_id), page))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/{id}",
    params(("id" = i64, Path, description = "Expense id")),
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Expense),
        (status = 404, description = "No such expense for this user"),
    )
)]
pub async fn get_expense(
    Auth(user): Auth,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Expense>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.owned_expense(id, user.user_id)?.clone()))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/category/{category}",
    params(
        ("category" = String, Path, description = "Category name, case-insensitive"),
        PageQuery,
    ),
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Page<Expense>),
        (status = 400, description = "Unknown category"),
    )
)]
pub async fn expenses_by_category(
    Auth(user): Auth,
    Path(category): Path<String>,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<Expense>>, ApiError> {
    let category = ExpenseCategory::from_str(&category)
        .ok_or_else(|| ApiError::bad_request(format!("Unknown expense category: {category}")))?;

    let store = state.store.read().await;
    Ok(Json(Page::from_items(
        store.expenses_by_category(user.user_id, category),
        page,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/expenses/range",
    params(DateRangeQuery),
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 200, body = [Expense]),
        (status = 400, description = "Start date after end date"),
    )
)]
pub async fn expenses_in_range(
    Auth(user): Auth,
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    if range.start_date > range.end_date {
        return Err(ApiError::bad_request("Start date must not be after end date"));
    }

    let store = state.store.read().await;
    Ok(Json(store.expenses_between(user.user_id, range.start_date, range.end_date)))
}

#[utoipa::path(
    post,
    path = "/api/v1/expenses",
    request_body = ExpenseRequest,
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 201, body = Expense),
        (status = 400, description = "Invalid expense data"),
    )
)]
pub async fn create_expense(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<ExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    request.validate(Utc::now().date_naive())?;

    let mut store = state.store.write().await;
    let expense = store.insert_expense(user.user_id, request)?;
    debug!(expense_id = expense.id, user_id = user.user_id, "Expense created");

    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    put,
    path = "/api/v1/expenses/{id}",
    params(("id" = i64, Path, description = "Expense id")),
    request_body = ExpenseRequest,
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 200, body = Expense),
        (status = 400, description = "Invalid expense data"),
        (status = 404, description = "No such expense for this user"),
    )
)]
pub async fn update_expense(
    Auth(user): Auth,
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(request): Json<ExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    request.validate(Utc::now().date_naive())?;

    let mut store = state.store.write().await;
    Ok(Json(store.update_expense(id, user.user_id, request)?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/expenses/{id}",
    params(("id" = i64, Path, description = "Expense id")),
    tag = "Expenses",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 404, description = "No such expense for this user"),
    )
)]
pub async fn delete_expense(
    Auth(user): Auth,
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write().await;
    store.delete_expense(id, user.user_id)?;
    info!(expense_id = id, user_id = user.user_id, "Expense deleted");
    Ok(StatusCode::NO_CONTENT)
}
