// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{auth::Auth, models::CategorySummary, state::AppState};

/// Totals of the caller's expenses per category.
#[utoipa::path(
    get,
    path = "/api/v1/analytics/category-summary",
    tag = "Analytics",
    security(("bearer" = [])),
    responses(
        (status = 200, body = CategorySummary),
        (status = 401, description = "Missing or invalid token"),
    )
)]
pub async fn category_summary(Auth(user): Auth, State(state): State<AppState>) -> Json<CategorySummary> {
    let store = state.store.read().await;
    Json(CategorySummary::from_totals(store.category_totals(user.user_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{AuthenticatedUser, Role};
    use crate::models::{ExpenseCategory, ExpenseRequest};
    use crate::state::tests::test_state;
    use crate::store::NewUser;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn sums_only_callers_expenses() {
        let state = test_state();
        let (alice, bob) = {
            let mut store = state.store.write().await;
            let mut add = |name: &str| {
                store
                    .insert_user(NewUser {
                        username: name.into(),
                        email: format!("{name}@example.com"),
                        password_hash: "unused".into(),
                        role: Role::User,
                        active: true,
                    })
                    .unwrap()
                    .id
            };
            let alice = add("alice");
            let bob = add("bob");

            let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
            for (user, amount, category) in [
                (alice, 10.0, ExpenseCategory::Food),
                (alice, 5.5, ExpenseCategory::Food),
                (alice, 20.0, ExpenseCategory::Travel),
                (bob, 999.0, ExpenseCategory::Food),
            ] {
                store
                    .insert_expense(
                        user,
                        ExpenseRequest {
                            amount,
                            category,
                            description: "item".into(),
                            expense_date: date,
                        },
                    )
                    .unwrap();
            }
            (alice, bob)
        };

        let Json(summary) = category_summary(
            Auth(AuthenticatedUser {
                user_id: alice,
                username: "alice".into(),
            }),
            State(state.clone()),
        )
        .await;
        assert_eq!(summary.category_totals.len(), 2);
        assert_eq!(summary.category_totals["FOOD"], 15.5);
        assert_eq!(summary.category_totals["TRAVEL"], 20.0);
        assert_eq!(summary.grand_total, 35.5);

        let Json(summary) = category_summary(
            Auth(AuthenticatedUser {
                user_id: bob,
                username: "bob".into(),
            }),
            State(state),
        )
        .await;
        assert_eq!(summary.grand_total, 999.0);
    }
}
