// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Auth**: Registration, login and the token response
//! - **Users**: Account management (password hashes never leave the store)
//! - **Expenses**: Expense records and their category report
//! - **Pagination**: Page request and page envelope

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Role;
use crate::error::ApiError;

/// Longest accepted expense description.
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Smallest accepted expense amount.
pub const MIN_AMOUNT: f64 = 0.01;

// =============================================================================
// Auth Models
// =============================================================================

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Unique login name (3-50 characters).
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// Plaintext password (at least 6 characters).
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_identity(&self.username, &self.email)?;
        validate_password(&self.password)
    }
}

/// Request to log in with username and password.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response to a successful registration or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Signed bearer token.
    pub access_token: String,
    /// Always `Bearer`.
    pub token_type: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

// =============================================================================
// User Models
// =============================================================================

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create an account through the user management API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to `USER`.
    #[serde(default)]
    pub role: Option<Role>,
    /// Defaults to `true`.
    #[serde(default)]
    pub active: Option<bool>,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_identity(&self.username, &self.email)?;
        validate_password(&self.password)
    }
}

/// Request to update an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub username: String,
    pub email: String,
    /// New password; omitted or empty keeps the current one.
    #[serde(default)]
    pub password: Option<String>,
    /// New role; omitted keeps the current one.
    #[serde(default)]
    pub role: Option<Role>,
    /// Enable or disable the account; omitted keeps the current state.
    #[serde(default)]
    pub active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_identity(&self.username, &self.email)?;
        match self.new_password() {
            Some(password) => validate_password(password),
            None => Ok(()),
        }
    }

    /// The password to set, if one was supplied.
    pub fn new_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }
}

/// Usernames and emails are stored exactly as sent, so surrounding
/// whitespace is rejected rather than trimmed.
fn validate_identity(username: &str, email: &str) -> Result<(), ApiError> {
    if username.trim() != username {
        return Err(ApiError::bad_request(
            "Username must not start or end with whitespace",
        ));
    }
    let len = username.chars().count();
    if !(3..=50).contains(&len) {
        return Err(ApiError::bad_request(
            "Username must be between 3 and 50 characters",
        ));
    }
    if email.trim() != email || !email.contains('@') || email.len() < 3 {
        return Err(ApiError::bad_request("Email must be a valid address"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < 6 {
        return Err(ApiError::bad_request(
            "Password must be at least 6 characters",
        ));
    }
    Ok(())
}

// =============================================================================
// Expense Models
// =============================================================================

/// Expense category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Utilities,
    Entertainment,
    Healthcare,
    Shopping,
    Education,
    Travel,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 9] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transportation,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Shopping,
        ExpenseCategory::Education,
        ExpenseCategory::Travel,
        ExpenseCategory::Other,
    ];

    /// Wire name (`FOOD`, `TRAVEL`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Food => "FOOD",
            ExpenseCategory::Transportation => "TRANSPORTATION",
            ExpenseCategory::Utilities => "UTILITIES",
            ExpenseCategory::Entertainment => "ENTERTAINMENT",
            ExpenseCategory::Healthcare => "HEALTHCARE",
            ExpenseCategory::Shopping => "SHOPPING",
            ExpenseCategory::Education => "EDUCATION",
            ExpenseCategory::Travel => "TRAVEL",
            ExpenseCategory::Other => "OTHER",
        }
    }

    /// Parse a category name (case-insensitive).
    pub fn from_str(s: &str) -> Option<ExpenseCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded expense.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Expense {
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub description: String,
    /// Day the money was spent.
    pub expense_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create or replace an expense.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExpenseRequest {
    /// Amount spent (at least 0.01).
    pub amount: f64,
    pub category: ExpenseCategory,
    /// Free text, 1-500 characters.
    pub description: String,
    /// Must not be in the future.
    pub expense_date: NaiveDate,
}

impl ExpenseRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ApiError> {
        if !self.amount.is_finite() || self.amount < MIN_AMOUNT {
            return Err(ApiError::bad_request("Amount must be greater than 0"));
        }
        if self.description.trim().is_empty() {
            return Err(ApiError::bad_request("Description is required"));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ApiError::bad_request(format!(
                "Description must be at most {MAX_DESCRIPTION_LEN} characters"
            )));
        }
        if self.expense_date > today {
            return Err(ApiError::bad_request("Expense date cannot be in the future"));
        }
        Ok(())
    }
}

/// Inclusive date range filter.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct DateRangeQuery {
    /// First day (inclusive), `YYYY-MM-DD`.
    pub start_date: NaiveDate,
    /// Last day (inclusive), `YYYY-MM-DD`.
    pub end_date: NaiveDate,
}

/// Expense totals per category for one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CategorySummary {
    /// Category name → total amount. Categories without expenses are omitted.
    pub category_totals: BTreeMap<String, f64>,
    /// Sum over all categories.
    pub grand_total: f64,
}

impl CategorySummary {
    pub fn from_totals(totals: BTreeMap<ExpenseCategory, f64>) -> Self {
        let grand_total = totals.values().sum();
        let category_totals = totals
            .into_iter()
            .map(|(category, total)| (category.as_str().to_string(), total))
            .collect();
        Self {
            category_totals,
            grand_total,
        }
    }
}

// =============================================================================
// Pagination
// =============================================================================

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// Page request (0-based page index).
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
pub struct PageQuery {
    /// Page index, starting at 0.
    #[serde(default)]
    pub page: usize,
    /// Page size (1-100, default 20).
    #[serde(default = "default_page_size")]
    pub size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageQuery {
    /// Page size clamped to the accepted range.
    pub fn effective_size(&self) -> usize {
        self.size.clamp(1, MAX_PAGE_SIZE)
    }
}

/// One page of results.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Cut the requested page out of an ordered result set.
    pub fn from_items(items: Vec<T>, query: PageQuery) -> Self {
        let size = query.effective_size();
        let total_elements = items.len();
        let total_pages = total_elements.div_ceil(size);
        let content = items
            .into_iter()
            .skip(query.page.saturating_mul(size))
            .take(size)
            .collect();

        Self {
            content,
            page: query.page,
            size,
            total_elements,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense_request(amount: f64, date: NaiveDate) -> ExpenseRequest {
        ExpenseRequest {
            amount,
            category: ExpenseCategory::Food,
            description: "Lunch".into(),
            expense_date: date,
        }
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(ExpenseCategory::from_str("food"), Some(ExpenseCategory::Food));
        assert_eq!(ExpenseCategory::from_str("TRAVEL"), Some(ExpenseCategory::Travel));
        assert_eq!(ExpenseCategory::from_str("groceries"), None);
    }

    #[test]
    fn category_wire_name_matches_serde() {
        for category in ExpenseCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn expense_validation_rules() {
        let today = day(2025, 6, 1);
        assert!(expense_request(12.5, today).validate(today).is_ok());
        assert!(expense_request(0.0, today).validate(today).is_err());
        assert!(expense_request(f64::NAN, today).validate(today).is_err());
        assert!(expense_request(5.0, day(2025, 6, 2)).validate(today).is_err());

        let mut blank = expense_request(5.0, today);
        blank.description = "   ".into();
        assert!(blank.validate(today).is_err());

        let mut long = expense_request(5.0, today);
        long.description = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        assert!(long.validate(today).is_err());
    }

    #[test]
    fn register_validation_rules() {
        let ok = RegisterRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "secret1".into(),
        };
        assert!(ok.validate().is_ok());

        let mut short_name = ok.clone();
        short_name.username = "al".into();
        assert!(short_name.validate().is_err());

        let mut bad_email = ok.clone();
        bad_email.email = "alice.example.com".into();
        assert!(bad_email.validate().is_err());

        let mut padded_name = ok.clone();
        padded_name.username = "   abc".into();
        assert!(padded_name.validate().is_err());

        let mut padded_email = ok.clone();
        padded_email.email = " alice@example.com".into();
        assert!(padded_email.validate().is_err());

        let mut short_password = ok;
        short_password.password = "12345".into();
        assert!(short_password.validate().is_err());
    }

    #[test]
    fn update_user_ignores_empty_password() {
        let request = UpdateUserRequest {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: Some(String::new()),
            role: None,
            active: None,
        };
        assert!(request.validate().is_ok());
        assert_eq!(request.new_password(), None);
    }

    #[test]
    fn summary_sums_grand_total() {
        let mut totals = BTreeMap::new();
        totals.insert(ExpenseCategory::Food, 30.0);
        totals.insert(ExpenseCategory::Travel, 120.5);

        let summary = CategorySummary::from_totals(totals);
        assert_eq!(summary.category_totals["FOOD"], 30.0);
        assert_eq!(summary.category_totals["TRAVEL"], 120.5);
        assert_eq!(summary.grand_total, 150.5);
    }

    #[test]
    fn page_slices_and_counts() {
        let items: Vec<u32> = (1..=45).collect();
        let page = Page::from_items(items.clone(), PageQuery { page: 2, size: 20 });
        assert_eq!(page.content, (41..=45).collect::<Vec<_>>());
        assert_eq!(page.total_elements, 45);
        assert_eq!(page.total_pages, 3);

        let beyond = Page::from_items(items, PageQuery { page: 9, size: 20 });
        assert!(beyond.content.is_empty());
    }

    #[test]
    fn page_size_is_clamped() {
        let page = Page::from_items(vec![1, 2, 3], PageQuery { page: 0, size: 0 });
        assert_eq!(page.size, 1);
        assert_eq!(page.content, vec![1]);
        assert_eq!(PageQuery { page: 0, size: 500 }.effective_size(), MAX_PAGE_SIZE);
    }
}
