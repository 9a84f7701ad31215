// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store for users and expenses.
//!
//! Shared through `AppState` as `Arc<RwLock<InMemoryStore>>`; every
//! check-then-write sequence (duplicate checks, ownership checks) runs under
//! a single write guard. Ids are assigned from per-table counters starting
//! at 1 and are never reused.

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};

use crate::auth::service::{Credential, CredentialStore, NewCredential};
use crate::auth::{AuthError, Role};
use crate::models::{Expense, ExpenseCategory, ExpenseRequest, UserResponse};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("username or email already exists")]
    Duplicate,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Account as stored, including the password hash.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl From<&StoredUser> for UserResponse {
    fn from(user: &StoredUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            active: user.active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<&StoredUser> for Credential {
    fn from(user: &StoredUser) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            active: user.active,
        }
    }
}

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

/// Replacement fields for an existing account.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    pub email: String,
    /// `None` keeps the current hash.
    pub password_hash: Option<String>,
    /// `None` keeps the current role.
    pub role: Option<Role>,
    /// `None` keeps the current active flag.
    pub active: Option<bool>,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: BTreeMap<i64, StoredUser>,
    expenses: BTreeMap<i64, Expense>,
    last_user_id: i64,
    last_expense_id: i64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    pub fn user(&self, user_id: i64) -> StoreResult<&StoredUser> {
        self.users
            .get(&user_id)
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id}")))
    }

    pub fn user_by_username(&self, username: &str) -> Option<&StoredUser> {
        self.users.values().find(|user| user.username == username)
    }

    /// Whether `username` or `email` belongs to an account other than `except`.
    pub fn identity_in_use(&self, username: &str, email: &str, except: Option<i64>) -> bool {
        self.users.values().any(|user| {
            Some(user.id) != except
                && (user.username == username || user.email.eq_ignore_ascii_case(email))
        })
    }

    /// All users ordered by id.
    pub fn list_users(&self) -> Vec<&StoredUser> {
        self.users.values().collect()
    }

    pub fn insert_user(&mut self, new_user: NewUser) -> StoreResult<StoredUser> {
        if self.identity_in_use(&new_user.username, &new_user.email, None) {
            return Err(StoreError::Duplicate);
        }

        self.last_user_id += 1;
        let now = Utc::now();
        let user = StoredUser {
            id: self.last_user_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            active: new_user.active,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn update_user(&mut self, user_id: i64, changes: UserChanges) -> StoreResult<StoredUser> {
        self.user(user_id)?;
        if self.identity_in_use(&changes.username, &changes.email, Some(user_id)) {
            return Err(StoreError::Duplicate);
        }

        let user = self
            .users
            .get_mut(&user_id)
            .ok_or_else(|| StoreError::NotFound(format!("User {user_id}")))?;
        user.username = changes.username;
        user.email = changes.email;
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(active) = changes.active {
            user.active = active;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    /// Delete a user together with all of their expenses.
    pub fn delete_user(&mut self, user_id: i64) -> StoreResult<()> {
        if self.users.remove(&user_id).is_none() {
            return Err(StoreError::NotFound(format!("User {user_id}")));
        }
        self.expenses.retain(|_, expense| expense.user_id != user_id);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Expenses
    // -------------------------------------------------------------------------

    pub fn insert_expense(&mut self, user_id: i64, request: ExpenseRequest) -> StoreResult<Expense> {
        self.user(user_id)?;

        self.last_expense_id += 1;
        let now = Utc::now();
        let expense = Expense {
            id: self.last_expense_id,
            user_id,
            amount: request.amount,
            category: request.category,
            description: request.description,
            expense_date: request.expense_date,
            created_at: now,
            updated_at: now,
        };
        self.expenses.insert(expense.id, expense.clone());
        Ok(expense)
    }

    /// Look up an expense owned by `user_id`.
    ///
    /// Expenses owned by someone else are reported as not found so that
    /// callers cannot probe for other users' ids.
    pub fn owned_expense(&self, expense_id: i64, user_id: i64) -> StoreResult<&Expense> {
        self.expenses
            .get(&expense_id)
            .filter(|expense| expense.user_id == user_id)
            .ok_or_else(|| StoreError::NotFound(format!("Expense {expense_id}")))
    }

    pub fn update_expense(
        &mut self,
        expense_id: i64,
        user_id: i64,
        request: ExpenseRequest,
    ) -> StoreResult<Expense> {
        self.owned_expense(expense_id, user_id)?;

        let expense = self
            .expenses
            .get_mut(&expense_id)
            .ok_or_else(|| StoreError::NotFound(format!("Expense {expense_id}")))?;
        expense.amount = request.amount;
        expense.category = request.category;
        expense.description = request.description;
        expense.expense_date = request.expense_date;
        expense.updated_at = Utc::now();
        Ok(expense.clone())
    }

    pub fn delete_expense(&mut self, expense_id: i64, user_id: i64) -> StoreResult<()> {
        self.owned_expense(expense_id, user_id)?;
        self.expenses.remove(&expense_id);
        Ok(())
    }

    /// Expenses of one user ordered by id.
    pub fn expenses_for_user(&self, user_id: i64) -> Vec<Expense> {
        self.expenses
            .values()
            .filter(|expense| expense.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn expenses_by_category(&self, user_id: i64, category: ExpenseCategory) -> Vec<Expense> {
        self.expenses
            .values()
            .filter(|expense| expense.user_id == user_id && expense.category == category)
            .cloned()
            .collect()
    }

    /// Expenses dated within `start..=end`.
    pub fn expenses_between(&self, user_id: i64, start: NaiveDate, end: NaiveDate) -> Vec<Expense> {
        self.expenses
            .values()
            .filter(|expense| {
                expense.user_id == user_id
                    && expense.expense_date >= start
                    && expense.expense_date <= end
            })
            .cloned()
            .collect()
    }

    /// Sum of amounts per category for one user.
    pub fn category_totals(&self, user_id: i64) -> BTreeMap<ExpenseCategory, f64> {
        let mut totals = BTreeMap::new();
        for expense in self.expenses.values().filter(|e| e.user_id == user_id) {
            *totals.entry(expense.category).or_insert(0.0) += expense.amount;
        }
        totals
    }
}

impl CredentialStore for InMemoryStore {
    fn find_by_username(&self, username: &str) -> Option<Credential> {
        self.user_by_username(username).map(Credential::from)
    }

    fn identity_taken(&self, username: &str, email: &str) -> bool {
        self.identity_in_use(username, email, None)
    }

    fn create_credential(&mut self, new: NewCredential) -> Result<Credential, AuthError> {
        let user = self
            .insert_user(NewUser {
                username: new.username,
                email: new.email,
                password_hash: new.password_hash,
                role: new.role,
                active: true,
            })
            .map_err(|e| match e {
                StoreError::Duplicate => AuthError::DuplicateIdentity,
                other => AuthError::Internal(other.to_string()),
            })?;
        Ok(Credential::from(&user))
    }
}
