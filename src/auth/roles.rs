// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role stored on every account.
///
/// Carried on the credential and returned to clients; no endpoint restricts
/// access by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Normal account (default for self-registration)
    User,
    /// Read-only account
    Viewer,
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "ADMIN"),
            Role::User => write!(f, "USER"),
            Role::Viewer => write!(f, "VIEWER"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_user() {
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""ADMIN""#);
        let parsed: Role = serde_json::from_str(r#""VIEWER""#).unwrap();
        assert_eq!(parsed, Role::Viewer);
        assert_eq!(Role::Admin.to_string(), "ADMIN");
    }
}
