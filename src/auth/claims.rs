// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::AuthError;

/// Claims carried inside an access token.
///
/// `sub` holds the numeric user id as a decimal string, following the JWT
/// convention that the subject is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user id)
    pub sub: String,
    /// Username at the time of issue
    pub username: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    pub fn new(user_id: i64, username: impl Into<String>, issued_at: i64, expires_at: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            username: username.into(),
            iat: issued_at,
            exp: expires_at,
        }
    }
}

/// Authenticated user information extracted from a verified token.
///
/// This is the identity the gate attaches to a request and that handlers
/// receive through the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Numeric user id (token `sub`)
    pub user_id: i64,
    /// Username
    pub username: String,
}

impl AuthenticatedUser {
    /// Build the identity from claims whose signature and expiry are already checked.
    pub fn from_claims(claims: TokenClaims) -> Result<Self, AuthError> {
        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::Malformed)?;

        Ok(Self {
            user_id,
            username: claims.username,
        })
    }
}
