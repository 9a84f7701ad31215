// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Token variants come out of the token codec; the gate only logs them.
/// Credential variants come out of registration and login and are shown to
/// the caller, so their messages never say which field was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Token text does not parse into a signed token
    Malformed,
    /// Signature does not match (tampered, forged or wrong key)
    BadSignature,
    /// Signature is valid but the token has expired
    Expired,
    /// No verified identity on a route that needs one
    Missing,
    /// Username or password mismatch
    InvalidCredentials,
    /// Username or email already registered
    DuplicateIdentity,
    /// Account exists but is disabled
    InactiveAccount,
    /// Hashing or signing failed
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::Malformed => "malformed_token",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "token_expired",
            AuthError::Missing => "authentication_required",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::DuplicateIdentity => "duplicate_identity",
            AuthError::InactiveAccount => "inactive_account",
            AuthError::Internal(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::Malformed
            | AuthError::BadSignature
            | AuthError::Expired
            | AuthError::Missing
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::DuplicateIdentity => StatusCode::CONFLICT,
            AuthError::InactiveAccount => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this error came out of token verification.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            AuthError::Malformed | AuthError::BadSignature | AuthError::Expired
        )
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Malformed => write!(f, "Token is malformed"),
            AuthError::BadSignature => write!(f, "Token signature is invalid"),
            AuthError::Expired => write!(f, "Token has expired"),
            AuthError::Missing => write!(f, "Authentication is required"),
            AuthError::InvalidCredentials => write!(f, "Invalid username or password"),
            AuthError::DuplicateIdentity => write!(f, "Username or email already exists"),
            AuthError::InactiveAccount => write!(f, "User account is inactive"),
            AuthError::Internal(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Internal details stay in the logs.
            AuthError::Internal(_) => "Internal authentication error".to_string(),
            other => other.to_string(),
        };
        let body = Json(AuthErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
