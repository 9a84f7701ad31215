// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registration and login.
//!
//! Both flows end by issuing an access token through the [`TokenCodec`].
//! Credential failures are reported without saying which field was wrong:
//! an unknown username and a wrong password both yield
//! [`AuthError::InvalidCredentials`] after the same amount of hashing work,
//! and the active flag is only consulted after the password matched.
//!
//! Neither function hashes under the store lock. Callers hash the new
//! password before [`register`], and run [`login`] on the blocking pool with
//! a credential looked up beforehand.

use tracing::{info, warn};

use super::{password::UNKNOWN_ACCOUNT_HASH, AuthError, CredentialHasher, Role, TokenCodec};
use crate::models::{LoginRequest, RegisterRequest};

/// Stored credential as seen by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}

/// Credential to create at registration (always active).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCredential {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// Credential lookup and creation, implemented by the user store.
pub trait CredentialStore {
    fn find_by_username(&self, username: &str) -> Option<Credential>;

    /// Whether the username or the email is already registered.
    fn identity_taken(&self, username: &str, email: &str) -> bool;

    /// Persist a new credential; fails with `DuplicateIdentity` if taken.
    fn create_credential(&mut self, new: NewCredential) -> Result<Credential, AuthError>;
}

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub credential: Credential,
    pub access_token: String,
}

/// Create an account with an already hashed password and issue its first
/// token.
///
/// Nothing is written when the username or email is taken.
pub fn register<S>(
    store: &mut S,
    codec: &TokenCodec,
    request: &RegisterRequest,
    password_hash: String,
) -> Result<AuthOutcome, AuthError>
where
    S: CredentialStore + ?Sized,
{
    info!(username = %request.username, "Registering new user");

    if store.identity_taken(&request.username, &request.email) {
        warn!(username = %request.username, "Registration rejected: identity already taken");
        return Err(AuthError::DuplicateIdentity);
    }

    let credential = store.create_credential(NewCredential {
        username: request.username.clone(),
        email: request.email.clone(),
        password_hash,
        role: Role::User,
    })?;
    info!(user_id = credential.user_id, "User registered");

    let access_token = codec.issue(credential.user_id, &credential.username)?;
    Ok(AuthOutcome {
        credential,
        access_token,
    })
}

/// Check the password against `credential` (the result of looking up
/// `request.username`) and issue a token.
///
/// An absent credential is verified against [`UNKNOWN_ACCOUNT_HASH`].
pub fn login(
    credential: Option<Credential>,
    hasher: &dyn CredentialHasher,
    codec: &TokenCodec,
    request: &LoginRequest,
) -> Result<AuthOutcome, AuthError> {
    info!(username = %request.username, "Login attempt");

    let password_ok = match &credential {
        Some(credential) => hasher.matches(&request.password, &credential.password_hash),
        None => {
            hasher.matches(&request.password, UNKNOWN_ACCOUNT_HASH);
            false
        }
    };
    let credential = credential.filter(|_| password_ok).ok_or_else(|| {
        warn!(username = %request.username, "Login rejected: invalid credentials");
        AuthError::InvalidCredentials
    })?;

    if !credential.active {
        warn!(user_id = credential.user_id, "Login rejected: account inactive");
        return Err(AuthError::InactiveAccount);
    }

    info!(user_id = credential.user_id, "User logged in");
    let access_token = codec.issue(credential.user_id, &credential.username)?;
    Ok(AuthOutcome {
        credential,
        access_token,
    })
}
