// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Access token signing and verification.
//!
//! Tokens are compact HS256 JWTs (`header.payload.signature`, base64url)
//! carrying [`TokenClaims`]. Validity is decided by signature and expiry
//! alone; no token is ever stored server side, so any process holding the
//! same secret can verify any token.
//!
//! ## Failure precedence
//!
//! 1. Text that does not parse as a JWT → [`AuthError::Malformed`]
//! 2. Signature mismatch → [`AuthError::BadSignature`]
//! 3. `now >= exp` → [`AuthError::Expired`]
//!
//! The expiry check only runs on tokens whose signature verified, so a
//! forged token is always reported as a bad signature.
//!
//! ## Constant-time comparison
//!
//! `jsonwebtoken` verifies HS256 by recomputing the HMAC over
//! `header.payload` and comparing with `hmac::Mac::verify_slice`, which does
//! not exit early on the first differing byte. Never compare signatures
//! with `==` in this module.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::{AuthError, AuthenticatedUser, TokenClaims};

/// Signing algorithm for all access tokens.
const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Issue a token for `user_id` / `username`, valid for `ttl` from now.
pub fn issue(user_id: i64, username: &str, secret: &[u8], ttl: Duration) -> Result<String, AuthError> {
    issue_at(user_id, username, secret, ttl, now())
}

/// Issue a token as if the current time were `issued_at` (Unix seconds).
pub fn issue_at(
    user_id: i64,
    username: &str,
    secret: &[u8],
    ttl: Duration,
    issued_at: i64,
) -> Result<String, AuthError> {
    let claims = TokenClaims::new(user_id, username, issued_at, expiry(issued_at, ttl));
    sign(&claims, &EncodingKey::from_secret(secret))
}

/// Verify a token against `secret` at the current time.
pub fn verify(token: &str, secret: &[u8]) -> Result<AuthenticatedUser, AuthError> {
    verify_at(token, secret, now())
}

/// Verify a token against `secret` as if the current time were `now`.
pub fn verify_at(token: &str, secret: &[u8], now: i64) -> Result<AuthenticatedUser, AuthError> {
    verify_with_key(token, &DecodingKey::from_secret(secret), now)
}

/// Verify a token and return only its user id.
pub fn extract_user_id(token: &str, secret: &[u8]) -> Result<i64, AuthError> {
    verify(token, secret).map(|user| user.user_id)
}

/// Verify a token and return only its username.
pub fn extract_username(token: &str, secret: &[u8]) -> Result<String, AuthError> {
    verify(token, secret).map(|user| user.username)
}

/// Process-wide token codec.
///
/// Holds the signing secret and token lifetime, both fixed at startup.
/// Cloning is cheap; all clones share the same keys.
#[derive(Clone)]
pub struct TokenCodec {
    inner: Arc<CodecKeys>,
}

struct CodecKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    /// Create a codec from a shared secret and token lifetime.
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            inner: Arc::new(CodecKeys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
                ttl,
            }),
        }
    }

    /// Lifetime of tokens issued by this codec.
    pub fn ttl(&self) -> Duration {
        self.inner.ttl
    }

    /// Issue a token valid for [`ttl`](Self::ttl) from now.
    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, AuthError> {
        self.issue_at(user_id, username, now())
    }

    pub fn issue_at(&self, user_id: i64, username: &str, issued_at: i64) -> Result<String, AuthError> {
        let claims = TokenClaims::new(
            user_id,
            username,
            issued_at,
            expiry(issued_at, self.inner.ttl),
        );
        sign(&claims, &self.inner.encoding)
    }

    /// Verify a token at the current time.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.verify_at(token, now())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<AuthenticatedUser, AuthError> {
        verify_with_key(token, &self.inner.decoding, now)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl", &self.inner.ttl)
            .finish_non_exhaustive()
    }
}

fn now() -> i64 {
    Utc::now().timestamp()
}

fn expiry(issued_at: i64, ttl: Duration) -> i64 {
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    issued_at.saturating_add(ttl_secs)
}

fn sign(claims: &TokenClaims, key: &EncodingKey) -> Result<String, AuthError> {
    encode(&Header::new(TOKEN_ALGORITHM), claims, key)
        .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))
}

fn verify_with_key(token: &str, key: &DecodingKey, now: i64) -> Result<AuthenticatedUser, AuthError> {
    let claims = decode::<TokenClaims>(token, key, &validation())
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => AuthError::BadSignature,
            _ => AuthError::Malformed,
        })?
        .claims;

    if now >= claims.exp {
        return Err(AuthError::Expired);
    }

    AuthenticatedUser::from_claims(claims)
}

fn validation() -> Validation {
    let mut validation = Validation::new(TOKEN_ALGORITHM);
    // Expiry is checked in verify_with_key so that the boundary is exact
    // and the clock is injectable.
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation
}
