// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless HS256 bearer-token authentication for the expense API.
//!
//! ## Auth Flow
//!
//! 1. Client calls `POST /api/v1/auth/register` or `POST /api/v1/auth/login`
//!    and receives an access token signed with the server secret
//! 2. Client sends `Authorization: Bearer <token>` on later requests
//! 3. The gate middleware:
//!    - Skips the public paths (auth, docs, health)
//!    - Verifies signature, then expiry
//!    - Inserts `AuthenticatedUser { user_id, username }` into the request
//!      extensions on success, and nothing otherwise
//! 4. Protected handlers take the `Auth` extractor, which answers 401 when
//!    no identity was attached
//!
//! ## Security
//!
//! - No server-side session or token registry; validity is signature + expiry
//! - HMAC comparison is constant time
//! - No clock skew tolerance: a token is expired at `exp`
//! - Login failures never say whether the username or the password was wrong

pub mod claims;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod password;
pub mod roles;
pub mod service;
pub mod token;

pub use claims::{AuthenticatedUser, TokenClaims};
pub use error::AuthError;
pub use extractor::Auth;
pub use gate::auth_gate;
pub use password::{hash_blocking, Argon2Hasher, CredentialHasher};
pub use roles::Role;
pub use token::TokenCodec;
