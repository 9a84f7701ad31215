// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! One-way credential hashing.

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};

use super::AuthError;

/// Valid Argon2id hash, at the default cost, that no password produces.
///
/// Login verifies against it when the username is unknown, so that path
/// costs the same as a wrong password.
pub const UNKNOWN_ACCOUNT_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$Y0ea1poJCyWCd+yPum+ZQQ$kvBtyUeiH1A7i9YWsoDEAtXu465eN7nDBgDwEL+HAbI";

/// One-way hasher for account passwords.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext secret for storage.
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Check a plaintext secret against a stored hash.
    ///
    /// A stored hash that cannot be parsed never matches.
    fn matches(&self, plaintext: &str, hash: &str) -> bool;
}

/// Argon2id hasher producing PHC strings (`$argon2id$v=19$...`).
///
/// Verification reads the parameters from the stored hash, so hashes made
/// with different cost settings stay verifiable.
#[derive(Clone, Default)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Create a hasher with explicit cost parameters.
    pub fn with_params(params: Params) -> Self {
        Self {
            argon2: Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Internal(format!("password hashing failed: {e}")))
    }

    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is not a valid PHC string");
                false
            }
        }
    }
}

/// Hash `plaintext` on tokio's blocking pool.
pub async fn hash_blocking(
    hasher: Arc<dyn CredentialHasher>,
    plaintext: String,
) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
        .await
        .map_err(|e| AuthError::Internal(format!("hashing task failed: {e}")))?
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Cheap parameters so tests do not spend seconds hashing.
    pub(crate) fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::with_params(Params::new(8, 1, 1, None).unwrap())
    }

    #[test]
    fn hash_then_match() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.matches("correct horse", &hash));
        assert!(!hasher.matches("battery staple", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = fast_hasher();
        let a = hasher.hash("same").unwrap();
        let b = hasher.hash("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn unparseable_hash_never_matches() {
        let hasher = fast_hasher();
        assert!(!hasher.matches("anything", "plaintext-in-db"));
    }

    #[test]
    fn unknown_account_hash_is_well_formed_and_never_matches() {
        let parsed = PasswordHash::new(UNKNOWN_ACCOUNT_HASH).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(!fast_hasher().matches("", UNKNOWN_ACCOUNT_HASH));
    }

    #[tokio::test]
    async fn hash_blocking_produces_verifiable_hash() {
        let hasher: Arc<dyn CredentialHasher> = Arc::new(fast_hasher());
        let hash = hash_blocking(Arc::clone(&hasher), "pw123456".to_string())
            .await
            .unwrap();
        assert!(hasher.matches("pw123456", &hash));
    }

    #[test]
    fn default_hasher_verifies_fast_hashes() {
        let hash = fast_hasher().hash("pw123456").unwrap();
        assert!(Argon2Hasher::default().matches("pw123456", &hash));
    }
}
