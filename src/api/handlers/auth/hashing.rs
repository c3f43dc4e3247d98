//! Password digests.
//!
//! Stored credentials are a single-round, unsalted SHA-256 hex digest. Callers
//! only see the [`PasswordHasher`] trait, so a salted or memory-hard scheme can
//! replace [`Sha256PasswordHasher`] without changing the handlers.

use sha2::{Digest, Sha256};

use super::utils::constant_time_str_eq;

pub trait PasswordHasher: Send + Sync {
    /// Deterministic digest of `password`.
    fn hash(&self, password: &str) -> String;

    /// Compare a candidate password against a stored digest.
    fn verify(&self, password: &str, digest: &str) -> bool {
        constant_time_str_eq(&self.hash(password), digest)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256PasswordHasher;

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}
