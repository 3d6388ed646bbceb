//! Password hashing port and the bcrypt-backed default adapter.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while hashing or verifying passwords.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashError {
    /// Hashing backend failed; the raw password is never included.
    #[error("password hashing failed: {message}")]
    Backend { message: String },
}

impl PasswordHashError {
    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Port for one-way password hashing.
///
/// Hashing is CPU-bound, so adapters run it on a blocking thread; the trait
/// stays async to keep callers agnostic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of `password`.
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Check `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError>;
}

/// Bcrypt-backed hasher.
#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    /// Build a hasher with an explicit cost factor.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Minimal cost, acceptable only in tests.
    pub fn fast() -> Self {
        // bcrypt's MIN_COST (4) is private in the crate, so inline the value.
        Self { cost: 4 }
    }
}

impl Default for BcryptPasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        let cost = self.cost;
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| PasswordHashError::backend(format!("hash task failed: {err}")))?
            .map_err(|err| PasswordHashError::backend(err.to_string()))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let password = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|err| PasswordHashError::backend(format!("verify task failed: {err}")))?
            .map_err(|err| PasswordHashError::backend(err.to_string()))
    }
}
