//! Stateless dual-token service: short-lived access tokens and long-lived
//! refresh tokens, signed as HS256 JWTs with two independent secrets.
//!
//! There is no server-side session table. A token is valid exactly while its
//! signature checks out and its expiry has not passed; refreshing issues a
//! new pair without revoking the old refresh token, whose validity stays
//! bounded only by its own expiry.

use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::user::UserId;

/// Freshly minted access/refresh credential pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Why a presented token was not accepted.
///
/// Verification failures are non-fatal and reported to the caller, which maps
/// them to an authentication-denied outcome. The variants exist so the
/// boundary can log the causes distinctly; the token payload itself is never
/// logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    /// The token could not be parsed as a JWT at all.
    #[error("token is malformed")]
    Malformed,
    /// The signature does not match the expected secret.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// The token was once valid but its expiry has passed.
    #[error("token has expired")]
    Expired,
}

/// Signing failed while minting a pair. Only reachable with a broken key
/// configuration, so callers surface it as an internal error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("token signing failed: {message}")]
pub struct TokenIssueError {
    pub message: String,
}

/// Why a refresh attempt failed.
///
/// A rejected token is an authentication failure; a minting failure is an
/// internal fault. Callers must keep the two apart when mapping outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenRefreshError {
    /// The presented refresh token was not accepted.
    #[error(transparent)]
    Rejected(#[from] TokenRejection),
    /// The token verified but minting the replacement pair failed.
    #[error(transparent)]
    Issue(#[from] TokenIssueError),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

struct Signer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl Signer {
    fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    fn sign(&self, user_id: &UserId, now: i64) -> Result<String, TokenIssueError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now,
            exp: now + i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|error| {
            TokenIssueError {
                message: error.to_string(),
            }
        })
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenRejection> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No expiry leeway: a token minted with TTL zero is already dead.
        validation.leeway = 0;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|error| {
                match error.kind() {
                    ErrorKind::ExpiredSignature => TokenRejection::Expired,
                    ErrorKind::InvalidSignature => TokenRejection::InvalidSignature,
                    _ => TokenRejection::Malformed,
                }
            })?;
        UserId::new(&data.claims.sub).map_err(|_| TokenRejection::Malformed)
    }
}

/// Issues and verifies access/refresh token pairs.
pub struct TokenService {
    access: Signer,
    refresh: Signer,
}

impl TokenService {
    /// Build a service from two independent secrets and TTLs.
    pub fn new(
        access_secret: &[u8],
        access_ttl: Duration,
        refresh_secret: &[u8],
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: Signer::new(access_secret, access_ttl),
            refresh: Signer::new(refresh_secret, refresh_ttl),
        }
    }

    /// Lifetime of refresh tokens; also the max-age of the refresh cookie.
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh.ttl
    }

    /// Mint a new pair for `user_id`. Stateless: signing has no side effects.
    pub fn issue(&self, user_id: &UserId) -> Result<TokenPair, TokenIssueError> {
        let now = chrono::Utc::now().timestamp();
        Ok(TokenPair {
            access_token: self.access.sign(user_id, now)?,
            refresh_token: self.refresh.sign(user_id, now)?,
        })
    }

    /// Check an access token's signature and expiry, returning its subject.
    pub fn verify_access(&self, token: &str) -> Result<UserId, TokenRejection> {
        self.access.verify(token)
    }

    /// Symmetric check against the refresh secret.
    pub fn verify_refresh(&self, token: &str) -> Result<UserId, TokenRejection> {
        self.refresh.verify(token)
    }

    /// Validate a refresh token and mint a fresh pair for the same user.
    ///
    /// The old refresh token is not invalidated; stateless signing means its
    /// validity is bounded only by its own expiry.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenRefreshError> {
        let user_id = self.verify_refresh(refresh_token)?;
        Ok(self.issue(&user_id)?)
    }
}
