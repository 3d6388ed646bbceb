//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the domain services and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::BcryptPasswordHasher;
use crate::domain::ports::UserRepository;
use crate::domain::token::TokenService;
use crate::domain::vote_ledger::VoteLedger;
use crate::domain::AuthService;
use crate::outbound::memory::{InMemoryItemStore, InMemoryUserRepository};
use crate::outbound::notifier::ChannelNotifier;

/// Concrete auth service wiring used by the HTTP adapter.
pub type AppAuthService =
    AuthService<InMemoryUserRepository, BcryptPasswordHasher, ChannelNotifier>;

/// Concrete vote ledger wiring used by the HTTP adapter.
pub type AppVoteLedger = VoteLedger<InMemoryItemStore>;

/// Behaviour of the refresh-token cookie.
#[derive(Debug, Clone, Copy)]
pub struct RefreshCookieConfig {
    /// Whether the cookie is marked `Secure`. Off only for plain-HTTP
    /// development setups.
    pub secure: bool,
}

impl Default for RefreshCookieConfig {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AppAuthService>,
    pub ledger: Arc<AppVoteLedger>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<TokenService>,
    pub cookies: RefreshCookieConfig,
}

impl HttpState {
    /// Bundle the wired services for handler injection.
    pub fn new(
        auth: Arc<AppAuthService>,
        ledger: Arc<AppVoteLedger>,
        users: Arc<dyn UserRepository>,
        tokens: Arc<TokenService>,
        cookies: RefreshCookieConfig,
    ) -> Self {
        Self {
            auth,
            ledger,
            users,
            tokens,
            cookies,
        }
    }
}
