//! Domain primitives, aggregates, services, and ports.
//!
//! Keep types immutable where possible and document invariants and
//! serialisation contracts in each type's Rustdoc. Transport concerns stay in
//! the inbound adapters; infrastructure concerns stay behind the ports.

pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod token;
pub mod user;
pub mod user_events;
pub mod vote;
pub mod vote_ledger;

pub use self::auth::{CredentialValidationError, LoginCredentials, SignupDetails};
pub use self::auth_service::{AuthService, ProfileUpdate};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode};
pub use self::token::{TokenPair, TokenRefreshError, TokenRejection, TokenService};
pub use self::user::{
    DisplayName, EmailAddress, Principal, Role, User, UserId, UserValidationError,
};
pub use self::user_events::{UserEvent, UserSummary};
pub use self::vote::{ItemId, VoteCounters, VoteDirection, VoteState};
pub use self::vote_ledger::VoteLedger;
