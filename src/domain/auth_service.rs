//! Signup, login, refresh, and profile use-cases.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::auth::{LoginCredentials, SignupDetails};
use crate::domain::error::DomainError;
use crate::domain::ports::{
    PasswordHasher, UserEventPublisher, UserPersistenceError, UserRepository,
};
use crate::domain::token::{TokenPair, TokenRefreshError, TokenService};
use crate::domain::user::{DisplayName, User, UserId};
use crate::domain::user_events::UserEvent;

/// Partial profile update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Authentication and account use-cases over the user store.
pub struct AuthService<R, H, P> {
    users: Arc<R>,
    hasher: Arc<H>,
    events: Arc<P>,
    tokens: Arc<TokenService>,
}

impl<R, H, P> AuthService<R, H, P> {
    /// Wire the service with its collaborators.
    pub fn new(users: Arc<R>, hasher: Arc<H>, events: Arc<P>, tokens: Arc<TokenService>) -> Self {
        Self {
            users,
            hasher,
            events,
            tokens,
        }
    }
}

impl<R, H, P> AuthService<R, H, P>
where
    R: UserRepository,
    H: PasswordHasher,
    P: UserEventPublisher,
{
    /// Register a new account and announce it to the change notifier.
    pub async fn signup(&self, details: SignupDetails) -> Result<User, DomainError> {
        if self
            .users
            .find_by_email(details.email())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(DomainError::conflict("User already exists."));
        }

        let password_hash = self
            .hasher
            .hash(details.password())
            .await
            .map_err(|err| DomainError::internal(err.to_string()))?;
        let user = User::new(
            UserId::random(),
            details.name().clone(),
            details.email().clone(),
            password_hash,
            details.role(),
        );

        // The insert re-checks uniqueness so a racing signup still loses.
        self.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "user created");
        self.emit(UserEvent::created(&user)).await;
        Ok(user)
    }

    /// Verify credentials and mint a token pair.
    ///
    /// Unknown email and wrong password produce the same denial so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<(TokenPair, User), DomainError> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(bad_credentials)?;

        let matches = self
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .await
            .map_err(|err| DomainError::internal(err.to_string()))?;
        if !matches {
            return Err(bad_credentials());
        }

        let pair = self
            .tokens
            .issue(&user.id)
            .map_err(|err| DomainError::internal(err.to_string()))?;
        Ok((pair, user))
    }

    /// Exchange a refresh token for a fresh pair.
    ///
    /// A rejected token is an authentication denial; a failure to mint the
    /// replacement pair is an internal fault, not the caller's doing.
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        self.tokens.refresh(refresh_token).map_err(|err| match err {
            TokenRefreshError::Rejected(_) => {
                DomainError::unauthorized("Invalid refresh token.")
            }
            TokenRefreshError::Issue(err) => DomainError::internal(err.to_string()),
        })
    }

    /// Load the caller's own account.
    pub async fn profile(&self, user_id: &UserId) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| DomainError::not_found("User not found."))
    }

    /// Apply a partial profile update and announce the change.
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut user = self.profile(user_id).await?;
        if let Some(name) = update.name {
            user.name = DisplayName::new(name)
                .map_err(|err| DomainError::invalid_request(err.to_string()))?;
        }
        if let Some(bio) = update.bio {
            user.bio = bio;
        }
        if let Some(avatar) = update.avatar {
            user.avatar = avatar;
        }
        self.users.update(&user).await.map_err(map_user_error)?;
        self.emit(UserEvent::updated(&user)).await;
        Ok(user)
    }

    /// Best-effort event emission: a down notifier never fails the caller.
    async fn emit(&self, event: UserEvent) {
        let kind = event.kind();
        if let Err(err) = self.events.publish(event).await {
            warn!(%err, kind, "user event dropped");
        }
    }
}

fn bad_credentials() -> DomainError {
    DomainError::invalid_request("Incorrect email or password.")
}

fn map_user_error(error: UserPersistenceError) -> DomainError {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => {
            DomainError::conflict("User already exists.")
        }
        other => DomainError::internal(other.to_string()),
    }
}
