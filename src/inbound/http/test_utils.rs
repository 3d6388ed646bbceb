//! Shared fixtures for handler tests.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::auth::SignupDetails;
use crate::domain::ports::{BcryptPasswordHasher, ItemStore, UserRepository};
use crate::domain::token::TokenService;
use crate::domain::user::{Role, User, UserId};
use crate::domain::vote::ItemId;
use crate::domain::{AuthService, VoteLedger};
use crate::inbound::http::state::{HttpState, RefreshCookieConfig};
use crate::outbound::memory::{InMemoryItemStore, InMemoryUserRepository};
use crate::outbound::notifier::ChannelNotifier;

pub const ACCESS_SECRET: &[u8] = b"access-secret-for-tests";
pub const REFRESH_SECRET: &[u8] = b"refresh-secret-for-tests";
pub const PASSWORD: &str = "correcthorse";

/// Wired application state plus direct handles on the backing stores.
pub struct TestHarness {
    pub state: HttpState,
    pub users: Arc<InMemoryUserRepository>,
    pub items: Arc<InMemoryItemStore>,
}

/// Build a harness over in-memory adapters and test token secrets.
pub fn harness() -> TestHarness {
    let users = Arc::new(InMemoryUserRepository::default());
    let items = Arc::new(InMemoryItemStore::default());
    let tokens = Arc::new(TokenService::new(
        ACCESS_SECRET,
        Duration::from_secs(900),
        REFRESH_SECRET,
        Duration::from_secs(60 * 60 * 24 * 14),
    ));
    let auth = Arc::new(AuthService::new(
        Arc::clone(&users),
        Arc::new(BcryptPasswordHasher::fast()),
        Arc::new(ChannelNotifier::default()),
        Arc::clone(&tokens),
    ));
    let ledger = Arc::new(VoteLedger::new(Arc::clone(&items)));
    let state = HttpState::new(
        auth,
        ledger,
        users.clone(),
        tokens,
        RefreshCookieConfig { secure: false },
    );
    TestHarness {
        state,
        users,
        items,
    }
}

impl TestHarness {
    /// Register a regular user through the real signup flow.
    pub async fn signup(&self, email: &str) -> User {
        self.signup_with_role(email, Role::User).await
    }

    /// Register a user with an explicit role.
    pub async fn signup_with_role(&self, email: &str, role: Role) -> User {
        let details = SignupDetails::try_from_parts("Ada Lovelace", email, PASSWORD, Some(role.as_str()))
            .expect("valid signup details");
        self.state
            .auth
            .signup(details)
            .await
            .expect("signup succeeds")
    }

    /// Flip the ban flag on a stored user.
    pub async fn ban(&self, user_id: &UserId) {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await
            .expect("user queryable")
            .expect("user exists");
        user.is_banned = true;
        self.users.update(&user).await.expect("ban persisted");
    }

    /// Mint a valid access token for a user.
    pub fn access_token(&self, user_id: &UserId) -> String {
        self.state
            .tokens
            .issue(user_id)
            .expect("pair issued")
            .access_token
    }

    /// Mint an access token that is already expired, signed with the real
    /// access secret.
    pub fn expired_access_token(&self, user_id: &UserId) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = serde_json::json!({
            "sub": user_id.to_string(),
            "iat": now - 7200,
            "exp": now - 3600,
        });
        jsonwebtoken::encode(
            &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(ACCESS_SECRET),
        )
        .expect("token signed")
    }

    /// Seed an item into the store and return its id.
    pub async fn seed_item(&self) -> ItemId {
        let item = ItemId::random();
        self.items.insert_item(&item).await.expect("item inserted");
        item
    }
}
