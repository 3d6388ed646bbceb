//! Domain events emitted towards the change notifier.
//!
//! These events stay transport agnostic so the notifier adapter can map them
//! to whatever envelope its delivery channel needs without re-encoding
//! domain logic.

use serde::Serialize;

use crate::domain::user::{Role, User};
use crate::middleware::trace::TraceId;

/// Snapshot of the user fields worth broadcasting. Never includes the
/// password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_banned: bool,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role,
            is_banned: user.is_banned,
        }
    }
}

/// User lifecycle domain events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// A user record has been created.
    UserCreated {
        trace_id: Option<TraceId>,
        user: UserSummary,
    },
    /// An existing user record has changed.
    UserUpdated {
        trace_id: Option<TraceId>,
        user: UserSummary,
    },
}

impl UserEvent {
    /// Build a creation event, capturing any ambient trace identifier.
    pub fn created(user: &User) -> Self {
        Self::UserCreated {
            trace_id: TraceId::current(),
            user: UserSummary::from(user),
        }
    }

    /// Build an update event, capturing any ambient trace identifier.
    pub fn updated(user: &User) -> Self {
        Self::UserUpdated {
            trace_id: TraceId::current(),
            user: UserSummary::from(user),
        }
    }

    /// Stable wire identifier for the event type.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UserCreated { .. } => "user_created",
            Self::UserUpdated { .. } => "user_updated",
        }
    }

    /// The user snapshot carried by the event.
    pub fn user(&self) -> &UserSummary {
        match self {
            Self::UserCreated { user, .. } | Self::UserUpdated { user, .. } => user,
        }
    }
}
