//! Port for the change notifier collaborator.
//!
//! The core only emits user lifecycle events; delivery and formatting are the
//! collaborator's concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user_events::UserEvent;

/// Errors surfaced by notifier adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventPublishError {
    /// The notifier is unavailable or has shut down.
    #[error("change notifier unavailable: {message}")]
    Unavailable { message: String },
}

impl EventPublishError {
    /// Helper for notifier outages.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Outbound port delivering user lifecycle events.
///
/// Publishing is best effort: callers log failures and carry on, so a down
/// notifier never fails the originating operation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserEventPublisher: Send + Sync {
    /// Hand one event to the notifier.
    async fn publish(&self, event: UserEvent) -> Result<(), EventPublishError>;
}
