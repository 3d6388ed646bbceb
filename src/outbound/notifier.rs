//! Broadcast-channel change notifier.
//!
//! Fans user lifecycle events out to in-process subscribers over a tokio
//! broadcast channel. Delivery is fire and forget; a subscriber that lags
//! past the channel capacity drops the oldest events.

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::ports::{EventPublishError, UserEventPublisher};
use crate::domain::user_events::UserEvent;

const DEFAULT_CAPACITY: usize = 256;

/// Change notifier backed by a broadcast channel.
#[derive(Clone)]
pub struct ChannelNotifier {
    sender: broadcast::Sender<UserEvent>,
}

impl ChannelNotifier {
    /// Create a notifier whose channel buffers up to `capacity` events per
    /// subscriber.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Open a new subscription receiving every event published after this
    /// call.
    pub fn subscribe(&self) -> broadcast::Receiver<UserEvent> {
        self.sender.subscribe()
    }
}

impl Default for ChannelNotifier {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl UserEventPublisher for ChannelNotifier {
    async fn publish(&self, event: UserEvent) -> Result<(), EventPublishError> {
        let kind = event.kind();
        // send only fails when no receiver exists, and an event nobody is
        // listening for needs no delivery.
        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(kind, receivers, "published user event");
            }
            Err(_) => {
                debug!(kind, "no subscribers for user event");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{DisplayName, EmailAddress, Role, User, UserId};
    use rstest::rstest;

    fn sample_user() -> User {
        User::new(
            UserId::random(),
            DisplayName::new("Ada").expect("valid name"),
            EmailAddress::new("ada@example.com").expect("valid email"),
            "hash".to_owned(),
            Role::User,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let notifier = ChannelNotifier::with_capacity(8);
        let mut events = notifier.subscribe();
        let user = sample_user();

        notifier
            .publish(UserEvent::created(&user))
            .await
            .expect("publish succeeds");

        let received = events.recv().await.expect("event delivered");
        assert_eq!(received.kind(), "user_created");
        assert_eq!(received.user().id, user.id.to_string());
    }

    #[rstest]
    #[tokio::test]
    async fn publishing_without_subscribers_is_not_an_error() {
        let notifier = ChannelNotifier::with_capacity(8);
        notifier
            .publish(UserEvent::updated(&sample_user()))
            .await
            .expect("publish succeeds");
    }

    #[rstest]
    #[tokio::test]
    async fn clones_share_the_same_channel() {
        let notifier = ChannelNotifier::with_capacity(8);
        let clone = notifier.clone();
        let mut events = notifier.subscribe();

        clone
            .publish(UserEvent::created(&sample_user()))
            .await
            .expect("publish succeeds");
        assert!(events.recv().await.is_ok());
    }
}
