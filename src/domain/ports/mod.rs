//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (user stores, item stores, the change notifier). Each trait exposes
//! strongly typed errors so adapters map their failures into predictable
//! variants.

mod event_publisher;
mod item_store;
mod password_hasher;
mod user_repository;

pub use event_publisher::{EventPublishError, UserEventPublisher};
pub use item_store::{ItemPersistenceError, ItemStore};
pub use password_hasher::{BcryptPasswordHasher, PasswordHashError, PasswordHasher};
pub use user_repository::{UserPersistenceError, UserRepository};

#[cfg(test)]
pub use event_publisher::MockUserEventPublisher;
#[cfg(test)]
pub use item_store::MockItemStore;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use user_repository::MockUserRepository;
