//! Port abstraction for item persistence: counters and per-user vote records.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::user::UserId;
use crate::domain::vote::{CounterDelta, ItemId, VoteCounters, VoteDirection, VoteState};

/// Persistence errors raised by [`ItemStore`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemPersistenceError {
    /// Store connection could not be established.
    #[error("item store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("item store query failed: {message}")]
    Query { message: String },
    /// The referenced item does not exist.
    #[error("unknown item {item_id}")]
    UnknownItem { item_id: String },
    /// Stored record and counters disagree; the commit was not applied.
    #[error("item store corruption: {message}")]
    Corruption { message: String },
}

impl ItemPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for lookups of missing items.
    pub fn unknown_item(item_id: impl Into<String>) -> Self {
        Self::UnknownItem {
            item_id: item_id.into(),
        }
    }

    /// Helper for record/counter drift.
    pub fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }
}

/// Persistence port for content items and their vote ledger rows.
///
/// `commit_vote` must apply the record change and both counter updates as one
/// atomic unit (a transaction or compensating update); a failure part-way
/// through must not leave record and counters inconsistent.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Create an item with zeroed counters.
    async fn insert_item(&self, item_id: &ItemId) -> Result<(), ItemPersistenceError>;

    /// Delete an item along with every vote record referencing it. Returns
    /// `false` when the item did not exist.
    async fn remove_item(&self, item_id: &ItemId) -> Result<bool, ItemPersistenceError>;

    /// Current counters for an item, or `None` when it does not exist.
    async fn counters(
        &self,
        item_id: &ItemId,
    ) -> Result<Option<VoteCounters>, ItemPersistenceError>;

    /// The direction currently recorded for `(user, item)`, if any.
    async fn vote_of(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> Result<Option<VoteDirection>, ItemPersistenceError>;

    /// Atomically persist a vote transition: replace the `(user, item)`
    /// record with `next` and adjust the item's counters by `delta`,
    /// returning the updated counters.
    async fn commit_vote(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        next: VoteState,
        delta: CounterDelta,
    ) -> Result<VoteCounters, ItemPersistenceError>;
}
