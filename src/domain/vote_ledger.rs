//! Vote ledger: serialised, idempotent vote casting over the item store.
//!
//! Each `(user, item)` pair gets an advisory async mutex from a shared lock
//! table. The lock covers the record lookup, the transition decision, and
//! the counter commit, so no second cast for the same pair can interleave
//! against a stale read. A cast that finds the lock already held is rejected
//! rather than queued: the duplicate is almost always a double-submit, and
//! rejecting it keeps the first request's effect intact.
//!
//! The table is process-local. A multi-process deployment must push the
//! exclusion into the persistence layer (conditional or optimistic updates)
//! instead of relying on this table.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::domain::error::DomainError;
use crate::domain::ports::{ItemPersistenceError, ItemStore};
use crate::domain::user::UserId;
use crate::domain::vote::{ItemId, VoteCounters, VoteDirection, VoteState};

type VoteKey = (UserId, ItemId);

/// Serialises and applies vote transitions.
pub struct VoteLedger<S> {
    items: Arc<S>,
    locks: DashMap<VoteKey, Arc<Mutex<()>>>,
}

impl<S> VoteLedger<S> {
    /// Build a ledger over the given item store.
    pub fn new(items: Arc<S>) -> Self {
        Self {
            items,
            locks: DashMap::new(),
        }
    }

    /// Number of keys currently tracked by the lock table.
    #[cfg(test)]
    fn lock_table_len(&self) -> usize {
        self.locks.len()
    }
}

impl<S: ItemStore> VoteLedger<S> {
    /// Apply one vote request for `(user, item)` and return the updated
    /// counters.
    ///
    /// The transition table (record lookup, decision, counter update) runs as
    /// a single atomic unit per key. A concurrent duplicate for the same key
    /// is rejected with a conflict; casts for other users or items proceed
    /// freely.
    pub async fn cast_vote(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        direction: VoteDirection,
    ) -> Result<VoteCounters, DomainError> {
        let key = (user_id.clone(), item_id.clone());
        let gate = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let result = match gate.try_lock() {
            Ok(_guard) => self.apply_cast(user_id, item_id, direction).await,
            Err(_) => {
                debug!(user_id = %user_id, item_id = %item_id, "duplicate in-flight vote rejected");
                Err(DomainError::conflict(
                    "A vote for this item is already being processed.",
                ))
            }
        };

        // The guard is gone either way; drop our handle and evict the entry
        // once nothing else holds it, so the table only tracks in-flight keys.
        drop(gate);
        self.locks.remove_if(&key, |_, gate| Arc::strong_count(gate) == 1);

        result
    }

    async fn apply_cast(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        direction: VoteDirection,
    ) -> Result<VoteCounters, DomainError> {
        // Existence check first so a vote on a missing item is NotFound, not
        // a failed commit.
        self.items
            .counters(item_id)
            .await
            .map_err(map_item_error)?
            .ok_or_else(|| DomainError::not_found("Item not found."))?;

        let recorded = self
            .items
            .vote_of(user_id, item_id)
            .await
            .map_err(map_item_error)?;
        let transition = VoteState::from_direction(recorded).apply(direction);

        let counters = self
            .items
            .commit_vote(user_id, item_id, transition.next, transition.delta)
            .await
            .map_err(map_item_error)?;
        debug!(
            user_id = %user_id,
            item_id = %item_id,
            direction = %direction,
            up = counters.up_count,
            down = counters.down_count,
            "vote applied"
        );
        Ok(counters)
    }

    /// Delete an item together with all vote records referencing it.
    pub async fn remove_item(&self, item_id: &ItemId) -> Result<(), DomainError> {
        let removed = self
            .items
            .remove_item(item_id)
            .await
            .map_err(map_item_error)?;
        if !removed {
            return Err(DomainError::not_found("Item not found."));
        }
        Ok(())
    }
}

fn map_item_error(error: ItemPersistenceError) -> DomainError {
    match error {
        ItemPersistenceError::UnknownItem { .. } => DomainError::not_found("Item not found."),
        ItemPersistenceError::Corruption { ref message } => {
            error!(%message, "vote ledger corruption detected");
            DomainError::internal(error.to_string())
        }
        other => DomainError::internal(other.to_string()),
    }
}
