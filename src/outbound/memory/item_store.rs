//! In-memory item store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ItemPersistenceError, ItemStore};
use crate::domain::user::UserId;
use crate::domain::vote::{CounterDelta, ItemId, VoteCounters, VoteDirection, VoteState};

#[derive(Default)]
struct Tables {
    counters: HashMap<ItemId, VoteCounters>,
    votes: HashMap<(UserId, ItemId), VoteDirection>,
}

/// Process-local item store.
///
/// One `RwLock` guards both tables, so `commit_vote` updates the vote record
/// and the counters as a single unit.
#[derive(Default)]
pub struct InMemoryItemStore {
    tables: RwLock<Tables>,
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn insert_item(&self, item_id: &ItemId) -> Result<(), ItemPersistenceError> {
        let mut tables = self.tables.write().await;
        tables
            .counters
            .entry(item_id.clone())
            .or_insert_with(VoteCounters::default);
        Ok(())
    }

    async fn remove_item(&self, item_id: &ItemId) -> Result<bool, ItemPersistenceError> {
        let mut tables = self.tables.write().await;
        let existed = tables.counters.remove(item_id).is_some();
        if existed {
            tables.votes.retain(|(_, id), _| id != item_id);
        }
        Ok(existed)
    }

    async fn counters(
        &self,
        item_id: &ItemId,
    ) -> Result<Option<VoteCounters>, ItemPersistenceError> {
        Ok(self.tables.read().await.counters.get(item_id).copied())
    }

    async fn vote_of(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> Result<Option<VoteDirection>, ItemPersistenceError> {
        Ok(self
            .tables
            .read()
            .await
            .votes
            .get(&(user_id.clone(), item_id.clone()))
            .copied())
    }

    async fn commit_vote(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        next: VoteState,
        delta: CounterDelta,
    ) -> Result<VoteCounters, ItemPersistenceError> {
        let mut tables = self.tables.write().await;
        let current = *tables
            .counters
            .get(item_id)
            .ok_or_else(|| ItemPersistenceError::unknown_item(item_id.as_ref()))?;
        let updated = current.apply(delta).map_err(|underflow| {
            ItemPersistenceError::corruption(format!(
                "counters for item {item_id} drifted from vote records: {underflow}"
            ))
        })?;
        let key = (user_id.clone(), item_id.clone());
        match next.direction() {
            Some(direction) => {
                tables.votes.insert(key, direction);
            }
            None => {
                tables.votes.remove(&key);
            }
        }
        tables.counters.insert(item_id.clone(), updated);
        Ok(updated)
    }
}
