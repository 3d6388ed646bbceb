//! In-memory user repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::user::{EmailAddress, User, UserId};

/// Process-local user store keyed by id, with uniqueness on email.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        // The uniqueness check and the insert share the write lock, so two
        // racing signups cannot both pass it.
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate_email(user.email.as_ref()));
        }
        users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(UserPersistenceError::query(format!(
                "no user with id {}",
                user.id
            ))),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{DisplayName, Role};
    use rstest::rstest;

    fn user(email: &str) -> User {
        User::new(
            UserId::random(),
            DisplayName::new("Ada").expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
            "hash".to_owned(),
            Role::User,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn insert_then_lookup_by_id_and_email() {
        let repo = InMemoryUserRepository::default();
        let ada = user("ada@example.com");
        repo.insert(&ada).await.expect("insert succeeds");

        assert_eq!(repo.find_by_id(&ada.id).await.expect("query"), Some(ada.clone()));
        assert_eq!(
            repo.find_by_email(&ada.email).await.expect("query"),
            Some(ada)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = InMemoryUserRepository::default();
        repo.insert(&user("ada@example.com"))
            .await
            .expect("first insert");
        let err = repo
            .insert(&user("ada@example.com"))
            .await
            .expect_err("duplicate rejected");
        assert!(matches!(
            err,
            UserPersistenceError::DuplicateEmail { .. }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_the_stored_record() {
        let repo = InMemoryUserRepository::default();
        let mut ada = user("ada@example.com");
        repo.insert(&ada).await.expect("insert");

        ada.is_banned = true;
        repo.update(&ada).await.expect("update");
        let stored = repo
            .find_by_id(&ada.id)
            .await
            .expect("query")
            .expect("present");
        assert!(stored.is_banned);
    }

    #[rstest]
    #[tokio::test]
    async fn updating_a_missing_user_fails() {
        let repo = InMemoryUserRepository::default();
        let err = repo
            .update(&user("ghost@example.com"))
            .await
            .expect_err("missing user");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
