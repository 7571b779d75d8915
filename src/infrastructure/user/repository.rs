//! In-memory credential store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::user::{CredentialStore, User, UserId, UserRecord};
use crate::domain::DomainError;

/// Users keyed by ID plus the email -> user ID index
///
/// Both maps live behind one lock so they are always read and written
/// together.
#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<String, UserRecord>,
    by_email: HashMap<String, String>,
}

/// In-memory implementation of CredentialStore
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<Users>>,
}

impl InMemoryCredentialStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<UserId, DomainError> {
        let mut users = self.users.write().await;

        if users.by_email.contains_key(email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let id = UserId::generate();
        let record = UserRecord::new(User::new(id.clone(), email), password_hash);

        users.by_email.insert(email.to_string(), id.as_str().to_string());
        users.by_id.insert(id.as_str().to_string(), record);

        Ok(id)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;

        Ok(users
            .by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users.by_id.get(id.as_str()).cloned())
    }
}

#[cfg(test)]
impl InMemoryCredentialStore {
    /// Number of stored users
    pub(crate) async fn len(&self) -> usize {
        self.users.read().await.by_id.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryCredentialStore::new();

        let id = store.create_user("a@b.com", "hash").await.unwrap();

        let by_email = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(by_email.user().id(), &id);
        assert_eq!(by_email.password_hash(), "hash");

        let by_id = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(by_id.user().email(), "a@b.com");
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let store = InMemoryCredentialStore::new();

        let first = store.create_user("a@b.com", "h").await.unwrap();
        let second = store.create_user("c@d.com", "h").await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = InMemoryCredentialStore::new();
        store.create_user("a@b.com", "h1").await.unwrap();

        let result = store.create_user("a@b.com", "h2").await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
        assert_eq!(store.len().await, 1);

        let kept = store.find_by_email("a@b.com").await.unwrap().unwrap();
        assert_eq!(kept.password_hash(), "h1");
    }

    #[tokio::test]
    async fn test_email_lookup_is_exact() {
        let store = InMemoryCredentialStore::new();
        store.create_user("a@b.com", "h").await.unwrap();

        assert!(store.find_by_email("A@B.COM").await.unwrap().is_none());
        assert!(store.email_exists("a@b.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_lookups_return_none() {
        let store = InMemoryCredentialStore::new();

        assert_eq!(store.len().await, 0);
        assert!(store.find_by_email("nobody@x.com").await.unwrap().is_none());
        assert!(store.find_by_id(&UserId::new("missing").unwrap()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_registration() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create_user("race@x.com", "h").await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_registration_and_lookup() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let seed = store.create_user("seed@x.com", "h").await.unwrap();

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                let seed = seed.clone();
                tokio::spawn(async move {
                    for j in 0..200 {
                        if i % 2 == 0 {
                            let email = format!("u{}-{}@x.com", i, j);
                            store.create_user(&email, "h").await.unwrap();
                        } else {
                            let found = store.find_by_email("seed@x.com").await.unwrap();
                            assert_eq!(found.unwrap().user().id(), &seed);
                        }
                    }
                })
            })
            .collect();

        let all = async {
            for handle in handles {
                handle.await.unwrap();
            }
        };

        tokio::time::timeout(Duration::from_secs(20), all)
            .await
            .expect("registrations and lookups stalled");

        assert_eq!(store.len().await, 1 + 32 * 200);
    }
}
