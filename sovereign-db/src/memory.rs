use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use sovereign_api::domain::{AccountStatus, UserId};

use crate::storage::{Result, StorageError, UserStorage};
use crate::user::UserRecord;

/// In-memory user set. The write lock spans both the existence check and
/// the insert, which is what makes `insert_new` atomic.
pub struct MemoryStorage {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn get(&self, email: &str) -> Result<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(email).cloned())
    }

    async fn insert_new(&self, record: UserRecord) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.email) {
            return Err(StorageError::UserAlreadyExists(record.email));
        }
        users.insert(record.email.clone(), record);
        Ok(())
    }

    async fn approve(&self, email: &str) -> Result<AccountStatus> {
        let mut users = self.users.write().await;
        match users.get_mut(email) {
            None => Err(StorageError::UserNotFound(email.to_owned())),
            Some(user) => {
                user.approve();
                Ok(user.status)
            }
        }
    }
}
