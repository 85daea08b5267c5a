use async_trait::async_trait;
use thiserror::Error;

use sovereign_api::domain::{AccountStatus, UserId};

use crate::user::UserRecord;

#[derive(Error, Debug, PartialEq)]
pub enum StorageError {
    #[error("User with ID {0} is already signed up")]
    UserAlreadyExists(UserId),
    #[error("User with ID {0} is not known")]
    UserNotFound(UserId),
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Key-value view over the user set, keyed by email. Implementations
/// synchronize internally, so a shared reference is enough to mutate.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Fetch a record by email
    async fn get(&self, email: &str) -> Result<Option<UserRecord>>;
    /// Store a fresh record. The existence check and the write are one
    /// atomic step: of several concurrent signups under one email exactly
    /// one wins and the rest get `UserAlreadyExists`.
    async fn insert_new(&self, record: UserRecord) -> Result<()>;
    /// Flip the record to the accepted status and report the result.
    /// Fails with `UserNotFound` when no record is stored under the email.
    async fn approve(&self, email: &str) -> Result<AccountStatus>;
}

impl From<StorageError> for sovereign_api::error::Error {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::UserAlreadyExists(_) => Self::UserAlreadyExists,
            StorageError::UserNotFound(_) => Self::UserNotFound,
            StorageError::Backend(msg) => Self::Storage(msg),
        }
    }
}
