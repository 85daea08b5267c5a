use chrono::prelude::*;
use serde::{Deserialize, Serialize};

use sovereign_api::domain::{AccountStatus, AccountType, UserId};

/// Stored user account. This type never crosses the HTTP boundary, the
/// password hash stays inside the storage layer.
#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct UserRecord {
    /// It is unique user ID within the system: the email the account was registered under
    pub email: UserId,
    /// Bcrypt hash of the account password
    pub password_hash: String,
    /// Full name, collected for premium signups only
    pub name: Option<String>,
    /// Account tier chosen at registration, fixed for the account lifetime
    pub account_type: AccountType,
    /// Approval state of the account
    pub status: AccountStatus,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Simple accounts are served right after signup
    pub fn simple(email: &str, password_hash: String, created_at: DateTime<Utc>) -> Self {
        UserRecord {
            email: email.to_owned(),
            password_hash,
            name: None,
            account_type: AccountType::Simple,
            status: AccountStatus::Accepted,
            created_at,
        }
    }

    /// Premium accounts start pending and wait for the administrator
    pub fn premium(
        email: &str,
        password_hash: String,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Self {
        UserRecord {
            email: email.to_owned(),
            password_hash,
            name: Some(name.to_owned()),
            account_type: AccountType::Premium,
            status: AccountStatus::Pending,
            created_at,
        }
    }

    /// Move the account to the accepted state. Approving an already
    /// accepted account changes nothing.
    pub fn approve(&mut self) {
        self.status = AccountStatus::Accepted;
    }
}
