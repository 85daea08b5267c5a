use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// It is unique user ID within the system: the email the account was
/// registered under. No normalization is applied, keys are case sensitive.
pub type UserId = String;

#[derive(
    Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum AccountType {
    /// Self-service tier, active right after signup
    Simple,
    /// Paid tier, requires approval by the administrator before activation
    Premium,
    /// The configured administrator. Never stored, lives in service config
    Root,
}

impl AccountType {
    pub fn is_root(&self) -> bool {
        matches!(self, AccountType::Root)
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountType::Simple => write!(f, "Simple"),
            AccountType::Premium => write!(f, "Premium"),
            AccountType::Root => write!(f, "Root"),
        }
    }
}

#[derive(
    Debug, Serialize, Deserialize, JsonSchema, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum AccountStatus {
    /// The account is served. Simple accounts start here, premium ones
    /// get here through approval
    Accepted,
    /// Waiting for the administrator decision
    Pending,
    /// Legacy marker kept for wire compatibility, no write path produces it
    Simple,
    /// Reported when a valid token points at no stored record
    Unknown,
}

impl AccountStatus {
    pub fn is_accepted(&self) -> bool {
        matches!(self, AccountStatus::Accepted)
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, AccountStatus::Pending)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccountStatus::Accepted => write!(f, "Accepted"),
            AccountStatus::Pending => write!(f, "Pending"),
            AccountStatus::Simple => write!(f, "Simple"),
            AccountStatus::Unknown => write!(f, "Unknown"),
        }
    }
}
