use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{AccountType, UserId};

/// Tokens stay valid for 30 days after issue, there is no refresh
pub const TOKEN_LIFETIME_DAYS: i64 = 30;

/// Claims carried by a session token. The whole payload is what the
/// whoami endpoint echoes back to the caller.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    /// Email the token was issued to
    pub email: UserId,
    /// Account tier at the moment of issue
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Unix timestamp of issue
    pub iat: i64,
    /// Unix timestamp after which the token is rejected
    pub exp: i64,
}

impl TokenPayload {
    pub fn new(email: &str, account_type: AccountType) -> Self {
        let iat = Utc::now().timestamp();
        let exp = iat + Duration::days(TOKEN_LIFETIME_DAYS).num_seconds();
        TokenPayload {
            email: email.to_owned(),
            account_type,
            iat,
            exp,
        }
    }

    /// Sign the claims with the configured service secret
    pub fn encode(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify signature and expiry, give the claims back. Callers treat
    /// any failure the same way, so the error is not differentiated here.
    pub fn decode(token: &str, secret: &str) -> Result<TokenPayload, jsonwebtoken::errors::Error> {
        let token_data = decode::<TokenPayload>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(token_data.claims)
    }
}
