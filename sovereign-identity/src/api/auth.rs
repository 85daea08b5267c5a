use std::sync::Arc;

use chrono::Utc;
use pwhash::bcrypt;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use rocket_okapi::openapi;

use sovereign_api::domain::{AccountStatus, AccountType};
use sovereign_api::error;
use sovereign_api::token::TokenPayload;
use sovereign_api::types::{
    BearerToken, LoginRequest, RegisterPremiumRequest, RegisterSimpleRequest, StatusResponse,
    TokenResponse, UserStatusResponse, WhoamiResponse,
};
use sovereign_db::storage::UserStorage;
use sovereign_db::user::UserRecord;

use crate::config::IdentityConfig;

const BCRYPT_COST: u32 = 10;

/// Known-good hash to burn a verification on when the email is not
/// stored, so failed logins cost the same with and without a record.
const DUMMY_HASH: &str = "$2a$10$N9qo8uLOickgx2ZMRZoMyeIjZAgcfl7p92ldGxad68LJZdL17lhWy";

fn hash_password(password: &str) -> Result<String, pwhash::error::Error> {
    bcrypt::hash_with(
        bcrypt::BcryptSetup {
            cost: Some(BCRYPT_COST),
            ..Default::default()
        },
        password,
    )
}

/// Helper for endpoints that require a valid session token
pub fn require_session(
    config: &IdentityConfig,
    token: Option<BearerToken>,
) -> error::Result<TokenPayload> {
    let token = token.ok_or(error::Error::MissingToken)?;
    let payload = TokenPayload::decode(&token.0, &config.jwt_secret)
        .map_err(|_| error::Error::InvalidToken)?;
    Ok(payload)
}

#[openapi(tag = "register")]
#[post("/register-simple", data = "<data>")]
pub async fn register_simple(
    storage: &State<Arc<dyn UserStorage>>,
    config: &State<IdentityConfig>,
    data: Json<RegisterSimpleRequest>,
) -> error::Result<Json<TokenResponse>> {
    if data.email.is_empty() || data.password.is_empty() {
        return Err(error::Error::MissingFields.into());
    }
    let pass_hash = hash_password(&data.password).map_err(|e| error::Error::from(e))?;
    let record = UserRecord::simple(&data.email, pass_hash, Utc::now());
    storage
        .insert_new(record)
        .await
        .map_err(|e| error::Error::from(e))?;
    let token = TokenPayload::new(&data.email, AccountType::Simple)
        .encode(&config.jwt_secret)
        .map_err(|e| error::Error::from(e))?;
    Ok(Json(TokenResponse {
        success: true,
        token,
        status: None,
        account_type: None,
    }))
}

#[openapi(tag = "register")]
#[post("/register-premium", data = "<data>")]
pub async fn register_premium(
    storage: &State<Arc<dyn UserStorage>>,
    data: Json<RegisterPremiumRequest>,
) -> error::Result<Json<StatusResponse>> {
    if data.email.is_empty() || data.password.is_empty() || data.full_name.is_empty() {
        return Err(error::Error::MissingFields.into());
    }
    if !data.protocol_agreement {
        return Err(error::Error::ProtocolNotAgreed.into());
    }
    let pass_hash = hash_password(&data.password).map_err(|e| error::Error::from(e))?;
    let record = UserRecord::premium(&data.email, pass_hash, &data.full_name, Utc::now());
    storage
        .insert_new(record)
        .await
        .map_err(|e| error::Error::from(e))?;
    // No token until the administrator approves the account
    Ok(Json(StatusResponse {
        success: true,
        status: AccountStatus::Pending,
    }))
}

#[openapi(tag = "auth")]
#[post("/login", data = "<data>")]
pub async fn login(
    storage: &State<Arc<dyn UserStorage>>,
    config: &State<IdentityConfig>,
    data: Json<LoginRequest>,
) -> error::Result<Json<TokenResponse>> {
    if data.email.is_empty() || data.password.is_empty() {
        return Err(error::Error::MissingCredentials.into());
    }

    // The administrator is configured, not stored. A failed match falls
    // through to the user set, so a stored record under the same email
    // still works.
    if !config.admin_email.is_empty()
        && data.email == config.admin_email
        && !config.admin_password_hash.is_empty()
        && bcrypt::verify(&data.password, &config.admin_password_hash)
    {
        let token = TokenPayload::new(&data.email, AccountType::Root)
            .encode(&config.jwt_secret)
            .map_err(|e| error::Error::from(e))?;
        return Ok(Json(TokenResponse {
            success: true,
            token,
            status: None,
            account_type: Some(AccountType::Root),
        }));
    }

    let user = storage
        .get(&data.email)
        .await
        .map_err(|e| error::Error::from(e))?;
    match user {
        None => {
            // Unknown email or wrong password answer the same way
            let _ = bcrypt::verify(&data.password, DUMMY_HASH);
            Err(error::Error::InvalidCredentials.into())
        }
        Some(user) => {
            if bcrypt::verify(&data.password, &user.password_hash) {
                let token = TokenPayload::new(&user.email, user.account_type)
                    .encode(&config.jwt_secret)
                    .map_err(|e| error::Error::from(e))?;
                Ok(Json(TokenResponse {
                    success: true,
                    token,
                    status: Some(user.status),
                    account_type: None,
                }))
            } else {
                Err(error::Error::InvalidCredentials.into())
            }
        }
    }
}

#[openapi(tag = "session")]
#[get("/user-status")]
pub async fn user_status(
    storage: &State<Arc<dyn UserStorage>>,
    config: &State<IdentityConfig>,
    token: Option<BearerToken>,
) -> error::Result<Json<UserStatusResponse>> {
    let payload = require_session(config, token)?;
    let user = storage
        .get(&payload.email)
        .await
        .map_err(|e| error::Error::from(e))?;
    // Root tokens have no record behind them and report Unknown
    let status = user.map(|u| u.status).unwrap_or(AccountStatus::Unknown);
    Ok(Json(UserStatusResponse {
        success: true,
        account_type: payload.account_type,
        status,
    }))
}

#[openapi(tag = "session")]
#[get("/whoami")]
pub fn whoami(
    config: &State<IdentityConfig>,
    token: Option<BearerToken>,
) -> error::Result<Json<WhoamiResponse>> {
    let payload = require_session(config, token)?;
    Ok(Json(WhoamiResponse {
        success: true,
        payload,
    }))
}
