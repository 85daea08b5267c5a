use std::sync::Arc;

use log::*;
use rocket::serde::json::Json;
use rocket::{post, State};
use rocket_okapi::openapi;

use sovereign_api::error;
use sovereign_api::token::TokenPayload;
use sovereign_api::types::{ApproveUserRequest, BearerToken, StatusResponse};
use sovereign_db::storage::UserStorage;

use crate::api::auth::require_session;
use crate::config::IdentityConfig;

/// Guard administrator handles from non-authorized users. Only the token
/// email is checked against the configured administrator, the tier claim
/// is not consulted.
fn guard_admin(
    config: &IdentityConfig,
    token: Option<BearerToken>,
) -> error::Result<TokenPayload> {
    let payload = require_session(config, token)?;
    if payload.email != config.admin_email {
        return Err(error::Error::NotAuthorized.into());
    }
    Ok(payload)
}

#[openapi(tag = "admin")]
#[post("/approve-user", data = "<data>")]
pub async fn approve_user(
    storage: &State<Arc<dyn UserStorage>>,
    config: &State<IdentityConfig>,
    token: Option<BearerToken>,
    data: Json<ApproveUserRequest>,
) -> error::Result<Json<StatusResponse>> {
    guard_admin(config, token)?;
    let status = storage
        .approve(&data.email)
        .await
        .map_err(|e| error::Error::from(e))?;
    info!("Account {} approved, status {status}", data.email);
    Ok(Json(StatusResponse {
        success: true,
        status,
    }))
}
