use okapi::openapi3::{Object, Parameter, ParameterValue};
use rocket::{
    http::Status,
    request::{FromRequest, Outcome, Request},
};
use rocket_okapi::{
    gen::OpenApiGenerator,
    request::{OpenApiFromRequest, RequestHeaderInput},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AccountStatus, AccountType};
use crate::error;
use crate::token::TokenPayload;

/// Body of register-simple requests. Fields the caller left out decode
/// as empty strings and fail the presence check in the handler.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct RegisterSimpleRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPremiumRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    /// Signup is rejected until the caller explicitly agrees
    #[serde(default)]
    pub protocol_agreement: bool,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct ApproveUserRequest {
    #[serde(default)]
    pub email: String,
}

/// Issued by register-simple and login. Stored accounts report their
/// status, the administrator reports the Root tier instead since there
/// is no record behind it.
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
}

/// Returned by register-premium and approve-user
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct StatusResponse {
    pub success: bool,
    pub status: AccountStatus,
}

/// Tier comes from the token, status is re-read from the store so an
/// approval shows up without a fresh login
#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct UserStatusResponse {
    pub success: bool,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub status: AccountStatus,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema, Clone)]
pub struct WhoamiResponse {
    pub success: bool,
    pub payload: TokenPayload,
}

/// Raw session token taken from the Authorization header. The guard only
/// extracts the string, signature checks happen in the handlers where the
/// service config is available. A "Bearer " prefix is accepted and
/// stripped, a bare token passes through unchanged.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct BearerToken(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = error::Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one("Authorization") {
            None => Outcome::Failure((Status::Unauthorized, error::Error::MissingToken)),
            Some(auth) => {
                let token = auth.strip_prefix("Bearer ").unwrap_or(auth);
                if token.is_empty() {
                    Outcome::Failure((Status::Unauthorized, error::Error::MissingToken))
                } else {
                    Outcome::Success(BearerToken(token.to_owned()))
                }
            }
        }
    }
}

impl<'r> OpenApiFromRequest<'r> for BearerToken {
    fn from_request_input(
        gen: &mut OpenApiGenerator,
        _name: String,
        required: bool,
    ) -> rocket_okapi::Result<RequestHeaderInput> {
        let schema = gen.json_schema::<String>();
        let description =
            Some("Session token issued by register-simple or login, sent as \"Bearer <token>\".".to_owned());
        let example = Some(json!("Bearer eyJhbGciOiJIUzI1NiJ9.eyJlbWFpbCI6ImFib2JhQG1haWwuY29tIn0.Q3nZx0"));
        Ok(RequestHeaderInput::Parameter(Parameter {
            name: "Authorization".to_owned(),
            location: "header".to_owned(),
            description: description,
            required,
            deprecated: false,
            allow_empty_value: false,
            value: ParameterValue::Schema {
                style: None,
                explode: None,
                allow_reserved: false,
                schema,
                example: example,
                examples: None,
            },
            extensions: Object::default(),
        }))
    }
}
