use std::fmt::Display;

use okapi::openapi3::Responses;
use rocket::Response;
use rocket::{http::Status, response::Responder};
use rocket_okapi::okapi::schemars::JsonSchema;
use rocket_okapi::response::OpenApiResponderInner;
use rocket_okapi::util::add_schema_response;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ErrorMessage>;

pub trait SovereignError {
    /// Error subtype, defines concrete error enum: identity_api, storage etc
    fn subtype() -> &'static str;
    /// Internal error code. Paired with subtype uniquely defines the error
    fn code(&self) -> u16;
    /// Server status code: 400, 401, 500 etc
    fn status(&self) -> u16;
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ErrorMessage {
    /// Internal code of the error. Paired with subtype uniquely defines the error
    pub code: u16,
    /// Subtype
    pub subtype: String,
    /// Server code of the error: 400, 401, 500 etc
    pub status: u16,
    /// Error message
    pub message: String,
}

impl<E: SovereignError + Display> From<E> for ErrorMessage {
    fn from(err: E) -> ErrorMessage {
        ErrorMessage {
            code: err.code(),
            status: err.status(),
            message: format!("{err}"),
            subtype: E::subtype().to_string(),
        }
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for ErrorMessage {
    fn respond_to(self, _: &'r rocket::Request<'_>) -> rocket::response::Result<'o> {
        rocket::error_!("[{}:{}]: {}", self.subtype, self.code, self.message);
        // Internal failures keep their details in the log only
        let message = if self.status >= 500 {
            "Internal server error".to_owned()
        } else {
            self.message
        };
        let resp = json!({
            "success": false,
            "error": message
        });
        let resp = serde_json::to_string(&resp).unwrap_or_default();
        Response::build()
            .status(Status::from_code(self.status).unwrap_or_default())
            .header(rocket::http::ContentType::JSON)
            .sized_body(resp.len(), std::io::Cursor::new(resp))
            .ok()
    }
}

impl OpenApiResponderInner for ErrorMessage {
    fn responses(
        gen: &mut rocket_okapi::gen::OpenApiGenerator,
    ) -> rocket_okapi::Result<okapi::openapi3::Responses> {
        let mut responses = Responses::default();
        let schema = gen.json_schema::<ErrorMessage>();
        add_schema_response(&mut responses, 200, "application/json", schema.into())?;
        Ok(responses)
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("Missing fields")]
    MissingFields,
    #[error("Protocol not agreed")]
    ProtocolNotAgreed,
    #[error("Missing credentials")]
    MissingCredentials,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing token")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Not authorized")]
    NotAuthorized,
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Password hash failed: {0}")]
    Pwhash(#[from] pwhash::error::Error),
    #[error("Token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl SovereignError for Error {
    fn subtype() -> &'static str {
        "identity_api"
    }

    fn code(&self) -> u16 {
        match self {
            Error::MissingFields => 0,
            Error::ProtocolNotAgreed => 1,
            Error::MissingCredentials => 2,
            Error::InvalidCredentials => 3,
            Error::MissingToken => 4,
            Error::InvalidToken => 5,
            Error::NotAuthorized => 6,
            Error::UserNotFound => 7,
            Error::UserAlreadyExists => 8,
            Error::Pwhash(_) => 9,
            Error::Token(_) => 10,
            Error::Storage(_) => 11,
        }
    }

    fn status(&self) -> u16 {
        match self {
            Error::MissingFields => 400,
            Error::ProtocolNotAgreed => 400,
            Error::MissingCredentials => 400,
            Error::InvalidCredentials => 401,
            Error::MissingToken => 401,
            Error::InvalidToken => 401,
            Error::NotAuthorized => 403,
            Error::UserNotFound => 404,
            Error::UserAlreadyExists => 409,
            Error::Pwhash(_) => 500,
            Error::Token(_) => 500,
            Error::Storage(_) => 500,
        }
    }
}
