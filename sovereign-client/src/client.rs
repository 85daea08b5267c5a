use log::*;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use sovereign_api::types::{
    ApproveUserRequest, LoginRequest, RegisterPremiumRequest, RegisterSimpleRequest,
    StatusResponse, TokenResponse, UserStatusResponse, WhoamiResponse,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Reqwesting server error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("JSON encoding/decoding error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },
}

impl Error {
    /// HTTP status of the failed call, when the server got to answer
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Reqwest(e) => e.status().map(|s| s.as_u16()),
            Error::Json(_) => None,
            Error::Api { status, .. } => Some(*status),
        }
    }
}

/// Alias for a `Result` with the error type `self::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Error bodies come back as {"success": false, "error": "..."}
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct IdentityClient {
    pub client: reqwest::Client,
    pub server: String,
}

impl IdentityClient {
    pub fn new(url: &str) -> Self {
        IdentityClient {
            client: reqwest::Client::new(),
            server: url.to_owned(),
        }
    }

    fn decode_response<T: DeserializeOwned>(status: reqwest::StatusCode, body: &str) -> Result<T> {
        if status.is_success() {
            Ok(serde_json::from_str(body)?)
        } else {
            let message = serde_json::from_str::<ErrorBody>(body)
                .map(|b| b.error)
                .unwrap_or_else(|_| body.to_owned());
            Err(Error::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    pub async fn ping(&self) -> Result<()> {
        let path = "/ping";
        let endpoint = format!("{}{}", self.server, path);
        let request = self.client.get(endpoint).build()?;
        let response = self
            .client
            .execute(request)
            .await?
            .error_for_status()?
            .text()
            .await?;
        debug!("Response {path}: {}", response);
        Ok(())
    }

    pub async fn register_simple(&self, req: &RegisterSimpleRequest) -> Result<TokenResponse> {
        let path = "/register-simple";
        let endpoint = format!("{}{}", self.server, path);
        let request = self.client.post(endpoint).json(req).build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response {path}: {}", body);
        Self::decode_response(status, &body)
    }

    pub async fn register_premium(&self, req: &RegisterPremiumRequest) -> Result<StatusResponse> {
        let path = "/register-premium";
        let endpoint = format!("{}{}", self.server, path);
        let request = self.client.post(endpoint).json(req).build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response {path}: {}", body);
        Self::decode_response(status, &body)
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<TokenResponse> {
        let path = "/login";
        let endpoint = format!("{}{}", self.server, path);
        let request = self.client.post(endpoint).json(req).build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response {path}: {}", body);
        Self::decode_response(status, &body)
    }

    pub async fn user_status(&self, token: &str) -> Result<UserStatusResponse> {
        let path = "/user-status";
        let endpoint = format!("{}{}", self.server, path);
        let request = self
            .client
            .get(endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response {path}: {}", body);
        Self::decode_response(status, &body)
    }

    pub async fn whoami(&self, token: &str) -> Result<WhoamiResponse> {
        let path = "/whoami";
        let endpoint = format!("{}{}", self.server, path);
        let request = self
            .client
            .get(endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response {path}: {}", body);
        Self::decode_response(status, &body)
    }

    pub async fn approve_user(&self, token: &str, req: &ApproveUserRequest) -> Result<StatusResponse> {
        let path = "/approve-user";
        let endpoint = format!("{}{}", self.server, path);
        let request = self
            .client
            .post(endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .json(req)
            .build()?;
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("Response {path}: {}", body);
        Self::decode_response(status, &body)
    }
}
