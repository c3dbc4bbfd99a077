use crate::errors::{ClientError, ClientResult, ErrorPayload, RefreshError};
use crate::session::TokenPair;
use reqwest::Url;
use serde_json::json;
use tracing::debug;

pub const REFRESH_PATH: &str = "api/token/refresh/";

/// Exchanges a refresh token for a new access token.
///
/// Requests go out without an `Authorization` header and never pass through
/// the retry logic of the client core.
#[derive(Debug, Clone)]
pub struct RefreshProtocol {
    http: reqwest::Client,
    endpoint: Url,
}

impl RefreshProtocol {
    pub fn new(http: reqwest::Client, base_url: &Url) -> ClientResult<Self> {
        let endpoint = base_url
            .join(REFRESH_PATH)
            .map_err(|e| ClientError::invalid_input(format!("Invalid refresh endpoint: {}", e)))?;
        Ok(Self { http, endpoint })
    }

    pub async fn exchange(&self, refresh_token: Option<&str>) -> Result<TokenPair, RefreshError> {
        let refresh_token = refresh_token.ok_or(RefreshError::NoRefreshToken)?;

        debug!("Requesting new access token");
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({ "refresh": refresh_token }))
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(RefreshError::Rejected {
                status: status.as_u16(),
                payload: ErrorPayload::from_body(&body),
            });
        }

        let tokens: TokenPair = serde_json::from_slice(&body).map_err(|e| RefreshError::Malformed {
            message: e.to_string(),
        })?;

        if tokens.access.is_empty() {
            return Err(RefreshError::Malformed {
                message: "empty access token".to_string(),
            });
        }

        Ok(tokens)
    }
}
