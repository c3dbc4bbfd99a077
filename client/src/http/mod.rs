//! Authenticated HTTP client core.
//!
//! Every backend call goes through [`ApiClient::send`]. The client attaches
//! the session's access token, classifies error responses and recovers from
//! an expired access token by refreshing it once and replaying the request.
//!
//! Refreshes are single-flight: concurrent requests that hit a 401 with the
//! same stale token wait on one refresh and then retry with its result.

pub mod navigator;
pub mod refresh;
pub mod request;

pub use navigator::{Navigator, Route, TracingNavigator, WatchNavigator};
pub use refresh::RefreshProtocol;
pub use request::{AuthMode, FormData, FormPart, RequestBody, RequestDescriptor, Upload};

use crate::config::Config;
use crate::errors::{ClientError, ClientResult, ErrorPayload, RefreshError};
use crate::session::SessionState;
use reqwest::Url;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const USER_AGENT: &str = concat!("CampusConnect/", env!("CARGO_PKG_VERSION"));

/// The token (if any) a request was sent with.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Credential {
    None,
    Session(String),
    Explicit(String),
}

impl Credential {
    fn token(&self) -> Option<&str> {
        match self {
            Credential::None => None,
            Credential::Session(token) | Credential::Explicit(token) => Some(token),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: SessionState,
    refresh: RefreshProtocol,
    refresh_lock: Arc<Mutex<()>>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionState) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        let refresh = RefreshProtocol::new(http.clone(), &config.api_base_url)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            session,
            refresh,
            refresh_lock: Arc::new(Mutex::new(())),
            navigator: Arc::new(TracingNavigator),
        })
    }

    pub fn with_navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends `request` and returns the decoded JSON body.
    ///
    /// An empty success body decodes to `Value::Null`. A 401 on a request
    /// that carried the session token triggers one refresh and one retry;
    /// whatever the retry returns is final.
    pub async fn send(&self, request: &RequestDescriptor) -> ClientResult<Value> {
        let credential = self.credential_for(request).await;

        let first = self.dispatch(request, credential.token(), 1).await;

        match (first, credential) {
            (Err(ClientError::Unauthorized(_)), Credential::Session(stale)) => {
                debug!(path = request.path(), "Access token rejected, refreshing session");
                let token = self.refresh_session(&stale).await?;
                self.dispatch(request, Some(&token), 2).await
            }
            (result, _) => result,
        }
    }

    /// Like [`send`](Self::send), decoding the body into `T`.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> ClientResult<T> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| {
            warn!(path = request.path(), "Unexpected response shape: {}", e);
            ClientError::decode(e.to_string())
        })
    }

    /// Like [`send`](Self::send), abandoning the call once `cancel` fires.
    pub async fn send_cancellable(
        &self,
        request: &RequestDescriptor,
        cancel: &CancellationToken,
    ) -> ClientResult<Value> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(path = request.path(), "Request cancelled");
                Err(ClientError::Cancelled)
            }
            result = self.send(request) => result,
        }
    }

    /// Obtains a fresh access token after `stale_token` was rejected.
    ///
    /// Only one refresh runs at a time. A caller that waited on the lock and
    /// finds the session already holding a different token reuses it instead
    /// of refreshing again. If the refresh fails the session is cleared and
    /// the user is sent to the login screen.
    pub async fn refresh_session(&self, stale_token: &str) -> ClientResult<String> {
        let guard = Arc::clone(&self.refresh_lock).lock_owned().await;

        match self.session.access_token().await {
            Some(current) if current != stale_token => {
                debug!("Session refreshed by a concurrent request");
                return Ok(current);
            }
            Some(_) => {}
            None => {
                // A concurrent refresh failed or the user logged out.
                return Err(ClientError::Unauthenticated {
                    source: RefreshError::NoRefreshToken,
                });
            }
        }

        // The exchange runs on its own task and keeps the lock until the
        // session is updated, even if this caller is dropped.
        let client = self.clone();
        let task = tokio::spawn(async move {
            let _guard = guard;
            client.exchange_tokens().await
        });

        task.await.map_err(|e| {
            error!("Token refresh task failed: {}", e);
            ClientError::Unauthenticated {
                source: RefreshError::Interrupted {
                    message: e.to_string(),
                },
            }
        })?
    }

    async fn exchange_tokens(&self) -> ClientResult<String> {
        let refresh_token = self.session.refresh_token().await;
        match self.refresh.exchange(refresh_token.as_deref()).await {
            Ok(tokens) => {
                let access = tokens.access.clone();
                self.session.apply_refresh(tokens).await?;
                info!("Access token refreshed");
                Ok(access)
            }
            Err(source) => {
                warn!("Token refresh failed, ending session: {}", source);
                if let Err(e) = self.session.clear().await {
                    error!("Failed to clear persisted session: {}", e);
                }
                self.navigator.navigate(Route::Login);
                Err(ClientError::Unauthenticated { source })
            }
        }
    }

    fn url_for(&self, path: &str) -> ClientResult<Url> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            ClientError::invalid_input(format!("Invalid request path '{}': {}", path, e))
        })
    }

    async fn credential_for(&self, request: &RequestDescriptor) -> Credential {
        match request.auth_mode() {
            AuthMode::Anonymous => Credential::None,
            AuthMode::Bearer(token) => Credential::Explicit(token.clone()),
            AuthMode::Session => match self.session.access_token().await {
                Some(token) => Credential::Session(token),
                None => Credential::None,
            },
        }
    }

    /// Builds and sends one attempt of `request`.
    async fn dispatch(
        &self,
        request: &RequestDescriptor,
        token: Option<&str>,
        attempt: u8,
    ) -> ClientResult<Value> {
        let url = self.url_for(request.path())?;
        let mut builder = self.http.request(request.method().clone(), url);

        if !request.query_pairs().is_empty() {
            builder = builder.query(request.query_pairs());
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body() {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(body),
            RequestBody::Form(form) => builder.multipart(form.to_multipart()?),
        };

        debug!(
            method = %request.method(),
            path = request.path(),
            attempt,
            "Sending request"
        );

        let response = builder.send().await.map_err(|e| {
            warn!(path = request.path(), "Request failed: {}", e);
            ClientError::Network(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            return serde_json::from_slice(&body).map_err(|e| ClientError::decode(e.to_string()));
        }

        let error = ClientError::from_status(status, ErrorPayload::from_body(&body));
        if status.is_server_error() {
            error!(path = request.path(), status = status.as_u16(), "Backend error");
        } else {
            debug!(path = request.path(), status = status.as_u16(), "Request rejected");
        }
        Err(error)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
