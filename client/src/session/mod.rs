//! Credential state for the running client.
//!
//! `SessionState` is the single source of truth for the access token, the
//! refresh token and the cached current user. It is created explicitly and
//! handed to the `ApiClient`; every write goes through the configured
//! `SessionStore` so the session survives restarts.

pub mod store;

pub use store::{FileSessionStore, MemorySessionStore, PersistedTokens, SessionStore};

use crate::errors::ClientResult;
use crate::models::User;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Tokens and the cached user.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub current_user: Option<User>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.current_user.is_none()
    }
}

// Tokens stay out of logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("current_user", &self.current_user.as_ref().map(|u| &u.email))
            .finish()
    }
}

/// Token pair issued by the credential and refresh endpoints.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenPair {
    pub access: String,
    /// Only present when the backend rotates refresh tokens.
    #[serde(default)]
    pub refresh: Option<String>,
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("access", &"<redacted>")
            .field("refresh", &self.refresh.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Shared, injectable handle on the session.
#[derive(Clone)]
pub struct SessionState {
    session: Arc<RwLock<Session>>,
    store: Arc<dyn SessionStore>,
}

impl SessionState {
    /// Starts with an empty session backed by `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::default())),
            store,
        }
    }

    /// Loads whatever `store` persisted earlier.
    pub async fn restore(store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        let session = store.load().await?;
        if session.is_authenticated() {
            info!("Restored persisted session");
        }
        Ok(Self {
            session: Arc::new(RwLock::new(session)),
            store,
        })
    }

    pub async fn snapshot(&self) -> Session {
        self.session.read().await.clone()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.session.read().await.access_token.clone()
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.session.read().await.refresh_token.clone()
    }

    pub async fn current_user(&self) -> Option<User> {
        self.session.read().await.current_user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_authenticated()
    }

    /// Replaces the session with freshly issued tokens (login).
    pub async fn establish(&self, tokens: TokenPair) -> ClientResult<()> {
        let mut session = self.session.write().await;
        let next = Session {
            access_token: Some(tokens.access),
            refresh_token: tokens.refresh,
            current_user: None,
        };
        self.store.save(&next).await?;
        *session = next;
        Ok(())
    }

    /// Applies a refresh result: the access token is replaced, the refresh
    /// token only if the backend rotated it.
    pub async fn apply_refresh(&self, tokens: TokenPair) -> ClientResult<()> {
        let mut session = self.session.write().await;
        let mut next = session.clone();
        next.access_token = Some(tokens.access);
        if let Some(refresh) = tokens.refresh {
            next.refresh_token = Some(refresh);
        }
        self.store.save(&next).await?;
        *session = next;
        Ok(())
    }

    pub async fn set_current_user(&self, user: Option<User>) {
        self.session.write().await.current_user = user;
    }

    /// Drops all credentials, in memory and in the store.
    ///
    /// The in-memory session is cleared even if the store fails.
    pub async fn clear(&self) -> ClientResult<()> {
        let mut session = self.session.write().await;
        *session = Session::default();
        self.store.clear().await
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionState").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(access: &str, refresh: Option<&str>) -> TokenPair {
        TokenPair {
            access: access.to_string(),
            refresh: refresh.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_establish_then_restore() {
        let store = Arc::new(MemorySessionStore::new());
        let state = SessionState::new(store.clone());
        state.establish(pair("a1", Some("r1"))).await.unwrap();

        let restored = SessionState::restore(store).await.unwrap();
        assert_eq!(restored.access_token().await.as_deref(), Some("a1"));
        assert_eq!(restored.refresh_token().await.as_deref(), Some("r1"));
        assert!(restored.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_refresh_keeps_refresh_token_unless_rotated() {
        let store = Arc::new(MemorySessionStore::with_tokens("a1", "r1"));
        let state = SessionState::restore(store.clone()).await.unwrap();

        state.apply_refresh(pair("a2", None)).await.unwrap();
        assert_eq!(store.persisted().await.access_token.as_deref(), Some("a2"));
        assert_eq!(store.persisted().await.refresh_token.as_deref(), Some("r1"));

        state.apply_refresh(pair("a3", Some("r2"))).await.unwrap();
        assert_eq!(state.refresh_token().await.as_deref(), Some("r2"));
    }

    #[tokio::test]
    async fn test_clear_drops_everything() {
        let store = Arc::new(MemorySessionStore::with_tokens("a1", "r1"));
        let state = SessionState::restore(store.clone()).await.unwrap();

        state.clear().await.unwrap();
        state.clear().await.unwrap();

        assert!(state.snapshot().await.is_empty());
        assert_eq!(store.persisted().await, PersistedTokens::default());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let session = Session {
            access_token: Some("secret-access".to_string()),
            refresh_token: Some("secret-refresh".to_string()),
            current_user: None,
        };
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
