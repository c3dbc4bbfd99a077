//! Durable storage for session credentials.

use crate::errors::{ClientError, ClientResult};
use crate::session::Session;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, error};

/// On-disk layout: the two tokens under fixed keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl PersistedTokens {
    fn from_session(session: &Session) -> Self {
        Self {
            access_token: session.access_token.clone(),
            refresh_token: session.refresh_token.clone(),
        }
    }

    fn into_session(self) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            current_user: None,
        }
    }
}

/// Persists credentials across process restarts.
///
/// Tokens are opaque to implementations; nothing here inspects them.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Reads the persisted tokens; an empty session if none were saved.
    async fn load(&self) -> ClientResult<Session>;

    /// Persists the session's tokens. The cached user is not stored.
    async fn save(&self, session: &Session) -> ClientResult<()>;

    /// Removes all persisted credentials. Clearing an empty store is a no-op.
    async fn clear(&self) -> ClientResult<()>;
}

/// Keeps tokens in memory only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: RwLock<PersistedTokens>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds a saved session.
    pub fn with_tokens(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            tokens: RwLock::new(PersistedTokens {
                access_token: Some(access_token.into()),
                refresh_token: Some(refresh_token.into()),
            }),
        }
    }

    /// What a reload would see.
    pub async fn persisted(&self) -> PersistedTokens {
        self.tokens.read().await.clone()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> ClientResult<Session> {
        Ok(self.tokens.read().await.clone().into_session())
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        *self.tokens.write().await = PersistedTokens::from_session(session);
        Ok(())
    }

    async fn clear(&self) -> ClientResult<()> {
        *self.tokens.write().await = PersistedTokens::default();
        Ok(())
    }
}

/// Stores tokens as a small JSON file, readable only by the current user.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn write_atomically(&self, contents: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, contents).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o600)).await?;
        }

        tokio::fs::rename(&temp, &self.path).await
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> ClientResult<Session> {
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No session file at {}", self.path.display());
                return Ok(Session::default());
            }
            Err(e) => {
                error!("Failed to read session file {}: {}", self.path.display(), e);
                return Err(ClientError::storage(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let tokens: PersistedTokens = serde_json::from_slice(&contents).map_err(|e| {
            ClientError::storage(format!(
                "Session file {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })?;

        Ok(tokens.into_session())
    }

    async fn save(&self, session: &Session) -> ClientResult<()> {
        let contents = serde_json::to_vec_pretty(&PersistedTokens::from_session(session))
            .map_err(|e| ClientError::storage(format!("Failed to encode session: {}", e)))?;

        self.write_atomically(&contents).await.map_err(|e| {
            error!("Failed to write session file {}: {}", self.path.display(), e);
            ClientError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    async fn clear(&self) -> ClientResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                error!("Failed to remove session file {}: {}", self.path.display(), e);
                Err(ClientError::storage(format!(
                    "Failed to remove {}: {}",
                    self.path.display(),
                    e
                )))
            }
        }
    }
}
