//! Entry point for the CampusConnect client.
//!
//! Restores the persisted session, resolves the current user against the
//! backend and reports the resulting authentication state.

use anyhow::{Context, Result};
use campusconnect::{ApiClient, AuthService, Config, FileSessionStore, SessionState};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::fmt::init;

#[tokio::main]
async fn main() -> Result<()> {
    init();

    let config = Config::from_env()?;
    info!("Using CampusConnect API at {}", config.api_base_url);

    let store = Arc::new(FileSessionStore::new(&config.session_file));
    let session = SessionState::restore(store)
        .await
        .with_context(|| {
            format!(
                "Failed to restore session from {}",
                config.session_file.display()
            )
        })?;

    let client = ApiClient::new(&config, session).context("Failed to build HTTP client")?;
    let auth = AuthService::new(&client);

    match auth.get_current_user().await {
        Ok(Some(user)) => info!(
            "Authenticated as {} <{}>{}",
            user.name,
            user.email,
            if user.is_admin() { " (admin)" } else { "" }
        ),
        Ok(None) => info!("Not logged in"),
        Err(e) => warn!("Could not resolve current user: {}", e.user_message()),
    }

    info!("Auth state: {:?}", auth.state().await);
    Ok(())
}
