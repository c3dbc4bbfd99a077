//! Session lifecycle and account operations.

use crate::auth::models::*;
use crate::errors::{ClientError, ClientResult};
use crate::http::{ApiClient, AuthMode, RequestDescriptor, Route};
use crate::models::User;
use crate::session::TokenPair;
use serde_json::json;
use tracing::{debug, info, warn};
use validator::Validate;

const TOKEN_PATH: &str = "api/token/";
const VERIFY_PATH: &str = "api/token/verify/";
const PROFILE_PATH: &str = "api/accounts/profile/";
const PROFILE_UPDATE_PATH: &str = "api/accounts/profile/update/";
const REGISTER_PATH: &str = "api/accounts/register/";
const LOGOUT_PATH: &str = "api/accounts/logout/";
const CHANGE_PASSWORD_PATH: &str = "api/accounts/change-password/";
const DELETE_ACCOUNT_PATH: &str = "api/accounts/delete-account/";
const CHECK_AUTH_PATH: &str = "api/accounts/check-auth/";

/// Authentication service for login, logout and the current user
pub struct AuthService<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Where the session currently stands.
    pub async fn state(&self) -> AuthState {
        if self.client.session().is_authenticated().await {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    /// Exchange credentials for tokens and load the user's profile
    ///
    /// The session is left anonymous if any step fails.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let request = LoginRequest::new(email, password);
        request.validate()?;

        let tokens: TokenPair = self
            .client
            .send_json(&RequestDescriptor::post(TOKEN_PATH).json(&request)?.anonymous())
            .await?;

        let session = self.client.session();
        session.establish(tokens).await?;

        match self.fetch_profile(AuthMode::Session).await {
            Ok(user) => {
                info!("User {} logged in", user.email);
                Ok(user)
            }
            Err(e) => {
                warn!("Profile fetch after login failed: {}", e);
                session.clear().await?;
                Err(e)
            }
        }
    }

    /// Create an account. The user still has to log in afterwards.
    pub async fn register(&self, request: RegisterRequest) -> ClientResult<Route> {
        request.validate()?;

        self.client
            .send(&RequestDescriptor::post(REGISTER_PATH).json(&request)?.anonymous())
            .await?;

        info!("Registered account {}", request.email);
        Ok(Route::Login)
    }

    /// End the session locally, telling the backend on a best-effort basis
    pub async fn logout(&self) -> ClientResult<()> {
        let session = self.client.session().snapshot().await;

        if let Some(refresh) = session.refresh_token.as_deref() {
            let auth = match session.access_token {
                Some(access) => AuthMode::Bearer(access),
                None => AuthMode::Anonymous,
            };
            let request = RequestDescriptor::post(LOGOUT_PATH)
                .json(&json!({ "refresh": refresh }))?
                .auth(auth);

            if let Err(e) = self.client.send(&request).await {
                warn!("Server-side logout failed, clearing session anyway: {}", e);
            }
        }

        let cleared = self.client.session().clear().await;
        self.client.navigator().navigate(Route::Login);
        info!("User logged out");
        cleared
    }

    /// Resolve the logged-in user, refreshing a stale access token once
    ///
    /// Returns `Ok(None)` when there is no session or it can no longer be
    /// authenticated.
    pub async fn get_current_user(&self) -> ClientResult<Option<User>> {
        let Some(token) = self.client.session().access_token().await else {
            debug!("No access token, user is anonymous");
            return Ok(None);
        };

        let verify = RequestDescriptor::post(VERIFY_PATH)
            .json(&json!({ "token": token }))?
            .anonymous();

        // After a refresh the new token is used as-is so a second 401 ends
        // the lookup instead of refreshing again.
        let profile_auth = match self.client.send(&verify).await {
            Ok(_) => AuthMode::Session,
            Err(e) if e.is_auth_failure() => {
                debug!("Access token failed verification, refreshing");
                match self.client.refresh_session(&token).await {
                    Ok(fresh) => AuthMode::Bearer(fresh),
                    Err(e) if e.is_auth_failure() => return Ok(None),
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        match self.fetch_profile(profile_auth).await {
            Ok(user) => Ok(Some(user)),
            Err(e) if e.is_auth_failure() => {
                debug!("Profile fetch not authorized: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn update_profile(&self, update: UpdateProfileRequest) -> ClientResult<User> {
        self.client
            .send(&RequestDescriptor::put(PROFILE_UPDATE_PATH).json(&update)?)
            .await?;

        self.fetch_profile(AuthMode::Session).await
    }

    pub async fn change_password(
        &self,
        old_password: &str,
        new_password: &str,
        confirm_password: &str,
    ) -> ClientResult<()> {
        let request = ChangePasswordRequest {
            old_password: old_password.to_string(),
            password: new_password.to_string(),
            password2: confirm_password.to_string(),
        };
        request.validate()?;

        self.client
            .send(&RequestDescriptor::put(CHANGE_PASSWORD_PATH).json(&request)?)
            .await?;

        info!("Password changed");
        Ok(())
    }

    /// Permanently delete the account, then drop the session
    pub async fn delete_account(&self, password: &str) -> ClientResult<()> {
        if password.is_empty() {
            return Err(ClientError::invalid_input("Password: Password is required"));
        }

        self.client
            .send(
                &RequestDescriptor::delete(DELETE_ACCOUNT_PATH)
                    .json(&json!({ "password": password }))?,
            )
            .await?;

        info!("Account deleted");
        self.client.session().clear().await?;
        self.client.navigator().navigate(Route::Login);
        Ok(())
    }

    /// Ask the backend whether the current credentials are accepted.
    pub async fn check_auth(&self) -> ClientResult<CheckAuthResponse> {
        self.client
            .send_json(&RequestDescriptor::get(CHECK_AUTH_PATH))
            .await
    }

    async fn fetch_profile(&self, auth: AuthMode) -> ClientResult<User> {
        let user: User = self
            .client
            .send_json(&RequestDescriptor::get(PROFILE_PATH).auth(auth))
            .await?;
        self.client.session().set_current_user(Some(user.clone())).await;
        Ok(user)
    }
}
