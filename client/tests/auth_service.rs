mod common;

use campusconnect::auth::RegisterRequest;
use campusconnect::http::Route;
use campusconnect::session::PersistedTokens;
use campusconnect::{AuthService, AuthState, ClientError};
use common::{anonymous, logged_in, user_json};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_login_establishes_session() {
    let ctx = anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({"email": "a@b.com", "password": "x"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access": "a1", "refresh": "r1"})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/profile/"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    assert_eq!(auth.state().await, AuthState::Anonymous);

    let user = auth.login("a@b.com", "x").await.unwrap();
    assert_eq!(user.id_string(), "1");

    let session = ctx.client.session().snapshot().await;
    assert!(session.access_token.is_some_and(|t| !t.is_empty()));
    assert!(session.refresh_token.is_some_and(|t| !t.is_empty()));
    assert_eq!(session.current_user.map(|u| u.id), Some(json!(1)));
    assert_eq!(auth.state().await, AuthState::Authenticated);
    assert_eq!(
        ctx.store.persisted().await,
        PersistedTokens {
            access_token: Some("a1".to_string()),
            refresh_token: Some("r1".to_string()),
        }
    );
}

#[tokio::test]
async fn test_login_with_bad_credentials_stays_anonymous() {
    let ctx = anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    let error = auth.login("a@b.com", "nope").await.unwrap_err();

    assert!(matches!(error, ClientError::Unauthorized(_)));
    assert_eq!(
        error.user_message(),
        "No active account found with the given credentials"
    );
    assert_eq!(auth.state().await, AuthState::Anonymous);
}

#[tokio::test]
async fn test_login_rejects_invalid_input_locally() {
    let ctx = anonymous().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let error = AuthService::new(&ctx.client)
        .login("not-an-email", "")
        .await
        .unwrap_err();

    match error {
        ClientError::InvalidInput { message } => {
            assert!(message.contains("Email: Enter a valid email address"));
            assert!(message.contains("Password: Password is required"));
        }
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}

#[tokio::test]
async fn test_register_points_to_login() {
    let ctx = anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/register/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(user_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    let route = auth
        .register(RegisterRequest {
            name: "Asha Rao".to_string(),
            email: "a@b.com".to_string(),
            password: "correct-horse".to_string(),
            password2: "correct-horse".to_string(),
            mobile: None,
            address: None,
        })
        .await
        .unwrap();

    assert_eq!(route, Route::Login);
    assert_eq!(auth.state().await, AuthState::Anonymous);
}

#[tokio::test]
async fn test_register_surfaces_field_errors() {
    let ctx = anonymous().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/register/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["user with this email already exists."]
        })))
        .mount(&ctx.server)
        .await;

    let error = AuthService::new(&ctx.client)
        .register(RegisterRequest {
            name: "Asha Rao".to_string(),
            email: "a@b.com".to_string(),
            password: "correct-horse".to_string(),
            password2: "correct-horse".to_string(),
            mobile: None,
            address: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(error, ClientError::Validation(_)));
    assert_eq!(
        error.user_message(),
        "Email: user with this email already exists."
    );
}

#[tokio::test]
async fn test_logout_clears_session_when_server_fails() {
    let ctx = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/accounts/logout/"))
        .and(body_json(json!({"refresh": "r1"})))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    auth.logout().await.unwrap();

    assert_eq!(auth.state().await, AuthState::Anonymous);
    assert_eq!(ctx.store.persisted().await, PersistedTokens::default());
    assert_eq!(ctx.navigator.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn test_logout_clears_session_when_endpoint_missing() {
    let ctx = logged_in().await;
    let auth = AuthService::new(&ctx.client);
    // Nothing is mounted, so wiremock answers 404.
    auth.logout().await.unwrap();

    assert!(ctx.client.session().snapshot().await.is_empty());
    assert_eq!(ctx.store.persisted().await, PersistedTokens::default());
}

#[tokio::test]
async fn test_current_user_without_session() {
    let ctx = anonymous().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let user = AuthService::new(&ctx.client).get_current_user().await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn test_current_user_with_valid_token() {
    let ctx = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/token/verify/"))
        .and(body_json(json!({"token": "a1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&ctx.server)
        .await;

    let user = AuthService::new(&ctx.client)
        .get_current_user()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.department(), Some("CSE"));
    assert_eq!(ctx.client.session().current_user().await, Some(user));
}

#[tokio::test]
async fn test_current_user_refreshes_rejected_token() {
    let ctx = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/token/verify/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Token is invalid or expired",
            "code": "token_not_valid"
        })))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a2"})))
        .expect(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/profile/"))
        .and(header("authorization", "Bearer a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let user = AuthService::new(&ctx.client).get_current_user().await.unwrap();
    assert!(user.is_some());
}

#[tokio::test]
async fn test_current_user_none_when_refresh_fails() {
    let ctx = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/token/verify/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    assert!(auth.get_current_user().await.unwrap().is_none());
    assert_eq!(auth.state().await, AuthState::Anonymous);
    assert_eq!(ctx.navigator.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn test_current_user_refreshes_only_once() {
    let ctx = logged_in().await;
    Mock::given(method("POST"))
        .and(path("/api/token/verify/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a2"})))
        .up_to_n_times(1)
        .mount(&ctx.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access": "a3"})))
        .mount(&ctx.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/profile/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.server)
        .await;

    let user = AuthService::new(&ctx.client).get_current_user().await.unwrap();
    assert!(user.is_none());

    let requests = ctx.server.received_requests().await.unwrap();
    let refreshes = requests
        .iter()
        .filter(|r| r.url.path() == "/api/token/refresh/")
        .count();
    assert_eq!(refreshes, 1);
    let profile_auth: Vec<_> = requests
        .iter()
        .filter(|r| r.url.path() == "/api/accounts/profile/")
        .filter_map(|r| r.headers.get("authorization")?.to_str().ok())
        .collect();
    assert_eq!(profile_auth, vec!["Bearer a2"]);
}

#[tokio::test]
async fn test_change_password() {
    let ctx = logged_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/accounts/change-password/"))
        .and(body_json(json!({
            "old_password": "old-secret",
            "password": "new-secret-1",
            "password2": "new-secret-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Password updated successfully"
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    auth.change_password("old-secret", "new-secret-1", "new-secret-1")
        .await
        .unwrap();

    let mismatch = auth
        .change_password("old-secret", "new-secret-1", "new-secret-2")
        .await;
    assert!(matches!(mismatch, Err(ClientError::InvalidInput { .. })));
}

#[tokio::test]
async fn test_update_profile_refreshes_cached_user() {
    let ctx = logged_in().await;
    Mock::given(method("PUT"))
        .and(path("/api/accounts/profile/update/"))
        .and(body_json(json!({"name": "Asha R."})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Asha R."})))
        .expect(1)
        .mount(&ctx.server)
        .await;
    let mut updated = user_json();
    updated["name"] = json!("Asha R.");
    Mock::given(method("GET"))
        .and(path("/api/accounts/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(updated))
        .mount(&ctx.server)
        .await;

    let user = AuthService::new(&ctx.client)
        .update_profile(campusconnect::auth::UpdateProfileRequest {
            name: Some("Asha R.".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Asha R.");
    assert_eq!(
        ctx.client.session().current_user().await.map(|u| u.name),
        Some("Asha R.".to_string())
    );
}

#[tokio::test]
async fn test_delete_account_ends_session() {
    let ctx = logged_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/accounts/delete-account/"))
        .and(body_json(json!({"password": "secret"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&ctx.server)
        .await;

    let auth = AuthService::new(&ctx.client);
    auth.delete_account("secret").await.unwrap();

    assert_eq!(auth.state().await, AuthState::Anonymous);
    assert_eq!(ctx.navigator.routes(), vec![Route::Login]);
}

#[tokio::test]
async fn test_check_auth() {
    let ctx = logged_in().await;
    Mock::given(method("GET"))
        .and(path("/api/accounts/check-auth/"))
        .and(header("authorization", "Bearer a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "isAuthenticated": true,
            "user": user_json()
        })))
        .mount(&ctx.server)
        .await;

    let response = AuthService::new(&ctx.client).check_auth().await.unwrap();
    assert!(response.is_authenticated);
    assert_eq!(response.user.map(|u| u.email), Some("a@b.com".to_string()));
}
