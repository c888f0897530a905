//! Sign-in, sign-out and session restore against a mock backend

mod common;

use common::*;
use foodzippy_client::session::{IDENTITY_KEY, TOKEN_KEY};
use foodzippy_client::{ApiClient, ClientError, RestoreOutcome, SessionStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_stores_token_and_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .and(body_json(json!({"email": "admin@foodzippy.in", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "jwt-123",
            "admin": {"email": "admin@foodzippy.in"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, store) = auth_context(ApiClient::new(server.uri()).unwrap());
    assert!(!auth.is_authenticated());

    let identity = auth.login("admin@foodzippy.in", "secret").await.unwrap();

    assert_eq!(identity.email, "admin@foodzippy.in");
    assert!(auth.is_authenticated());
    assert_eq!(auth.client().token().as_deref(), Some("jwt-123"));
    assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("jwt-123"));
    let saved = store.get(IDENTITY_KEY).await.unwrap().unwrap();
    assert!(saved.contains("admin@foodzippy.in"));
}

#[tokio::test]
async fn test_rejected_login_stores_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"success": false})))
        .mount(&server)
        .await;

    let (auth, store) = auth_context(ApiClient::new(server.uri()).unwrap());
    let err = auth.login("admin@foodzippy.in", "wrong").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Invalid email or password");
    assert!(!auth.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(store.get(IDENTITY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_login_without_token_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&server)
        .await;

    let (auth, store) = auth_context(ApiClient::new(server.uri()).unwrap());
    let err = auth.login("admin@foodzippy.in", "secret").await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_logout_clears_both_keys() {
    let server = MockServer::start().await;
    let (auth, store) = auth_context(ApiClient::new(server.uri()).unwrap());
    store.set(TOKEN_KEY, "jwt-123").await.unwrap();
    store
        .set(IDENTITY_KEY, r#"{"email":"admin@foodzippy.in"}"#)
        .await
        .unwrap();

    auth.logout().await.unwrap();

    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(store.get(IDENTITY_KEY).await.unwrap(), None);
    assert!(matches!(auth.require(), Err(ClientError::NotAuthenticated)));
}

#[tokio::test]
async fn test_restore_without_saved_session_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (auth, _store) = auth_context(ApiClient::new(server.uri()).unwrap());
    assert_eq!(auth.restore().await.unwrap(), RestoreOutcome::SignedOut);
    assert!(!auth.is_authenticated());
}

#[tokio::test]
async fn test_restore_verifies_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/unread-count"))
        .and(header("authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 4})))
        .expect(1)
        .mount(&server)
        .await;

    let (auth, store) = auth_context(ApiClient::new(server.uri()).unwrap());
    store.set(TOKEN_KEY, "jwt-123").await.unwrap();
    store
        .set(IDENTITY_KEY, r#"{"email":"admin@foodzippy.in"}"#)
        .await
        .unwrap();

    let outcome = auth.restore().await.unwrap();

    assert!(matches!(outcome, RestoreOutcome::Verified(ref id) if id.email == "admin@foodzippy.in"));
    assert!(auth.is_authenticated());
}

#[tokio::test]
async fn test_restore_with_rejected_token_clears_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/unread-count"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Token expired"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (auth, store) = auth_context(ApiClient::new(server.uri()).unwrap());
    store.set(TOKEN_KEY, "stale").await.unwrap();
    store
        .set(IDENTITY_KEY, r#"{"email":"admin@foodzippy.in"}"#)
        .await
        .unwrap();

    assert_eq!(auth.restore().await.unwrap(), RestoreOutcome::Expired);
    assert!(!auth.is_authenticated());
    assert_eq!(auth.client().token(), None);
    assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    assert_eq!(store.get(IDENTITY_KEY).await.unwrap(), None);
}

#[tokio::test]
async fn test_restore_with_unreachable_backend_reuses_identity() {
    let (auth, store) = auth_context(unreachable_client());
    store.set(TOKEN_KEY, "jwt-123").await.unwrap();
    store
        .set(IDENTITY_KEY, r#"{"email":"admin@foodzippy.in"}"#)
        .await
        .unwrap();

    let outcome = auth.restore().await.unwrap();

    assert!(matches!(outcome, RestoreOutcome::Unverified(ref id) if id.email == "admin@foodzippy.in"));
    assert!(outcome.is_authenticated());
    assert!(auth.is_authenticated());
    assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("jwt-123"));
}

#[tokio::test]
async fn test_session_survives_in_file_store() {
    use foodzippy_client::{AuthContext, FileSessionStore};
    use std::sync::Arc;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "jwt-file"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/vendors/unread-count"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"count": 0})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let session_path = dir.path().join("session.json");

    let first = AuthContext::new(
        ApiClient::new(server.uri()).unwrap(),
        Arc::new(FileSessionStore::new(&session_path)),
        fast_retry(),
    );
    first.login("admin@foodzippy.in", "secret").await.unwrap();

    let second = AuthContext::new(
        ApiClient::new(server.uri()).unwrap(),
        Arc::new(FileSessionStore::new(&session_path)),
        fast_retry(),
    );
    let outcome = second.restore().await.unwrap();

    assert!(matches!(outcome, RestoreOutcome::Verified(_)));
    assert_eq!(second.client().token().as_deref(), Some("jwt-file"));
}
