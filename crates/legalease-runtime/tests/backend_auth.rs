//! Backend auth client against a local HTTP server.

mod common;

use std::time::Duration;

use common::{direct_client, serve_once};
use legalease_runtime::backend::MOCK_LOGIN_TOKEN;
use legalease_runtime::{BackendClient, BackendConfig, BackendError};

fn client_for(base: &str, offline_auth: bool) -> BackendClient {
    let config = BackendConfig {
        base_url: format!("{base}/api"),
        offline_auth,
        fallback_delay: Duration::from_millis(10),
        request_timeout: Duration::from_secs(5),
    };
    BackendClient::with_client(&config, direct_client())
}

#[tokio::test]
async fn login_parses_backend_session() {
    let body = r#"{"token":"jwt-live-token","user":{"id":7,"name":"Meera","email":"meera@example.com"}}"#;
    let (base, request) = serve_once(200, &[], body).await;

    let session = client_for(&base, true)
        .login("meera@example.com", "s3cret")
        .await
        .unwrap();

    assert!(!session.offline);
    assert_eq!(session.token(), "jwt-live-token");
    assert_eq!(session.user.id, "7");
    assert_eq!(session.user.name, "Meera");

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /api/auth/login HTTP/1.1"));
    assert!(request.contains(r#""email":"meera@example.com""#));
    assert!(request.contains(r#""password":"s3cret""#));
}

#[tokio::test]
async fn register_sends_name() {
    let body = r#"{"token":"jwt-new","user":{"id":"abc123","name":"Kiran","email":"kiran@example.com"}}"#;
    let (base, request) = serve_once(200, &[], body).await;

    let session = client_for(&base, false)
        .register("Kiran", "kiran@example.com", "pw")
        .await
        .unwrap();
    assert_eq!(session.user.id, "abc123");

    let request = request.await.unwrap();
    assert!(request.starts_with("POST /api/auth/register HTTP/1.1"));
    assert!(request.contains(r#""name":"Kiran""#));
}

#[tokio::test]
async fn rejected_login_is_error_without_offline_auth() {
    let (base, _request) = serve_once(401, &[], r#"{"detail":"Invalid credentials"}"#).await;

    match client_for(&base, false).login("a@b.c", "wrong").await {
        Err(BackendError::Status { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_falls_back_to_offline_session() {
    let (base, _request) = serve_once(500, &[], "oops").await;

    let session = client_for(&base, true).login("a@b.c", "pw").await.unwrap();
    assert!(session.offline);
    assert_eq!(session.token(), MOCK_LOGIN_TOKEN);
    assert_eq!(session.user.name, "John Doe");
}
