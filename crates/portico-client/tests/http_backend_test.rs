//! Integration tests for the HTTP backend against a local axum server.

use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use portico_auth::config::AuthConfig;
use portico_auth::gate::SessionGate;
use portico_auth::guard::{GuardDecision, RouteGuard};
use portico_auth::refresher::CredentialRefresher;
use portico_auth::store::{CredentialStore, SessionSnapshot};
use portico_client::{ClientConfig, HttpAuthBackend};
use portico_core::endpoint::{LogoutEndpoint, RoleCatalog, TokenExchange};
use portico_core::error::PorticoError;
use portico_core::models::credential::{AccessToken, RefreshToken};
use serde_json::{Value, json};
use uuid::Uuid;

const VALID_REFRESH: &str = "valid-refresh";
const ISSUED_ACCESS: &str = "access-1";

fn user_json() -> Value {
    json!({
        "id": Uuid::new_v4(),
        "name": "Operadora",
        "email": "ops@example.com",
        "role": {
            "id": Uuid::new_v4(),
            "name": "push-editor",
            "is_admin": false,
            "permissions": [
                { "id": Uuid::new_v4(), "path": "/dashboard/push", "name": "Crear Push" }
            ]
        }
    })
}

fn bearer_is_valid(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ISSUED_ACCESS}"))
}

async fn refresh(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["refresh_token"] == VALID_REFRESH {
        (
            StatusCode::OK,
            Json(json!({
                "access_token": ISSUED_ACCESS,
                "refresh_token": "rotated-refresh",
                "user": user_json(),
                "expires_in": 900
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "refresh token expired" })),
        )
    }
}

async fn slow_refresh() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(json!({ "access_token": ISSUED_ACCESS }))
}

async fn logout(headers: HeaderMap) -> StatusCode {
    if bearer_is_valid(&headers) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::UNAUTHORIZED
    }
}

async fn role(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if bearer_is_valid(&headers) {
        // No `permissions` field: treated as an empty set.
        (
            StatusCode::OK,
            Json(json!({ "id": Uuid::new_v4(), "name": "viewer" })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({})))
    }
}

/// Spin up the fake backend on an ephemeral port and return its base URL.
async fn spawn_backend() -> String {
    let app = Router::new()
        .route("/auth/refresh", post(refresh))
        .route("/slow/refresh", post(slow_refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/me/role", get(role));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn backend(config: ClientConfig) -> HttpAuthBackend {
    HttpAuthBackend::new(config).unwrap()
}

#[tokio::test]
async fn exchange_happy_path() {
    let base_url = spawn_backend().await;
    let backend = backend(ClientConfig::new(base_url));

    let outcome = backend
        .exchange(&RefreshToken::new(VALID_REFRESH))
        .await
        .unwrap();

    assert_eq!(outcome.access_token.as_str(), ISSUED_ACCESS);
    assert_eq!(
        outcome.refresh_token.as_ref().map(RefreshToken::as_str),
        Some("rotated-refresh")
    );
    assert_eq!(outcome.expires_in, Some(900));
    let user = outcome.user.unwrap();
    assert_eq!(user.role.permissions[0].path, "/dashboard/push");
}

#[tokio::test]
async fn rejected_exchange_is_authentication_failure() {
    let base_url = spawn_backend().await;
    let backend = backend(ClientConfig::new(base_url));

    let err = backend
        .exchange(&RefreshToken::new("revoked"))
        .await
        .unwrap_err();

    match err {
        PorticoError::AuthenticationFailed { reason } => {
            assert!(reason.contains("expired"), "reason: {reason}");
        }
        other => panic!("expected AuthenticationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_exchange_times_out() {
    let base_url = spawn_backend().await;
    let backend = backend(ClientConfig {
        timeout_secs: 1,
        refresh_path: "/slow/refresh".into(),
        ..ClientConfig::new(base_url)
    });

    let err = backend
        .exchange(&RefreshToken::new(VALID_REFRESH))
        .await
        .unwrap_err();

    assert!(matches!(err, PorticoError::Timeout), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_transport_error() {
    // Bind and immediately drop to obtain a port nobody listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let backend = backend(ClientConfig::new(format!("http://{addr}")));
    let err = backend
        .exchange(&RefreshToken::new(VALID_REFRESH))
        .await
        .unwrap_err();

    assert!(matches!(err, PorticoError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn logout_sends_bearer_token() {
    let base_url = spawn_backend().await;
    let backend = backend(ClientConfig::new(base_url));

    backend.logout(&AccessToken::new(ISSUED_ACCESS)).await.unwrap();
    assert!(backend.logout(&AccessToken::new("stale")).await.is_err());
}

#[tokio::test]
async fn role_without_permissions_is_empty() {
    let base_url = spawn_backend().await;
    let backend = backend(ClientConfig::new(base_url));

    let role = backend
        .current_role(&AccessToken::new(ISSUED_ACCESS))
        .await
        .unwrap();

    assert_eq!(role.name, "viewer");
    assert!(!role.is_admin);
    assert!(role.permissions.is_empty());
}

#[tokio::test]
async fn stored_token_file_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refresh_token");
    tokio::fs::write(&path, format!("{VALID_REFRESH}\n")).await.unwrap();

    let backend = backend(ClientConfig {
        refresh_token_file: Some(path),
        ..Default::default()
    });

    let token = backend.stored_refresh_token().await.unwrap().unwrap();
    assert_eq!(token.as_str(), VALID_REFRESH);
}

#[tokio::test]
async fn missing_or_empty_token_file_means_none() {
    let dir = tempfile::tempdir().unwrap();
    let missing = backend(ClientConfig {
        refresh_token_file: Some(dir.path().join("absent")),
        ..Default::default()
    });
    assert!(missing.stored_refresh_token().await.unwrap().is_none());

    let empty_path = dir.path().join("empty");
    tokio::fs::write(&empty_path, "  \n").await.unwrap();
    let empty = backend(ClientConfig {
        refresh_token_file: Some(empty_path),
        ..Default::default()
    });
    assert!(empty.stored_refresh_token().await.unwrap().is_none());

    let unconfigured = backend(ClientConfig::default());
    assert!(unconfigured.stored_refresh_token().await.unwrap().is_none());
}

#[tokio::test]
async fn bootstrap_over_http_from_stored_token() {
    let base_url = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refresh_token");
    tokio::fs::write(&path, VALID_REFRESH).await.unwrap();

    let backend = backend(ClientConfig {
        refresh_token_file: Some(path),
        ..ClientConfig::new(base_url)
    });
    let config = AuthConfig::default();
    let store = CredentialStore::new();
    let gate = SessionGate::new(CredentialRefresher::new(backend, store.clone(), &config));

    let ctx = gate.resolve().await;
    let guard = RouteGuard::new(&config);

    assert_eq!(
        ctx.session().access_token().map(AccessToken::as_str),
        Some(ISSUED_ACCESS)
    );
    assert!(matches!(
        guard.check(&ctx, Some("/dashboard/push")),
        GuardDecision::Authorized(_)
    ));
    assert_eq!(guard.check(&ctx, Some("/users")), GuardDecision::Unauthorized);
}

#[tokio::test]
async fn bootstrap_over_http_with_revoked_token_is_anonymous() {
    let base_url = spawn_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refresh_token");
    tokio::fs::write(&path, "revoked").await.unwrap();

    let backend = backend(ClientConfig {
        refresh_token_file: Some(path),
        ..ClientConfig::new(base_url)
    });
    let config = AuthConfig::default();
    let gate = SessionGate::new(CredentialRefresher::new(
        backend,
        CredentialStore::new(),
        &config,
    ));

    let ctx = gate.resolve().await;

    assert!(ctx.is_ready());
    assert_eq!(ctx.session(), SessionSnapshot::Anonymous);
    assert!(matches!(
        RouteGuard::new(&config).check(&ctx, None),
        GuardDecision::Redirect(_)
    ));
}
