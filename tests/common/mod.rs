//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use api_warden::auth::{CredentialConfig, CredentialService, RateLimitConfig, RateLimiter};
use api_warden::database::SqliteDatabase;
use api_warden::server::{build_router, AppState};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Signing secret shared by every integration test server
pub const TEST_JWT_SECRET: &[u8] = b"integration-test-secret";

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a test application state with the given token lifetime and
/// rate limit budget
pub async fn create_test_state(
    token_ttl: Duration,
    rate_limit: RateLimitConfig,
) -> AppState<SqliteDatabase> {
    let database = create_test_database().await;
    let credentials = Arc::new(CredentialService::new(
        Arc::clone(&database),
        CredentialConfig {
            jwt_secret: TEST_JWT_SECRET.to_vec(),
            token_ttl,
        },
    ));

    AppState {
        credentials,
        database,
        rate_limiter: Arc::new(RateLimiter::new(rate_limit)),
    }
}

/// State with a 1-hour token lifetime and a budget large enough that
/// ordinary tests never hit the limiter
pub async fn default_test_state() -> AppState<SqliteDatabase> {
    create_test_state(
        Duration::from_secs(3600),
        RateLimitConfig {
            max_requests: 1000,
            window: Duration::from_secs(60),
        },
    )
    .await
}

/// Run a test server in the background and return the address
/// The server will be shut down when the returned shutdown sender is dropped or sent
pub async fn run_test_server(
    state: AppState<SqliteDatabase>,
) -> (SocketAddr, oneshot::Sender<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let app = build_router(state).layer(tower_http::trace::TraceLayer::new_for_http());

    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .await
        .expect("Server error");
    });

    // Give the server a moment to start (100ms is sufficient for slow CI systems)
    tokio::time::sleep(Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// Register an account and log it in, returning the bearer token
pub async fn register_and_login(addr: SocketAddr, email: &str, password: &str) -> String {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/register", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": password,
            "user_name": "test-user"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), reqwest::StatusCode::CREATED);

    let response = client
        .post(format!("http://{}/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": password
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse login body");
    body["token"]
        .as_str()
        .expect("Login response missing token")
        .to_string()
}
