//! Record CRUD integration tests
//!
//! Exercises the protected record endpoints over HTTP against a real
//! in-memory database, including ownership stamping and 404 handling.

mod common;

use common::*;
use reqwest::StatusCode;

/// Register an account, returning its id, then log in for a token
async fn register_account(addr: std::net::SocketAddr, email: &str) -> (i64, String) {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/register", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": "a strong password",
            "user_name": "record-tester"
        }))
        .send()
        .await
        .expect("Failed to send register request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let id = body["id"].as_i64().expect("Register response missing id");

    let token = register_and_login_only(addr, email).await;
    (id, token)
}

async fn register_and_login_only(addr: std::net::SocketAddr, email: &str) -> String {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/login", addr))
        .json(&serde_json::json!({
            "email": email,
            "password": "a strong password"
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    body["token"].as_str().expect("missing token").to_string()
}

/// Test 1: Creating a record stamps the authenticated account as owner
#[tokio::test]
async fn test_create_record_stamps_owner() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (user_id, token) = register_account(addr, "owner@example.com").await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/records", addr))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "name": "deploy key",
            "description": "staging cluster"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "deploy key");
    assert_eq!(body["description"], "staging cluster");
    assert_eq!(body["created_by"], user_id);
    assert!(body["id"].as_i64().unwrap() >= 1);
}

/// Test 2: Listing returns every stored record in id order
#[tokio::test]
async fn test_list_records() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (_, token) = register_account(addr, "lister@example.com").await;

    let client = reqwest::Client::new();
    for name in ["first", "second", "third"] {
        let response = client
            .post(format!("http://{}/records", addr))
            .bearer_auth(&token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = client
        .get(format!("http://{}/records", addr))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    let records = body.as_array().expect("Expected an array");
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["name"], "first");
    assert_eq!(records[1]["name"], "second");
    assert_eq!(records[2]["name"], "third");
}

/// Test 3: Fetching a record by id round-trips the stored fields
#[tokio::test]
async fn test_get_record_by_id() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (_, token) = register_account(addr, "getter@example.com").await;

    let client = reqwest::Client::new();
    let created: serde_json::Value = client
        .post(format!("http://{}/records", addr))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "lookup me" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_i64().unwrap();

    let response = client
        .get(format!("http://{}/records/{}", addr, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["id"], id);
    assert_eq!(body["name"], "lookup me");
    assert_eq!(body["description"], serde_json::Value::Null);
}

/// Test 4: Fetching an unknown record id returns 404
#[tokio::test]
async fn test_get_missing_record() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (_, token) = register_account(addr, "misser@example.com").await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/records/9999", addr))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Record not found");
}

/// Test 5: Updating a record persists the new payload and keeps the owner
#[tokio::test]
async fn test_update_record() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (user_id, token) = register_account(addr, "updater@example.com").await;

    let client = reqwest::Client::new();
    let created: serde_json::Value = client
        .post(format!("http://{}/records", addr))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "draft" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_i64().unwrap();

    let response = client
        .put(format!("http://{}/records/{}", addr, id))
        .bearer_auth(&token)
        .json(&serde_json::json!({
            "name": "final",
            "description": "signed off"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "final");
    assert_eq!(body["description"], "signed off");
    assert_eq!(body["created_by"], user_id);

    // Re-fetch to confirm the change was stored
    let fetched: serde_json::Value = client
        .get(format!("http://{}/records/{}", addr, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(fetched["name"], "final");
}

/// Test 6: Updating an unknown record id returns 404
#[tokio::test]
async fn test_update_missing_record() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (_, token) = register_account(addr, "ghost@example.com").await;

    let client = reqwest::Client::new();
    let response = client
        .put(format!("http://{}/records/9999", addr))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "phantom" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test 7: Deleting a record removes it; repeat deletes are 404
#[tokio::test]
async fn test_delete_record() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (_, token) = register_account(addr, "deleter@example.com").await;

    let client = reqwest::Client::new();
    let created: serde_json::Value = client
        .post(format!("http://{}/records", addr))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "short lived" }))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    let id = created["id"].as_i64().unwrap();

    let response = client
        .delete(format!("http://{}/records/{}", addr, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Record deleted");

    let response = client
        .get(format!("http://{}/records/{}", addr, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("http://{}/records/{}", addr, id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Test 8: Records created by different accounts carry their own owner ids
#[tokio::test]
async fn test_records_from_two_accounts() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (first_id, first_token) = register_account(addr, "one@example.com").await;
    let (second_id, second_token) = register_account(addr, "two@example.com").await;
    assert_ne!(first_id, second_id);

    let client = reqwest::Client::new();
    for (token, name) in [(&first_token, "from one"), (&second_token, "from two")] {
        let response = client
            .post(format!("http://{}/records", addr))
            .bearer_auth(token)
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body: serde_json::Value = client
        .get(format!("http://{}/records", addr))
        .bearer_auth(&first_token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");

    let records = body.as_array().expect("Expected an array");
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["created_by"], first_id);
    assert_eq!(records[1]["created_by"], second_id);
}

/// Test 9: Record names must not be blank
#[tokio::test]
async fn test_create_record_blank_name() {
    let state = default_test_state().await;
    let (addr, _shutdown) = run_test_server(state).await;

    let (_, token) = register_account(addr, "blank@example.com").await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/records", addr))
        .bearer_auth(&token)
        .json(&serde_json::json!({ "name": "   " }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Record name must not be empty");
}
