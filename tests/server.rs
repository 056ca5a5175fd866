use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::{net::TcpListener, sync::Arc};

use task_manager::{config::Config, startup, storage::MemoryStorage};

/// Starts the real server on a random port and returns its base URL.
fn spawn_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let config = Config::from_lookup(|key| match key {
        "DATABASE_URL" => Some("postgres://unused".to_string()),
        _ => None,
    })
    .unwrap();

    let server = startup::run(listener, Arc::new(MemoryStorage::new()), &config)
        .expect("failed to build server");
    actix_rt::spawn(server);
    format!("http://127.0.0.1:{}", port)
}

#[actix_rt::test]
async fn test_server_round_trip() {
    let base = spawn_server();
    let client = reqwest::Client::new();

    let resp = client.get(format!("{}/healthz", base)).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client
        .post(format!("{}/users", base))
        .json(&json!({"user_name": "remote", "email": "remote@example.com", "password": "password123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().contains_key("x-request-id"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["user_name"], "remote");

    let resp = client
        .post(format!("{}/auth/login", base))
        .json(&json!({"user_name": "remote", "password": "password123"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = client
        .get(format!("{}/users/all/", base))
        .header("x-request-id", "trace-me")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    assert_eq!(resp.headers()["x-request-id"], "trace-me");
}

#[actix_rt::test]
async fn test_cors_preflight() {
    let base = spawn_server();
    let client = reqwest::Client::new();

    let resp = client
        .request(reqwest::Method::OPTIONS, format!("{}/tasks", base))
        .header("Origin", "http://example.com")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 200);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
    assert_eq!(resp.headers()["access-control-max-age"], "300");
}
