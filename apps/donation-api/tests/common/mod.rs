#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use axum::Router;
use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use donation_api::auth::password::hash_password;
use donation_api::auth::tokens::TokenKeys;
use donation_api::config::{Config, StorageBackend};
use donation_api::db::store::{MemoryStore, Store};
use donation_api::models::admin::NewAdmin;
use donation_api::AppState;

pub const TEST_SECRET: &str = "test-secret-do-not-use-in-production";
pub const ADMIN_PASSWORD: &str = "correct-horse";

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub fn test_config() -> Config {
    Config {
        storage: StorageBackend::Memory,
        database_url: None,
        secret_key: TEST_SECRET.to_string(),
        access_token_ttl_minutes: 30,
        port: 0,
        allowed_origins: vec![],
        stats_broadcast_interval_secs: 0,
        default_admin_password: ADMIN_PASSWORD.to_string(),
        enable_docs: false,
    }
}

/// Argon2 is slow in debug builds, so every seeded admin shares one hash.
fn admin_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).expect("hash test password"))
        .clone()
}

/// In-memory state with active admins `alice` and `bob` and the disabled
/// admin `mallory`, all using [`ADMIN_PASSWORD`].
pub async fn test_state() -> AppState {
    let store = Arc::new(MemoryStore::new());
    for (username, is_active) in [("alice", true), ("bob", true), ("mallory", false)] {
        store
            .insert_admin(NewAdmin {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: admin_password_hash(),
                is_active,
                created_at: Utc::now(),
            })
            .await
            .expect("seed admin");
    }
    AppState::new(test_config(), store)
}

/// Build the full application router wired to the test state.
pub async fn test_app() -> (Router, AppState) {
    let state = test_state().await;
    let app = donation_api::routes::router().with_state(state.clone());
    (app, state)
}

pub fn mint_token(state: &AppState, username: &str) -> String {
    state.tokens.issue(username).expect("mint token").token
}

pub fn mint_expired_token(username: &str) -> String {
    TokenKeys::from_secret(TEST_SECRET, -5)
        .issue(username)
        .expect("mint expired token")
        .token
}

pub fn mint_foreign_token(username: &str) -> String {
    TokenKeys::from_secret("some-other-secret", 30)
        .issue(username)
        .expect("mint foreign token")
        .token
}

pub fn donation_body(reference: &str) -> Value {
    serde_json::json!({
        "transaction_reference": reference,
        "donor_name": "Abebe Kebede",
        "donor_contact": "abebe@example.com",
        "bank_used": "Commercial Bank of Ethiopia",
        "amount_donated": "1,000 ETB",
        "message": "For the school roof",
    })
}

// ---------------------------------------------------------------------------
// WebSocket helpers
// ---------------------------------------------------------------------------

/// Start an actual TCP server for WebSocket testing. Runs in the background.
pub async fn start_server(state: AppState) -> SocketAddr {
    let app = donation_api::routes::router().with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

/// Open `/ws/admin` with a raw query string and no handshake checks.
pub async fn connect_raw(addr: SocketAddr, query: &str) -> WsClient {
    let url = format!("ws://{addr}/ws/admin{query}");
    let (ws, _) = tokio_tungstenite::connect_async(&url)
        .await
        .expect("ws connect");
    ws
}

/// Connect with `token` and consume the `connection_established` ack.
pub async fn connect_admin(addr: SocketAddr, token: &str) -> (WsClient, Value) {
    let mut ws = connect_raw(addr, &format!("?token={token}")).await;
    let ack = next_json(&mut ws).await;
    assert_eq!(ack["type"], "connection_established");
    (ws, ack)
}

pub async fn send_text(ws: &mut WsClient, text: &str) {
    ws.send(tungstenite::Message::Text(text.to_string().into()))
        .await
        .expect("ws send");
}

/// Next text frame as JSON. Panics after five seconds.
pub async fn next_json(ws: &mut WsClient) -> Value {
    loop {
        let msg = time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout waiting for message")
            .expect("stream ended")
            .expect("ws read error");

        match msg {
            tungstenite::Message::Text(text) => {
                return serde_json::from_str(&text).expect("parse message");
            }
            tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_) => continue,
            other => panic!("Expected text frame, got: {other:?}"),
        }
    }
}

/// Next frame, which must be a close frame. Returns its code.
pub async fn expect_close(ws: &mut WsClient) -> u16 {
    let msg = time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timeout waiting for close")
        .expect("stream ended")
        .expect("ws read error");

    match msg {
        tungstenite::Message::Close(Some(frame)) => frame.code.into(),
        other => panic!("Expected Close frame, got: {other:?}"),
    }
}

/// Assert that nothing arrives on `ws` for a short while.
pub async fn expect_silence(ws: &mut WsClient) {
    if let Ok(msg) = time::timeout(Duration::from_millis(300), ws.next()).await {
        panic!("Expected no message, got: {msg:?}");
    }
}

/// Poll the registry until it holds `expected` connections.
pub async fn wait_for_active_count(state: &AppState, expected: usize) {
    let registry = state.broadcaster.registry();
    let deadline = time::Instant::now() + Duration::from_secs(5);
    while registry.active_count() != expected {
        if time::Instant::now() > deadline {
            panic!(
                "active_count stayed at {} instead of {expected}",
                registry.active_count()
            );
        }
        time::sleep(Duration::from_millis(20)).await;
    }
}
