//! WebSocket upgrade handler and per-connection event loop.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time;

use crate::AppState;

use super::events::{ClientMessage, ServerEvent};
use super::registry::{ConnectionHandle, ConnectionRegistry, Frame};

/// RFC 6455 policy violation, used for every authentication failure.
const CLOSE_POLICY_VIOLATION: u16 = 1008;

/// Upper bound on a single socket write.
const WRITE_TIMEOUT: Duration = Duration::from_secs(10);

type WsSink = SplitSink<WebSocket, Message>;
type WsStream = SplitStream<WebSocket>;

#[derive(Debug, Deserialize)]
pub struct ConnectParams {
    token: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/ws/admin", get(ws_upgrade))
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, params.token, state))
}

/// Removes the connection from the registry on every exit path.
struct RegistrationGuard {
    registry: Arc<ConnectionRegistry>,
    connection_id: String,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        self.registry.unregister(&self.connection_id);
    }
}

async fn handle_connection(socket: WebSocket, token: Option<String>, state: AppState) {
    let (mut ws_tx, ws_rx) = socket.split();

    let username = match authenticate(&state, token.as_deref()).await {
        Ok(username) => username,
        Err(reason) => {
            tracing::info!(%reason, "admin websocket rejected");
            let _ = send_close(&mut ws_tx, CLOSE_POLICY_VIOLATION, reason).await;
            return;
        }
    };

    let (handle, outbound_rx) = ConnectionHandle::new(username.clone());
    let connection_id = handle.id.clone();
    let registry = state.broadcaster.registry().clone();
    registry.register(handle);
    let guard = RegistrationGuard {
        registry: registry.clone(),
        connection_id: connection_id.clone(),
    };

    tracing::info!(
        connection_id = %connection_id,
        username = %username,
        active = registry.active_count(),
        "admin connected"
    );

    // The ack goes straight to the socket, ahead of anything already queued.
    let ack = ServerEvent::connection_established(&username);
    if send_event(&mut ws_tx, &ack).await.is_ok() {
        run_session(&state, &connection_id, ws_tx, ws_rx, outbound_rx).await;
    }

    drop(guard);
    tracing::info!(
        connection_id = %connection_id,
        username = %username,
        active = registry.active_count(),
        "admin disconnected"
    );
}

/// Resolve the token to an active admin's username.
async fn authenticate(state: &AppState, token: Option<&str>) -> Result<String, &'static str> {
    let token = token.filter(|t| !t.is_empty()).ok_or("Missing token")?;
    let username = state
        .tokens
        .verify(token)
        .map_err(|_| "Invalid or expired token")?;

    match state.store.find_admin(&username).await {
        Ok(Some(admin)) if admin.is_active => Ok(username),
        Ok(Some(_)) => Err("Account disabled"),
        Ok(None) => Err("Unknown admin"),
        Err(e) => {
            tracing::error!(error = %e.message, "admin lookup failed during websocket auth");
            Err("Authentication unavailable")
        }
    }
}

/// Main loop: answer client messages and forward queued broadcasts.
async fn run_session(
    state: &AppState,
    connection_id: &str,
    mut ws_tx: WsSink,
    mut ws_rx: WsStream,
    mut outbound_rx: mpsc::Receiver<Frame>,
) {
    loop {
        tokio::select! {
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = match ClientMessage::parse(text.as_str()) {
                            Some(ClientMessage::Ping) => ServerEvent::pong(),
                            Some(ClientMessage::RequestStats) => match state.store.stats().await {
                                Ok(stats) => ServerEvent::stats_update(stats),
                                Err(e) => {
                                    tracing::warn!(%connection_id, error = %e.message, "stats request failed");
                                    continue;
                                }
                            },
                            Some(ClientMessage::Unknown) | None => {
                                tracing::debug!(%connection_id, "ignoring unrecognized client message");
                                continue;
                            }
                        };
                        if send_event(&mut ws_tx, &reply).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(?e, %connection_id, "ws read error");
                        break;
                    }
                    // Binary frames are ignored; axum answers transport pings.
                    Some(Ok(_)) => continue,
                }
            }

            frame = outbound_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if send_frame(&mut ws_tx, frame).await.is_err() {
                            tracing::debug!(%connection_id, "broadcast write failed");
                            break;
                        }
                    }
                    // Pruned by the broadcaster.
                    None => {
                        tracing::debug!(%connection_id, "connection pruned, closing");
                        break;
                    }
                }
            }
        }
    }
}

/// Outcome of a socket write that failed or ran past [`WRITE_TIMEOUT`].
#[derive(Debug)]
struct WriteFailed;

async fn send_frame(ws_tx: &mut WsSink, frame: Frame) -> Result<(), WriteFailed> {
    match time::timeout(WRITE_TIMEOUT, ws_tx.send(Message::Text(frame))).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            tracing::debug!(?e, "ws write error");
            Err(WriteFailed)
        }
        Err(_) => {
            tracing::debug!("ws write timed out");
            Err(WriteFailed)
        }
    }
}

async fn send_event(ws_tx: &mut WsSink, event: &ServerEvent) -> Result<(), WriteFailed> {
    let json = serde_json::to_string(event).map_err(|e| {
        tracing::error!(?e, kind = event.kind(), "failed to serialize event");
        WriteFailed
    })?;
    send_frame(ws_tx, Frame::from(json)).await
}

/// Send a WebSocket close frame with a code and reason.
async fn send_close(ws_tx: &mut WsSink, code: u16, reason: &str) -> Result<(), axum::Error> {
    let close_msg = Message::Close(Some(CloseFrame {
        code,
        reason: reason.to_string().into(),
    }));
    ws_tx.send(close_msg).await
}
