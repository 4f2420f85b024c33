//! WebSocket endpoint for kitchen dashboards.
//!
//! `GET /ws?token=<JWT>`: browsers cannot set headers on a WebSocket
//! handshake, so the bearer token travels in the query string. The upgrade is
//! always accepted; a bad token is answered with a close frame in the
//! 4000-4099 range so the client can tell the failures apart.

use std::time::Duration;

use axum::{
    extract::{
        Query, State,
        ws::{CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade, close_code},
    },
    http::Uri,
    response::Response,
};
use serde::Deserialize;
use thiserror::Error;
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::{info, warn};

use super::registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
use crate::{middleware::auth::verify_token, state::AppState};

pub const MISSING_TOKEN_CLOSE_CODE: u16 = 4008;
pub const INVALID_TOKEN_CLOSE_CODE: u16 = 4001;

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Default, Deserialize)]
pub struct HandshakeQuery {
    pub token: Option<String>,
}

impl HandshakeQuery {
    /// A query string that does not parse (e.g. a repeated `token`) counts as
    /// an invalid token rather than failing the upgrade.
    pub fn from_uri(uri: &Uri) -> Result<Self, HandshakeRejection> {
        match Query::<Self>::try_from_uri(uri) {
            Ok(Query(query)) => Ok(query),
            Err(err) => {
                tracing::debug!(error = %err, "unparseable realtime handshake query");
                Err(HandshakeRejection::InvalidToken)
            }
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeRejection {
    #[error("token not provided")]
    MissingToken,

    #[error("invalid token")]
    InvalidToken,
}

impl HandshakeRejection {
    pub fn close_code(&self) -> u16 {
        match self {
            HandshakeRejection::MissingToken => MISSING_TOKEN_CLOSE_CODE,
            HandshakeRejection::InvalidToken => INVALID_TOKEN_CLOSE_CODE,
        }
    }
}

/// Resolve the tenant id carried by the handshake token.
pub fn authenticate(query: &HandshakeQuery, secret: &str) -> Result<String, HandshakeRejection> {
    let token = query
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(HandshakeRejection::MissingToken)?;

    verify_token(token, secret)
        .map(|id| id.to_string())
        .ok_or(HandshakeRejection::InvalidToken)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticated,
    Open,
    Closed,
}

/// Lifecycle of one connection against the registry.
///
/// Only `Open` sessions are registered. Closing is idempotent and also runs
/// on drop, so a session that ends by any path leaves no registry entry.
pub struct Session {
    registry: ConnectionRegistry,
    state: ConnectionState,
    tenant_id: Option<String>,
    connection_id: Option<ConnectionId>,
}

impl Session {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self {
            registry,
            state: ConnectionState::Connecting,
            tenant_id: None,
            connection_id: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// `Connecting -> Authenticated`, or straight to `Closed` on rejection.
    pub fn authenticate(
        &mut self,
        query: &HandshakeQuery,
        secret: &str,
    ) -> Result<(), HandshakeRejection> {
        if self.state != ConnectionState::Connecting {
            return Err(HandshakeRejection::InvalidToken);
        }
        match authenticate(query, secret) {
            Ok(tenant_id) => {
                self.tenant_id = Some(tenant_id);
                self.state = ConnectionState::Authenticated;
                Ok(())
            }
            Err(rejection) => {
                self.state = ConnectionState::Closed;
                Err(rejection)
            }
        }
    }

    /// `Authenticated -> Open`: registers a fresh handle and hands back its queue.
    pub fn open(&mut self) -> Option<mpsc::Receiver<Utf8Bytes>> {
        if self.state != ConnectionState::Authenticated {
            return None;
        }
        let tenant_id = self.tenant_id.as_deref()?;
        let (handle, rx) = ConnectionHandle::channel();
        self.connection_id = Some(handle.id());
        self.registry.register(tenant_id, handle);
        self.state = ConnectionState::Open;
        Some(rx)
    }

    pub fn close(&mut self) {
        if self.state == ConnectionState::Closed {
            return;
        }
        if let (Some(tenant_id), Some(connection_id)) =
            (self.tenant_id.as_deref(), self.connection_id.take())
        {
            self.registry.unregister(tenant_id, connection_id);
        }
        self.state = ConnectionState::Closed;
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

/// GET /ws?token=<JWT>
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    uri: Uri,
) -> Response {
    let query = HandshakeQuery::from_uri(&uri);
    ws.on_upgrade(move |socket| run_connection(socket, state, query))
}

async fn run_connection(
    mut socket: WebSocket,
    state: AppState,
    query: Result<HandshakeQuery, HandshakeRejection>,
) {
    let mut session = Session::new(state.connections.clone());

    let handshake = query.and_then(|query| session.authenticate(&query, &state.jwt_secret));
    if let Err(rejection) = handshake {
        warn!(code = rejection.close_code(), reason = %rejection, "realtime handshake rejected");
        let _ = socket
            .send(close_message(rejection.close_code(), &rejection.to_string()))
            .await;
        return;
    }

    let Some(mut outbound) = session.open() else {
        return;
    };
    let tenant_id = session.tenant_id().unwrap_or_default().to_string();
    info!(tenant_id = %tenant_id, "realtime connection open");

    let mut ping = tokio::time::interval(PING_INTERVAL);
    ping.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ping.tick().await; // first tick fires immediately

    loop {
        tokio::select! {
            queued = outbound.recv() => match queued {
                Some(payload) => {
                    if socket.send(Message::Text(payload)).await.is_err() {
                        break;
                    }
                }
                None => {
                    // registry let go of us: server shutdown
                    let _ = socket
                        .send(close_message(close_code::AWAY, "server shutting down"))
                        .await;
                    break;
                }
            },

            inbound = socket.recv() => match inbound {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },

            _ = ping.tick() => {
                if socket.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }
        }
    }

    session.close();
    info!(tenant_id = %tenant_id, "realtime connection closed");
}

fn close_message(code: u16, reason: &str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: Utf8Bytes::from(reason.to_string()),
    }))
}
