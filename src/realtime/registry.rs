//! Process-wide map of live real-time connections, keyed by tenant.

use std::{collections::HashMap, sync::Arc};

use axum::extract::ws::Utf8Bytes;
use dashmap::{DashMap, mapref::entry::Entry};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::OrderView;

pub type ConnectionId = Uuid;

/// Outbound queue depth per connection. A dashboard that falls this far
/// behind starts losing pushes instead of stalling the broadcaster.
pub const CONNECTION_BUFFER_SIZE: usize = 64;

/// Server → client messages.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RealtimeEvent {
    NewOrder(OrderView),
}

/// Writable side of one connection. Equality is by id.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    tx: mpsc::Sender<Utf8Bytes>,
}

impl ConnectionHandle {
    /// New handle plus the receiver its session drains.
    pub fn channel() -> (Self, mpsc::Receiver<Utf8Bytes>) {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER_SIZE);
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    fn try_deliver(&self, payload: &Utf8Bytes) -> bool {
        self.tx.try_send(payload.clone()).is_ok()
    }
}

/// Cheap to clone; all clones share one map.
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    tenants: Arc<DashMap<String, HashMap<ConnectionId, ConnectionHandle>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering the same handle twice keeps a single entry.
    pub fn register(&self, tenant_id: &str, handle: ConnectionHandle) {
        let id = handle.id;
        self.tenants
            .entry(tenant_id.to_string())
            .or_default()
            .insert(id, handle);
        debug!(tenant_id, connection_id = %id, "connection registered");
    }

    /// Drops the tenant entry once its last connection is gone. Unknown
    /// handles are ignored. Returns whether something was removed.
    pub fn unregister(&self, tenant_id: &str, connection_id: ConnectionId) -> bool {
        let Entry::Occupied(mut entry) = self.tenants.entry(tenant_id.to_string()) else {
            return false;
        };
        let removed = entry.get_mut().remove(&connection_id).is_some();
        if entry.get().is_empty() {
            entry.remove();
        }
        if removed {
            debug!(tenant_id, connection_id = %connection_id, "connection unregistered");
        }
        removed
    }

    /// Best-effort fan-out to every connection of `tenant_id`.
    ///
    /// Works on a snapshot of the tenant's handles and never touches the map
    /// afterwards; closed or saturated connections are skipped and left for
    /// their session to unregister. Returns the number of deliveries.
    pub fn broadcast(&self, tenant_id: &str, event: &RealtimeEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(json) => Utf8Bytes::from(json),
            Err(err) => {
                warn!(tenant_id, error = %err, "failed to encode realtime event");
                return 0;
            }
        };

        let targets: Vec<ConnectionHandle> = match self.tenants.get(tenant_id) {
            Some(set) => set.values().cloned().collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for handle in &targets {
            if handle.is_open() && handle.try_deliver(&payload) {
                delivered += 1;
            } else {
                debug!(tenant_id, connection_id = %handle.id, "dropped realtime event");
            }
        }
        delivered
    }

    /// Forget every connection. Sessions see their queue close and hang up.
    pub fn close_all(&self) -> usize {
        let tenants: Vec<String> = self.tenants.iter().map(|e| e.key().clone()).collect();
        let mut closed = 0;
        for tenant in tenants {
            if let Some((_, set)) = self.tenants.remove(&tenant) {
                closed += set.len();
            }
        }
        info!(closed, "closed all realtime connections");
        closed
    }

    pub fn tenant_count(&self) -> usize {
        self.tenants.len()
    }

    pub fn connection_count(&self, tenant_id: &str) -> usize {
        self.tenants.get(tenant_id).map_or(0, |set| set.len())
    }
}
