use std::sync::Arc;

use crate::{realtime::ConnectionRegistry, services::order_store::OrderStore, store::DocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub orders: OrderStore,
    pub connections: ConnectionRegistry,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        connections: ConnectionRegistry,
        jwt_secret: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            orders: OrderStore::new(store.clone()),
            store,
            connections,
            jwt_secret: jwt_secret.into(),
        }
    }
}
