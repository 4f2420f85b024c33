mod common;

use axum::extract::State;
use kitchen_orders_api::{realtime::ConnectionHandle, routes::health::health_check};

#[tokio::test]
async fn health_check_returns_ok() {
    let (state, _) = common::test_state();
    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.realtime_tenants, 0);
}

#[tokio::test]
async fn health_check_counts_connected_establishments() {
    let (state, _) = common::test_state();
    let (handle, _rx) = ConnectionHandle::channel();
    state.connections.register("tenant", handle);

    let response = health_check(State(state)).await;
    assert_eq!(response.0.data.expect("health data").realtime_tenants, 1);
}
