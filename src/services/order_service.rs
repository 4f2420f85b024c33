use chrono::{Local, NaiveDateTime};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderCreated, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthEstablishment,
    models::OrderView,
    realtime::RealtimeEvent,
    services::{admission::admit_order, order_store::PageRequest},
    state::AppState,
};

/// Admit, persist, then push `NEW_ORDER` to the establishment's dashboards.
pub async fn place_order(
    state: &AppState,
    establishment_id: Uuid,
    payload: CreateOrderRequest,
) -> AppResult<OrderCreated> {
    place_order_at(state, establishment_id, payload, Local::now().naive_local()).await
}

/// [`place_order`] with the opening-hours check evaluated at `at`.
pub async fn place_order_at(
    state: &AppState,
    establishment_id: Uuid,
    payload: CreateOrderRequest,
    at: NaiveDateTime,
) -> AppResult<OrderCreated> {
    let admitted = admit_order(state.store.as_ref(), establishment_id, payload, at).await?;

    let order = state.orders.create(admitted).await?;

    let delivered = state.connections.broadcast(
        &establishment_id.to_string(),
        &RealtimeEvent::NewOrder(order.clone()),
    );
    tracing::info!(
        order_id = %order.id,
        tenant_id = %establishment_id,
        delivered,
        "order created"
    );

    if let Err(err) = log_audit(
        state.store.as_ref(),
        Some(establishment_id),
        "order_created",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(OrderCreated {
        id: order.id,
        status: order.status,
        message: "Order created".to_string(),
    })
}

pub async fn list_orders(
    state: &AppState,
    auth: &AuthEstablishment,
    page: PageRequest,
) -> AppResult<Vec<OrderView>> {
    let orders = state.orders.list(auth.establishment_id, page).await?;
    Ok(orders)
}

pub async fn update_order_status(
    state: &AppState,
    auth: &AuthEstablishment,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<()> {
    let status = state
        .orders
        .set_status(auth.establishment_id, id, &payload.status)
        .await?;

    if let Err(err) = log_audit(
        state.store.as_ref(),
        Some(auth.establishment_id),
        "order_status_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id, "status": status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}

pub async fn cancel_order(state: &AppState, auth: &AuthEstablishment, id: Uuid) -> AppResult<()> {
    state.orders.cancel(auth.establishment_id, id).await?;

    if let Err(err) = log_audit(
        state.store.as_ref(),
        Some(auth.establishment_id),
        "order_canceled",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(())
}
