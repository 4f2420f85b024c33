use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, OrderCreated, UpdateOrderStatusRequest},
    error::AppResult,
    middleware::auth::AuthEstablishment,
    models::OrderView,
    routes::params::Pagination,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{id}", patch(update_order_status).delete(cancel_order))
}

#[utoipa::path(
    post,
    path = "/api/establishments/{establishment_id}/orders",
    params(
        ("establishment_id" = Uuid, Path, description = "Establishment ID")
    ),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order admitted and created", body = OrderCreated),
        (status = 400, description = "Order rejected by admission checks"),
        (status = 404, description = "Establishment not found"),
        (status = 500, description = "Internal Server Error"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Path(establishment_id): Path<Uuid>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderCreated>)> {
    let created = order_service::place_order(&state, establishment_id, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(Pagination),
    responses(
        (status = 200, description = "Orders of the authenticated establishment, oldest first", body = Vec<OrderView>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    auth: AuthEstablishment,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<OrderView>>> {
    let orders = order_service::list_orders(&state, &auth, pagination.page_request()).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 204, description = "Status updated"),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    auth: AuthEstablishment,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<StatusCode> {
    order_service::update_order_status(&state, &auth, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 204, description = "Order canceled"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    auth: AuthEstablishment,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    order_service::cancel_order(&state, &auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
