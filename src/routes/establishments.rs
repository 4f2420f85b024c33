use axum::{
    Json, Router,
    extract::State,
    routing::{get, post, put},
};

use crate::{
    dto::establishments::UpdateScheduleRequest,
    error::AppResult,
    middleware::auth::AuthEstablishment,
    models::Establishment,
    response::ApiResponse,
    routes::orders::create_order,
    services::establishment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_profile))
        .route("/me/schedule", put(update_schedule))
        .route("/{establishment_id}/orders", post(create_order))
}

#[utoipa::path(
    get,
    path = "/api/establishments/me",
    responses(
        (status = 200, description = "Authenticated establishment", body = ApiResponse<Establishment>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Establishments"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthEstablishment,
) -> AppResult<Json<ApiResponse<Establishment>>> {
    let resp = establishment_service::get_profile(&state, &auth).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/establishments/me/schedule",
    request_body = UpdateScheduleRequest,
    responses(
        (status = 200, description = "Schedule replaced", body = ApiResponse<Establishment>),
        (status = 400, description = "Invalid schedule"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_auth" = [])),
    tag = "Establishments"
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    auth: AuthEstablishment,
    Json(payload): Json<UpdateScheduleRequest>,
) -> AppResult<Json<ApiResponse<Establishment>>> {
    let resp = establishment_service::update_schedule(&state, &auth, payload).await?;
    Ok(Json(resp))
}
