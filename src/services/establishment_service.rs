use crate::{
    audit::log_audit,
    dto::establishments::UpdateScheduleRequest,
    error::{AppError, AppResult},
    middleware::auth::AuthEstablishment,
    models::Establishment,
    response::{ApiResponse, Meta},
    services::schedule::validate_schedule,
    state::AppState,
};

pub async fn get_profile(
    state: &AppState,
    auth: &AuthEstablishment,
) -> AppResult<ApiResponse<Establishment>> {
    let establishment = state
        .store
        .find_establishment(auth.establishment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("establishment not found".into()))?;

    Ok(ApiResponse::success(
        "Establishment",
        establishment,
        Some(Meta::empty()),
    ))
}

pub async fn update_schedule(
    state: &AppState,
    auth: &AuthEstablishment,
    payload: UpdateScheduleRequest,
) -> AppResult<ApiResponse<Establishment>> {
    validate_schedule(&payload.schedule)?;

    let mut schedule = payload.schedule;
    schedule.sort_by_key(|slot| slot.day_of_week);

    if !state
        .store
        .update_schedule(auth.establishment_id, &schedule)
        .await?
    {
        return Err(AppError::NotFound("establishment not found".into()));
    }

    if let Err(err) = log_audit(
        state.store.as_ref(),
        Some(auth.establishment_id),
        "schedule_update",
        Some("establishments"),
        None,
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    get_profile(state, auth).await
}
