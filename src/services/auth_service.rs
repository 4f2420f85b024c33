use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::auth::{LoginRequest, LoginResponse, RegisterRequest},
    error::{AppError, AppResult},
    middleware::auth::issue_token,
    models::Establishment,
    response::{ApiResponse, Meta},
    services::schedule::{default_schedule, validate_schedule},
    state::AppState,
    store::StoreError,
};

pub async fn register_establishment(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<Establishment>> {
    let RegisterRequest {
        name,
        email,
        password,
        phone,
        schedule,
    } = payload;

    let name = name.trim().to_string();
    let email = email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AppError::BadRequest(
            "name, email and password are required".into(),
        ));
    }

    let schedule = schedule.unwrap_or_else(default_schedule);
    validate_schedule(&schedule)?;

    if state.store.find_establishment_by_email(&email).await?.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();

    let establishment = Establishment {
        id: Uuid::new_v4(),
        name,
        email,
        phone: phone.filter(|p| !p.trim().is_empty()),
        password_hash,
        schedule,
        created_at: Utc::now(),
    };
    // a concurrent registration can still win between the lookup and the insert
    match state.store.insert_establishment(&establishment).await {
        Err(StoreError::Duplicate(_)) => {
            return Err(AppError::BadRequest("Email is already taken".to_string()));
        }
        other => other?,
    }

    if let Err(err) = log_audit(
        state.store.as_ref(),
        Some(establishment.id),
        "establishment_register",
        Some("establishments"),
        Some(serde_json::json!({ "establishment_id": establishment.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Establishment created",
        establishment,
        Some(Meta::empty()),
    ))
}

pub async fn login_establishment(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let LoginRequest { email, password } = payload;
    let establishment = state
        .store
        .find_establishment_by_email(&email.trim().to_lowercase())
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".into()))?;

    let parsed_hash = PasswordHash::new(&establishment.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let token = issue_token(establishment.id, &state.jwt_secret)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    if let Err(err) = log_audit(
        state.store.as_ref(),
        Some(establishment.id),
        "establishment_login",
        Some("establishments"),
        Some(serde_json::json!({ "establishment_id": establishment.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
        Some(Meta::empty()),
    ))
}
