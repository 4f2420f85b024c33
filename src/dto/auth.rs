use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::ScheduleSlot;

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    /// Defaults to every day 08:00-22:00.
    pub schedule: Option<Vec<ScheduleSlot>>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

/// JWT payload shared by the bearer extractor and the realtime handshake.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    /// Establishment id
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
}
