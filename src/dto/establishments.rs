use serde::Deserialize;
use utoipa::ToSchema;

use crate::models::ScheduleSlot;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateScheduleRequest {
    pub schedule: Vec<ScheduleSlot>,
}
