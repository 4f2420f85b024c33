use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub request_time: Option<chrono::DateTime<chrono::Utc>>,
}

impl Meta {
    pub fn empty() -> Self {
        Self { request_time: None }
    }

    pub fn now() -> Self {
        Self {
            request_time: Some(chrono::Utc::now()),
        }
    }
}

/// Envelope for every non-order JSON body, errors included.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}
