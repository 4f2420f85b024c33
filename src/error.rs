use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::{
    response::{ApiResponse, Meta},
    services::{admission::AdmissionError, order_store::OrderStoreError, schedule::ScheduleError},
    store::StoreError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Missing bearer token")]
    AuthTokenMissing,

    #[error("Invalid or expired token")]
    AuthTokenInvalid,

    #[error("Persistence error")]
    Persistence(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<AdmissionError> for AppError {
    fn from(err: AdmissionError) -> Self {
        match err {
            AdmissionError::EstablishmentNotFound => AppError::NotFound(err.to_string()),
            AdmissionError::Persistence(inner) => AppError::Persistence(inner),
            AdmissionError::MissingCustomerName
            | AdmissionError::EmptyCart
            | AdmissionError::InvalidFulfillmentMode
            | AdmissionError::EstablishmentClosed
            | AdmissionError::InvalidQuantity(_)
            | AdmissionError::ProductUnavailable(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

impl From<OrderStoreError> for AppError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::InvalidStatus(_) => AppError::BadRequest(err.to_string()),
            OrderStoreError::OrderNotFound => AppError::NotFound(err.to_string()),
            OrderStoreError::Persistence(inner) => AppError::Persistence(inner),
        }
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::AuthTokenMissing | AppError::AuthTokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::Persistence(err) => {
                tracing::error!(error = ?err, "persistence failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "internal failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal Server Error".to_string(),
            _ => self.to_string(),
        };

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData { error: message }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
