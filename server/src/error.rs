use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use zolo_license::LicenseError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    License(#[from] LicenseError),

    #[error("Rejected request: {1}")]
    Rejected(StatusCode, String),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ApiError::License(LicenseError::InvalidPlan(msg)) => {
                (StatusCode::BAD_REQUEST, "Invalid plan", Some(msg.clone()))
            }
            ApiError::License(LicenseError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "Unauthorized", None)
            }
            ApiError::License(LicenseError::NotFound(code)) => {
                (StatusCode::NOT_FOUND, "Not found", Some(code.clone()))
            }
            ApiError::License(LicenseError::DuplicateCode(msg)) => {
                tracing::error!("Code generation exhausted: {}", msg);
                (StatusCode::CONFLICT, "Conflict", None)
            }
            ApiError::License(LicenseError::Storage(msg)) => {
                tracing::error!("Storage error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            ApiError::Join(e) => {
                tracing::error!("Blocking task failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error", None)
            }
            ApiError::Rejected(status, msg) => (*status, "Bad request", Some(msg.clone())),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
