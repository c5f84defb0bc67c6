use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::services::task_item::TaskItemServiceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    TaskItem(#[from] TaskItemServiceError),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::TaskItem(err) => match err {
                TaskItemServiceError::NotFound(_) => (StatusCode::NOT_FOUND, "TaskItemError"),
                TaskItemServiceError::InvalidRequest(_) => {
                    (StatusCode::BAD_REQUEST, "TaskItemError")
                }
                TaskItemServiceError::Database(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError")
                }
            },
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        let message = match &self {
            ApiError::TaskItem(TaskItemServiceError::InvalidRequest(msg)) => msg.clone(),
            ApiError::BadRequest(msg) => msg.clone(),
            _ if status_code.is_server_error() => {
                "Something went wrong while talking to the database.".to_string()
            }
            _ => self.to_string(),
        };

        if status_code.is_server_error() {
            tracing::error!(
                status = %status_code,
                error_type,
                error = %self,
                "API request failed"
            );
        } else if status_code == StatusCode::NOT_FOUND {
            tracing::warn!(error_type, "{}", self);
        }

        let body = ErrorBody {
            success: false,
            message,
        };
        (status_code, Json(body)).into_response()
    }
}
