use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::errors::DomainError;

/// API error type with HTTP status code and message
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    /// Creates a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Creates a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a 401 Unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Creates a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// 409, used for lifecycle transitions that do not apply
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Creates a 500 Internal Server Error
    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let message = err.to_string();
        match err {
            DomainError::InvalidTransition { .. } => Self::conflict(message),
            DomainError::InvalidInput(_) => Self::bad_request(message),
            DomainError::NotFound { .. } => Self::not_found(message),
            DomainError::Forbidden(_) => Self::forbidden(message),
            DomainError::StoreUnavailable(_) => Self::service_unavailable(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::TaskAction;
    use uuid::Uuid;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (
                DomainError::invalid_transition(TaskAction::Verify, "task is assigned"),
                StatusCode::CONFLICT,
            ),
            (
                DomainError::InvalidInput("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (DomainError::task_not_found(Uuid::new_v4()), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("no".to_string()), StatusCode::FORBIDDEN),
            (
                DomainError::StoreUnavailable("down".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn transition_message_names_the_action() {
        let err = ApiError::from(DomainError::invalid_transition(
            TaskAction::Approve,
            "task is verified",
        ));
        assert_eq!(err.message, "Cannot approve task: task is verified");
    }
}
