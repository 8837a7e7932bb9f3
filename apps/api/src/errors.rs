use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::quiz::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Text analysis failed; the session has already been reset.
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::InvalidTransition { .. } | SessionError::Stale { .. } => {
                AppError::Conflict(e.to_string())
            }
            SessionError::WrongProfileStep { .. }
            | SessionError::MissingProfileField(_)
            | SessionError::HistoryOutOfRange(_)
            | SessionError::AnswerOutOfRange(_)
            | SessionError::UnexpectedQuestion { .. } => AppError::Validation(e.to_string()),
            SessionError::SequenceMismatch | SessionError::WrongBatchSize(_) => {
                AppError::Internal(anyhow::anyhow!(e))
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::AnalysisFailed(msg) => {
                tracing::error!("Analysis failed: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ANALYSIS_FAILED",
                    "Analysis disrupted. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::session::SessionState;

    #[test]
    fn test_session_errors_map_to_status() {
        let stale: AppError = SessionError::Stale {
            ticket: 0,
            current: 1,
        }
        .into();
        assert_eq!(stale.into_response().status(), StatusCode::CONFLICT);

        let wrong_state: AppError = SessionError::InvalidTransition {
            action: "start",
            state: SessionState::InQuiz,
        }
        .into();
        assert_eq!(wrong_state.into_response().status(), StatusCode::CONFLICT);

        let bad_value: AppError = SessionError::AnswerOutOfRange(9).into();
        assert_eq!(bad_value.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_analysis_failure_is_bad_gateway() {
        let response = AppError::AnalysisFailed("timeout".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
