use axum::http::StatusCode;
use thiserror::Error;

/// Rejected user intents. None of these touch the stored document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuestError {
    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("task '{0}' is not on today's list")]
    InactiveTask(String),

    #[error("unknown board column '{0}'")]
    UnknownColumn(String),

    #[error("unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("unknown room '{0}'")]
    UnknownRoom(String),

    #[error("water adjustment must not be zero")]
    InvalidWaterDelta,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<QuestError> for AppError {
    fn from(err: QuestError) -> Self {
        Self::bad_request(err.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
