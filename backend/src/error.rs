use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AnnouncementError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    InvalidInput(String),

    #[error("Announcement not found")]
    NotFound,

    /// Store faults pass through uncategorized.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AnnouncementError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AnnouncementError::Unauthorized => StatusCode::UNAUTHORIZED,
            AnnouncementError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AnnouncementError::NotFound => StatusCode::NOT_FOUND,
            AnnouncementError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Label used for the `outcome` metric dimension.
    pub fn outcome(&self) -> &'static str {
        match self {
            AnnouncementError::Unauthorized => "unauthorized",
            AnnouncementError::InvalidInput(_) => "invalid_input",
            AnnouncementError::NotFound => "not_found",
            AnnouncementError::Store(_) => "store_error",
        }
    }
}

impl IntoResponse for AnnouncementError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("announcement store failure: {}", self);
        } else {
            tracing::debug!("announcement request rejected ({}): {}", status, self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AnnouncementError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AnnouncementError::InvalidInput("Invalid start date format".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AnnouncementError::NotFound.status_code(), StatusCode::NOT_FOUND);
        let store = AnnouncementError::from(StoreError::NotAnObject {
            collection: "announcements".into(),
        });
        assert_eq!(store.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_input_message_is_the_detail() {
        let err = AnnouncementError::InvalidInput("Expiration date must be in the future".into());
        assert_eq!(err.to_string(), "Expiration date must be in the future");
    }
}
