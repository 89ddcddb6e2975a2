//! Maps `AppError` onto HTTP responses.
//!
//! Every failure body is `{ "error": <message> }`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::AppError;
use serde_json::json;

const FALLBACK_MESSAGE: &str = "Failed to generate report";

#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(..) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.to_string();
        let message = if message.trim().is_empty() {
            FALLBACK_MESSAGE.to_string()
        } else {
            message
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_error_kind() {
        assert_eq!(
            ApiError(AppError::Unauthorized).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError(AppError::NotFound("Donor".into(), "x".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError(AppError::Config("missing key".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError(AppError::Parse("no text".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn empty_message_falls_back() {
        let resp = ApiError(AppError::Upstream(String::new())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
