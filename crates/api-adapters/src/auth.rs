//! Bearer-session extractor. Handlers that take [`AuthSession`] never run
//! for unauthenticated callers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use domains::{AppError, Session};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

/// The credential of a `Bearer` authorization header. The scheme name is
/// matched case-insensitively.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError(AppError::Unauthorized))?;

        state.sessions.verify(token).map(AuthSession).map_err(|err| {
            debug!(error = %err, "session rejected");
            ApiError(AppError::from(err))
        })
    }
}
