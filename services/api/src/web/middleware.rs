//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use geowatch_core::ports::PortError;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::web::state::AppState;

pub const SESSION_COOKIE: &str = "geowatch_access_token";

/// The token from `Authorization: Bearer ...`, falling back to the session cookie.
fn presented_token(req: &Request) -> Option<String> {
    let headers = req.headers();

    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());
    if bearer.is_some() {
        return bearer;
    }

    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|c| {
                c.trim()
                    .strip_prefix(SESSION_COOKIE)
                    .and_then(|rest| rest.strip_prefix('='))
                    .map(str::to_string)
            })
        })
}

/// Middleware that only lets a request through when it presents the token of
/// the active session. Otherwise returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = presented_token(&req).ok_or(PortError::Unauthorized)?;

    let active = state.providers.auth.session_token().await?;
    if active.as_deref() != Some(presented.as_str()) {
        warn!(path = %req.uri().path(), "Rejected request with a stale or unknown token");
        return Err(PortError::Unauthorized.into());
    }

    Ok(next.run(req).await)
}
