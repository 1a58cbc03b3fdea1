//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for signup, login, logout and the current profile.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use geowatch_core::domain::AuthSession;
use geowatch_core::ports::PortError;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use utoipa::ToSchema;

use crate::error::{ApiError, ErrorBody};
use crate::web::middleware::SESSION_COOKIE;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, Serialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

fn session_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; SameSite=Lax; Path=/", SESSION_COOKIE, token)
}

fn with_cookie(auth: AuthSession) -> impl IntoResponse {
    let cookie = session_cookie(&auth.token);
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(auth))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create an account and start a session
#[utoipa::path(
    post,
    path = "/api/geowatch/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created, session started"),
        (status = 400, description = "Missing field or weak password", body = ErrorBody)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state
        .providers
        .auth
        .signup(&req.email, &req.password, req.name.as_deref())
        .await?;
    info!(user_id = %auth.user.id, "Signup");
    Ok(with_cookie(auth))
}

/// POST /auth/login - Start a session
#[utoipa::path(
    post,
    path = "/api/geowatch/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started"),
        (status = 400, description = "Missing field", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let auth = state
        .providers
        .auth
        .login(&req.email, &req.password)
        .await?;
    info!(user_id = %auth.user.id, "Login");
    Ok(with_cookie(auth))
}

/// POST /auth/logout - End the session
#[utoipa::path(
    post,
    path = "/api/geowatch/auth/logout",
    responses((status = 200, description = "Signed out"))
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    state.providers.auth.logout().await?;

    let cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "Successfully signed out of GeoWatch" })),
    ))
}

/// GET /auth/me - The current user's profile
#[utoipa::path(
    get,
    path = "/api/geowatch/auth/me",
    responses(
        (status = 200, description = "The signed-in user"),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn me_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .providers
        .auth
        .current_user()
        .await?
        .ok_or(PortError::Unauthorized)?;
    Ok(Json(json!({ "user": user })))
}
