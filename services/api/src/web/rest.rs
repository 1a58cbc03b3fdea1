//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the AOI and analysis endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use geowatch_core::domain::{AoiPatch, AoiStatus, ChangeType, MonitoringFrequency, NewAoi};
use geowatch_core::ports::PortError;
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ApiError, ErrorBody};
use crate::web::auth::{self, LoginRequest, SignupRequest};
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        list_aois_handler,
        create_aoi_handler,
        get_aoi_handler,
        update_aoi_handler,
        delete_aoi_handler,
        change_alerts_handler,
        ndvi_handler,
        report_handler,
        summary_handler,
        health_handler,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            ErrorBody,
            NewAoi,
            AoiPatch,
            ChangeType,
            MonitoringFrequency,
            AoiStatus
        )
    ),
    tags(
        (name = "GeoWatch API", description = "Areas of interest, NDVI analysis and change alerts.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Service Endpoints
//=========================================================================================

/// GET / - Service banner
pub async fn root_handler() -> impl IntoResponse {
    Json(json!({
        "name": "GeoWatch API",
        "version": env!("CARGO_PKG_VERSION"),
        "tagline": "Monitor Earth. Detect Change. Act Smart.",
        "status": "operational",
        "docs": "/swagger-ui"
    }))
}

/// GET /health - Liveness check
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy", "service": "geowatch-api" }))
}

//=========================================================================================
// AOI Handlers
//=========================================================================================

/// List all monitoring zones.
#[utoipa::path(
    get,
    path = "/api/geowatch/aois",
    responses(
        (status = 200, description = "All AOIs in the collection"),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn list_aois_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.providers.aois.list().await?))
}

/// Create a monitoring zone.
#[utoipa::path(
    post,
    path = "/api/geowatch/aois",
    request_body = NewAoi,
    responses(
        (status = 201, description = "The created AOI"),
        (status = 401, description = "No active session", body = ErrorBody)
    )
)]
pub async fn create_aoi_handler(
    State(state): State<Arc<AppState>>,
    Json(data): Json<NewAoi>,
) -> Result<impl IntoResponse, ApiError> {
    let aoi = state.providers.aois.create(data).await?;
    Ok((StatusCode::CREATED, Json(aoi)))
}

/// Get one monitoring zone.
#[utoipa::path(
    get,
    path = "/api/geowatch/aois/{id}",
    params(("id" = String, Path, description = "AOI id")),
    responses(
        (status = 200, description = "The AOI"),
        (status = 404, description = "No AOI with this id", body = ErrorBody)
    )
)]
pub async fn get_aoi_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let aoi = state
        .providers
        .aois
        .get(&id)
        .await?
        .ok_or_else(|| PortError::NotFound(format!("AOI {} not found", id)))?;
    Ok(Json(aoi))
}

/// Merge fields into a monitoring zone.
#[utoipa::path(
    put,
    path = "/api/geowatch/aois/{id}",
    params(("id" = String, Path, description = "AOI id")),
    request_body = AoiPatch,
    responses(
        (status = 200, description = "The updated AOI"),
        (status = 400, description = "Change count over the limit", body = ErrorBody),
        (status = 404, description = "No AOI with this id", body = ErrorBody)
    )
)]
pub async fn update_aoi_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(patch): Json<AoiPatch>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.providers.aois.update(&id, patch).await?))
}

/// Delete a monitoring zone. Deleting an unknown id succeeds.
#[utoipa::path(
    delete,
    path = "/api/geowatch/aois/{id}",
    params(("id" = String, Path, description = "AOI id")),
    responses((status = 200, description = "Deleted, or already absent"))
)]
pub async fn delete_aoi_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.providers.aois.delete(&id).await?;
    Ok(Json(json!({
        "message": "Monitoring zone deleted successfully",
        "deleted_id": id
    })))
}

/// Change detection alerts for a zone, most recent first.
#[utoipa::path(
    get,
    path = "/api/geowatch/aois/{id}/changes",
    params(("id" = String, Path, description = "AOI id")),
    responses((status = 200, description = "Alerts; empty for an unknown AOI"))
)]
pub async fn change_alerts_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.providers.analysis.change_alerts(&id).await?))
}

//=========================================================================================
// Analysis Handlers
//=========================================================================================

/// Twelve-month NDVI series with trend and statistics.
#[utoipa::path(
    get,
    path = "/api/geowatch/analysis/{id}/ndvi",
    params(("id" = String, Path, description = "AOI id")),
    responses(
        (status = 200, description = "NDVI series"),
        (status = 404, description = "No AOI with this id", body = ErrorBody)
    )
)]
pub async fn ndvi_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.providers.analysis.ndvi_time_series(&id).await?))
}

/// Composite report for a zone.
#[utoipa::path(
    get,
    path = "/api/geowatch/analysis/{id}/report",
    params(("id" = String, Path, description = "AOI id")),
    responses(
        (status = 200, description = "Report"),
        (status = 404, description = "No AOI with this id", body = ErrorBody)
    )
)]
pub async fn report_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.providers.analysis.generate_report(&id).await?))
}

/// Dashboard totals across all zones.
#[utoipa::path(
    get,
    path = "/api/geowatch/analysis/summary",
    responses((status = 200, description = "Summary statistics"))
)]
pub async fn summary_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.providers.analysis.summary_stats().await?))
}
