pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use self::auth::{login_handler, logout_handler, me_handler, signup_handler};
use self::middleware::require_auth;
use self::rest::{
    change_alerts_handler, create_aoi_handler, delete_aoi_handler, get_aoi_handler,
    health_handler, list_aois_handler, ndvi_handler, report_handler, root_handler,
    summary_handler, update_aoi_handler, ApiDoc,
};
use self::state::AppState;

/// Every API route lives under this prefix.
pub const API_PREFIX: &str = "/api/geowatch";

const DASHBOARD_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:3000",
];

/// Builds the complete router: public auth routes, token-protected AOI and
/// analysis routes, the service banner, health check and Swagger UI.
pub fn create_app(state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/aois", get(list_aois_handler).post(create_aoi_handler))
        .route(
            "/aois/{id}",
            get(get_aoi_handler)
                .put(update_aoi_handler)
                .delete(delete_aoi_handler),
        )
        .route("/aois/{id}/changes", get(change_alerts_handler))
        .route("/analysis/summary", get(summary_handler))
        .route("/analysis/{id}/ndvi", get(ndvi_handler))
        .route("/analysis/{id}/report", get(report_handler))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes);

    let cors = CorsLayer::new()
        .allow_origin(DASHBOARD_ORIGINS.map(HeaderValue::from_static))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest(API_PREFIX, api_router)
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
