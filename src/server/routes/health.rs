//! Health check and status endpoints

use actix_web::{HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::time::Instant;
use tracing::debug;

static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);

/// Configure health check routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/version", web::get().to(version_info));
}

/// Liveness payload
#[derive(Debug, serde::Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub service: Cow<'static, str>,
    pub version: Cow<'static, str>,
}

/// Basic health check endpoint
///
/// Returns a fixed status payload; used by load balancers and the hosting
/// platform's liveness probe.
pub async fn health_check() -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    Ok(HttpResponse::Ok().json(HealthStatus {
        status: Cow::Borrowed("healthy"),
        service: Cow::Borrowed(env!("CARGO_PKG_NAME")),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
    }))
}

/// Build and uptime information
async fn version_info() -> ActixResult<HttpResponse> {
    debug!("Version info requested");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "build_time": env!("BUILD_TIME"),
        "git_hash": env!("GIT_HASH"),
        "rust_version": env!("RUST_VERSION"),
        "uptime_seconds": SERVER_START.elapsed().as_secs(),
    })))
}
