//! Liveness and readiness checks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::prelude::*;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LivenessResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    pub version: String,
    #[schema(example = "connected")]
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    #[schema(example = "ready")]
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub database: String,
}

fn alive() -> LivenessResponse {
    LivenessResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    }
}

/// Liveness check
///
/// Always 200 while the process serves requests; no dependency is touched.
#[utoipa::path(
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = LivenessResponse))
)]
#[get("/health")]
pub async fn health() -> impl Responder {
    ::tracing::debug!("Liveness check: healthy");
    Json(alive())
}

/// Health including database connectivity
#[utoipa::path(
    tag = "Health",
    responses(
        (status = 200, description = "Service and database are healthy", body = HealthResponse),
        (status = 503, description = "Database unavailable", body = HealthResponse),
    )
)]
#[get("/health/db")]
pub async fn health_db(db: Data<DatabaseConnection>) -> impl Responder {
    let connected = db.ping().await.is_ok();

    let response = HealthResponse {
        status: if connected { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    };

    if connected {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Readiness check
///
/// Ready once the database answers a ping.
#[utoipa::path(
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse),
    )
)]
#[get("/ready")]
pub async fn ready(db: Data<DatabaseConnection>) -> impl Responder {
    let connected = db.ping().await.is_ok();
    let status = if connected { "ready" } else { "not_ready" };
    let database = if connected { "connected" } else { "disconnected" };

    ::tracing::debug!(status, database, "Readiness check performed");

    let response = ReadinessResponse {
        status: status.to_string(),
        timestamp: Utc::now(),
        database: database.to_string(),
    };

    if connected {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}

/// Liveness check, alias of `/health`
#[utoipa::path(
    tag = "Health",
    responses((status = 200, description = "Service is alive", body = LivenessResponse))
)]
#[get("/live")]
pub async fn live() -> impl Responder {
    Json(alive())
}
