use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use crate::core::error::Result;
use crate::shared::types::ApiResponse;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthDto {
    pub status: String,
    pub database: String,
}

/// Liveness plus a database round trip
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service and database reachable", body = ApiResponse<HealthDto>),
        (status = 500, description = "Database unreachable")
    ),
    tag = "health"
)]
pub async fn health_check(State(pool): State<PgPool>) -> Result<Json<ApiResponse<HealthDto>>> {
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(Json(ApiResponse::success(
        Some(HealthDto {
            status: "ok".to_string(),
            database: "ok".to_string(),
        }),
        None,
    )))
}

pub fn routes(pool: PgPool) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(pool)
}
