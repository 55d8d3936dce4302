use std::sync::Arc;

use axum::{extract::State, response::Json};

use shared_models::domain::DashboardStats;
use shared_models::error::AppError;

use crate::services::stats::DashboardStatsService;

pub async fn get_dashboard_stats(
    State(service): State<Arc<DashboardStatsService>>,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = service
        .snapshot()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(stats))
}
