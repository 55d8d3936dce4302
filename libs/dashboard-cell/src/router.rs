use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::get_dashboard_stats;
use crate::services::stats::DashboardStatsService;

pub fn dashboard_routes(service: Arc<DashboardStatsService>) -> Router {
    Router::new()
        .route("/stats", get(get_dashboard_stats))
        .with_state(service)
}
