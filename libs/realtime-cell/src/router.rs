use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{appointments_ws, dashboard_ws};
use crate::services::broadcast::EventBroadcaster;

pub fn realtime_routes(broadcaster: Arc<EventBroadcaster>) -> Router {
    Router::new()
        .route("/appointments", get(appointments_ws))
        .route("/dashboard", get(dashboard_ws))
        .with_state(broadcaster)
}
