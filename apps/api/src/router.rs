use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use appointment_cell::services::booking::AppointmentBookingService;
use dashboard_cell::router::dashboard_routes;
use dashboard_cell::services::stats::DashboardStatsService;
use patient_cell::router::patient_routes;
use patient_cell::services::profile::ProfileService;
use realtime_cell::router::realtime_routes;
use realtime_cell::services::broadcast::EventBroadcaster;

pub fn create_router(
    booking: Arc<AppointmentBookingService>,
    profiles: Arc<ProfileService>,
    stats: Arc<DashboardStatsService>,
    broadcaster: Arc<EventBroadcaster>,
) -> Router {
    Router::new()
        .route("/", get(|| async { "Appointment booking API is running!" }))
        .nest("/appointments", appointment_routes(booking))
        .nest("/patients", patient_routes(profiles))
        .nest("/dashboard", dashboard_routes(stats))
        .nest("/ws", realtime_routes(broadcaster))
}
