use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    book_appointment, cancel_appointment, get_by_tracking_id, get_my_appointments,
    get_recent_appointments,
};
use crate::services::booking::AppointmentBookingService;

pub fn appointment_routes(service: Arc<AppointmentBookingService>) -> Router {
    Router::new()
        .route("/", post(book_appointment))
        .route("/track/{tracking_id}", get(get_by_tracking_id))
        .route("/my", get(get_my_appointments))
        .route("/recent", get(get_recent_appointments))
        .route("/{id}/cancel", put(cancel_appointment))
        .with_state(service)
}
