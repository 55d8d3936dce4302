use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::Json,
};
use tracing::info;

use shared_models::error::AppError;
use shared_utils::extractor::AuthenticatedUser;

use crate::models::{AppointmentResponse, BookAppointmentRequest};
use crate::services::booking::AppointmentBookingService;

pub async fn book_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<AppointmentResponse>, AppError> {
    info!("Booking request from user {}", user_id);
    let response = service.book_appointment(user_id, request).await?;
    Ok(Json(response))
}

pub async fn get_by_tracking_id(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(tracking_id): Path<String>,
) -> Result<Json<AppointmentResponse>, AppError> {
    let response = service.get_by_tracking_id(&tracking_id).await?;
    Ok(Json(response))
}

pub async fn get_my_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let responses = service.get_by_patient(user_id).await?;
    Ok(Json(responses))
}

pub async fn get_recent_appointments(
    State(service): State<Arc<AppointmentBookingService>>,
) -> Result<Json<Vec<AppointmentResponse>>, AppError> {
    let responses = service.get_recent().await?;
    Ok(Json(responses))
}

pub async fn cancel_appointment(
    State(service): State<Arc<AppointmentBookingService>>,
    Path(id): Path<i64>,
) -> Result<Json<AppointmentResponse>, AppError> {
    info!("Cancel request for appointment {}", id);
    let response = service.cancel_appointment(id).await?;
    Ok(Json(response))
}
