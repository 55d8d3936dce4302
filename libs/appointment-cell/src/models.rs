use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use patient_cell::models::ProfilePatch;
use shared_models::domain::{AppointmentRecord, AppointmentStatus, Doctor, Hospital, User};
use shared_models::error::AppError;

/// Booking input. Date arrives in whatever format the client produced
/// (the robust parser sorts it out); time must be canonical `HH:MM`.
/// Demographic overrides ride along and feed the profile upsert.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    pub doctor_id: i64,
    pub hospital_id: i64,
    pub appointment_date: String,
    pub appointment_time: String,
    #[serde(flatten)]
    pub profile: ProfilePatch,
}

/// Wire projection of one appointment, pushed on the `appointments` topic
/// and returned by the booking/lookup endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentResponse {
    pub id: i64,
    pub tracking_id: String,
    pub patient_name: String,
    pub doctor_name: String,
    pub doctor_specialization: String,
    pub hospital_name: String,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
}

impl AppointmentResponse {
    pub fn project(
        record: &AppointmentRecord,
        patient: &User,
        doctor: &Doctor,
        hospital: &Hospital,
    ) -> Self {
        Self {
            id: record.id,
            tracking_id: record.tracking_id.clone(),
            patient_name: patient.name.clone(),
            doctor_name: doctor.name.clone(),
            doctor_specialization: doctor.specialization.clone(),
            hospital_name: hospital.name.clone(),
            appointment_date: record.appointment_date,
            appointment_time: record.appointment_time.format("%H:%M").to_string(),
            status: record.status,
            created_at: record.created_at,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppointmentError {
    #[error("User not found")]
    UserNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Hospital not found")]
    HospitalNotFound,

    #[error("Appointment not found")]
    NotFound,

    #[error("Appointment not found with tracking ID: {0}")]
    TrackingIdNotFound(String),

    #[error("Invalid appointment date ({date}) or time format ({time})")]
    InvalidSchedule { date: String, time: String },

    #[error("Appointment is already cancelled")]
    AlreadyCancelled,

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    /// Unexpected internal fault on the booking path, surfaced with a
    /// descriptive cause instead of leaking a raw storage error.
    #[error("Booking failed: {0}")]
    BookingFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        match &err {
            AppointmentError::UserNotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::HospitalNotFound
            | AppointmentError::NotFound
            | AppointmentError::TrackingIdNotFound(_) => AppError::NotFound(err.to_string()),
            AppointmentError::InvalidSchedule { .. }
            | AppointmentError::AlreadyCancelled
            | AppointmentError::InvalidStatusTransition { .. }
            | AppointmentError::BookingFailed(_) => AppError::BadRequest(err.to_string()),
            AppointmentError::DatabaseError(msg) => AppError::Database(msg.clone()),
        }
    }
}
