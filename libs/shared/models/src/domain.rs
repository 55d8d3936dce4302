use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered account able to book appointments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub hospital_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: i64,
    pub name: String,
    pub city: String,
}

/// Demographic data attached to a user, created lazily on first booking.
/// At most one profile exists per user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientProfile {
    pub user_id: i64,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub mobile_number: Option<String>,
    pub age: Option<i32>,
    pub last_appointment: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Booked,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Booked => write!(f, "BOOKED"),
            Self::Completed => write!(f, "COMPLETED"),
            Self::Cancelled => write!(f, "CANCELLED"),
        }
    }
}

/// Persisted appointment row. `tracking_id` is unique and immutable once
/// assigned; `updated_at` never precedes `created_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: i64,
    pub tracking_id: String,
    pub patient_user_id: i64,
    pub doctor_id: i64,
    pub hospital_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields the booking transaction supplies; the store assigns id,
/// tracking id, status and audit timestamps.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_user_id: i64,
    pub doctor_id: i64,
    pub hospital_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
}

/// Aggregate counts pushed on the `dashboard` topic and served by the
/// stats endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_hospitals: u64,
    pub total_doctors: u64,
    pub total_appointments: u64,
    pub booked_appointments: u64,
    pub completed_appointments: u64,
    pub cancelled_appointments: u64,
    pub total_patients: u64,
}
