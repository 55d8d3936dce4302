use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use shared_models::domain::{
    AppointmentRecord, AppointmentStatus, Doctor, Hospital, NewAppointment, PatientProfile, User,
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(String),

    #[error("storage failure: {0}")]
    Backend(String),
}

/// Read access to the directory entities managed by the excluded CRUD
/// surface. Booking only resolves references and the dashboard only counts.
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn get_doctor(&self, id: i64) -> Result<Option<Doctor>, StoreError>;
    async fn get_hospital(&self, id: i64) -> Result<Option<Hospital>, StoreError>;

    async fn count_users(&self) -> Result<u64, StoreError>;
    async fn count_doctors(&self) -> Result<u64, StoreError>;
    async fn count_hospitals(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait PatientProfileStore: Send + Sync {
    /// One profile per user identity, absent until the first booking.
    async fn find_profile(&self, user_id: i64) -> Result<Option<PatientProfile>, StoreError>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// The booking unit of work: upsert the patient profile, assign the
    /// next appointment id, mint the tracking id from that id, and insert
    /// the appointment in status `Booked`, all under one transaction.
    /// Either everything commits or nothing is visible to later reads.
    async fn create_booking(
        &self,
        profile: PatientProfile,
        appointment: NewAppointment,
    ) -> Result<AppointmentRecord, StoreError>;

    async fn get(&self, id: i64) -> Result<Option<AppointmentRecord>, StoreError>;

    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError>;

    /// Appointments for one patient, newest first.
    async fn list_by_patient(&self, user_id: i64) -> Result<Vec<AppointmentRecord>, StoreError>;

    async fn list_recent(&self, limit: usize) -> Result<Vec<AppointmentRecord>, StoreError>;

    /// Rewrites the status and bumps `updated_at`. The state machine is
    /// enforced by the caller; the store only rejects unknown ids.
    async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<AppointmentRecord, StoreError>;

    /// Records mutated strictly after the given watermark.
    async fn find_updated_after(
        &self,
        watermark: DateTime<Utc>,
    ) -> Result<Vec<AppointmentRecord>, StoreError>;

    async fn count_appointments(&self) -> Result<u64, StoreError>;
    async fn count_by_status(&self, status: AppointmentStatus) -> Result<u64, StoreError>;
}
