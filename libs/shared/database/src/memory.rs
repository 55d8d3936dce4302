use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use shared_models::domain::{
    AppointmentRecord, AppointmentStatus, Doctor, Hospital, NewAppointment, PatientProfile, User,
};
use shared_utils::clock::Clock;
use shared_utils::tracking::mint_tracking_id;

use crate::store::{AppointmentStore, DirectoryStore, PatientProfileStore, StoreError};

#[derive(Default)]
struct StoreInner {
    users: HashMap<i64, User>,
    doctors: HashMap<i64, Doctor>,
    hospitals: HashMap<i64, Hospital>,
    profiles: HashMap<i64, PatientProfile>,
    appointments: BTreeMap<i64, AppointmentRecord>,
}

/// In-process reference implementation of the storage boundary.
///
/// A single `RwLock` over the whole dataset stands in for the relational
/// store's serializable isolation: the booking unit of work holds the write
/// lock from max-id read through appointment insert, so concurrent bookings
/// can never mint the same tracking id or leave a profile without its
/// appointment.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(StoreInner::default()),
            clock,
        }
    }

    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.insert(user.id, user);
    }

    pub async fn insert_doctor(&self, doctor: Doctor) {
        let mut inner = self.inner.write().await;
        inner.doctors.insert(doctor.id, doctor);
    }

    pub async fn insert_hospital(&self, hospital: Hospital) {
        let mut inner = self.inner.write().await;
        inner.hospitals.insert(hospital.id, hospital);
    }
}

#[async_trait]
impl DirectoryStore for MemoryStore {
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_doctor(&self, id: i64) -> Result<Option<Doctor>, StoreError> {
        Ok(self.inner.read().await.doctors.get(&id).cloned())
    }

    async fn get_hospital(&self, id: i64) -> Result<Option<Hospital>, StoreError> {
        Ok(self.inner.read().await.hospitals.get(&id).cloned())
    }

    async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.users.len() as u64)
    }

    async fn count_doctors(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.doctors.len() as u64)
    }

    async fn count_hospitals(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.hospitals.len() as u64)
    }
}

#[async_trait]
impl PatientProfileStore for MemoryStore {
    async fn find_profile(&self, user_id: i64) -> Result<Option<PatientProfile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(&user_id).cloned())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn create_booking(
        &self,
        profile: PatientProfile,
        appointment: NewAppointment,
    ) -> Result<AppointmentRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let now = self.clock.now();

        // Max-id read, tracking-id mint and insert all happen under the
        // same write lock, so concurrent bookings cannot observe the same
        // max id.
        let next_id = inner
            .appointments
            .keys()
            .next_back()
            .copied()
            .unwrap_or(0)
            + 1;
        let tracking_id = mint_tracking_id(now, next_id);

        let record = AppointmentRecord {
            id: next_id,
            tracking_id,
            patient_user_id: appointment.patient_user_id,
            doctor_id: appointment.doctor_id,
            hospital_id: appointment.hospital_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            status: AppointmentStatus::Booked,
            created_at: now,
            updated_at: now,
        };

        inner.profiles.insert(profile.user_id, profile);
        inner.appointments.insert(next_id, record.clone());

        debug!(
            "Committed booking {} (tracking {}) for user {}",
            record.id, record.tracking_id, record.patient_user_id
        );
        Ok(record)
    }

    async fn get(&self, id: i64) -> Result<Option<AppointmentRecord>, StoreError> {
        Ok(self.inner.read().await.appointments.get(&id).cloned())
    }

    async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<AppointmentRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .values()
            .find(|a| a.tracking_id == tracking_id)
            .cloned())
    }

    async fn list_by_patient(&self, user_id: i64) -> Result<Vec<AppointmentRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<AppointmentRecord> = inner
            .appointments
            .values()
            .filter(|a| a.patient_user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<AppointmentRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<AppointmentRecord> = inner.appointments.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(limit);
        Ok(records)
    }

    async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<AppointmentRecord, StoreError> {
        let mut inner = self.inner.write().await;
        let now = self.clock.now();

        let record = inner
            .appointments
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("appointment {}", id)))?;

        record.status = status;
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn find_updated_after(
        &self,
        watermark: DateTime<Utc>,
    ) -> Result<Vec<AppointmentRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .values()
            .filter(|a| a.updated_at > watermark)
            .cloned()
            .collect())
    }

    async fn count_appointments(&self) -> Result<u64, StoreError> {
        Ok(self.inner.read().await.appointments.len() as u64)
    }

    async fn count_by_status(&self, status: AppointmentStatus) -> Result<u64, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .appointments
            .values()
            .filter(|a| a.status == status)
            .count() as u64)
    }
}
