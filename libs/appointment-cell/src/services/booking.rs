use std::sync::Arc;

use tracing::{debug, info, warn};

use dashboard_cell::services::stats::DashboardStatsService;
use patient_cell::services::profile::merge_booking_patch;
use realtime_cell::services::broadcast::EventBroadcaster;
use shared_database::store::{
    AppointmentStore, DirectoryStore, PatientProfileStore, StoreError,
};
use shared_models::domain::{AppointmentRecord, AppointmentStatus, NewAppointment};
use shared_utils::dates::{parse_date_robustly, parse_time_strict};

use crate::models::{AppointmentError, AppointmentResponse, BookAppointmentRequest};
use crate::services::lifecycle::AppointmentLifecycleService;

pub struct AppointmentBookingService {
    directory: Arc<dyn DirectoryStore>,
    profiles: Arc<dyn PatientProfileStore>,
    appointments: Arc<dyn AppointmentStore>,
    stats: Arc<DashboardStatsService>,
    broadcaster: Arc<EventBroadcaster>,
    lifecycle: AppointmentLifecycleService,
    recent_limit: usize,
}

impl AppointmentBookingService {
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        profiles: Arc<dyn PatientProfileStore>,
        appointments: Arc<dyn AppointmentStore>,
        stats: Arc<DashboardStatsService>,
        broadcaster: Arc<EventBroadcaster>,
        recent_limit: usize,
    ) -> Self {
        Self {
            directory,
            profiles,
            appointments,
            stats,
            broadcaster,
            lifecycle: AppointmentLifecycleService::new(),
            recent_limit,
        }
    }

    /// The booking transaction: resolve references, fold the demographic
    /// overrides into the patient profile, validate the schedule, and
    /// commit profile + appointment as one atomic unit in the store. Event
    /// publication afterwards is fire-and-forget.
    pub async fn book_appointment(
        &self,
        user_id: i64,
        request: BookAppointmentRequest,
    ) -> Result<AppointmentResponse, AppointmentError> {
        info!(
            "Booking appointment for user {} with doctor {}",
            user_id, request.doctor_id
        );

        let user = self
            .directory
            .get_user(user_id)
            .await
            .map_err(Self::booking_fault)?
            .ok_or(AppointmentError::UserNotFound)?;
        let doctor = self
            .directory
            .get_doctor(request.doctor_id)
            .await
            .map_err(Self::booking_fault)?
            .ok_or(AppointmentError::DoctorNotFound)?;
        let hospital = self
            .directory
            .get_hospital(request.hospital_id)
            .await
            .map_err(Self::booking_fault)?
            .ok_or(AppointmentError::HospitalNotFound)?;

        let existing = self
            .profiles
            .find_profile(user_id)
            .await
            .map_err(Self::booking_fault)?;
        let profile = merge_booking_patch(existing, &user, &request.profile);

        // A required schedule is never defaulted: either both parts parse
        // or the whole booking is rejected with the raw input echoed back.
        let appointment_date = parse_date_robustly(&request.appointment_date);
        let appointment_time = parse_time_strict(&request.appointment_time);
        let (Some(appointment_date), Some(appointment_time)) =
            (appointment_date, appointment_time)
        else {
            return Err(AppointmentError::InvalidSchedule {
                date: request.appointment_date,
                time: request.appointment_time,
            });
        };

        let record = self
            .appointments
            .create_booking(
                profile,
                NewAppointment {
                    patient_user_id: user.id,
                    doctor_id: doctor.id,
                    hospital_id: hospital.id,
                    appointment_date,
                    appointment_time,
                },
            )
            .await
            .map_err(Self::booking_fault)?;

        info!(
            "Appointment {} booked with tracking id {}",
            record.id, record.tracking_id
        );

        let response = AppointmentResponse::project(&record, &user, &doctor, &hospital);
        self.notify(&response).await;
        Ok(response)
    }

    pub async fn get_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<AppointmentResponse, AppointmentError> {
        debug!("Looking up appointment by tracking id {}", tracking_id);

        let record = self
            .appointments
            .find_by_tracking_id(tracking_id)
            .await
            .map_err(Self::storage)?
            .ok_or_else(|| AppointmentError::TrackingIdNotFound(tracking_id.to_string()))?;

        self.project(&record).await
    }

    /// All appointments for one patient, newest first.
    pub async fn get_by_patient(
        &self,
        user_id: i64,
    ) -> Result<Vec<AppointmentResponse>, AppointmentError> {
        let records = self
            .appointments
            .list_by_patient(user_id)
            .await
            .map_err(Self::storage)?;

        let mut responses = Vec::with_capacity(records.len());
        for record in &records {
            responses.push(self.project(record).await?);
        }
        Ok(responses)
    }

    pub async fn get_recent(&self) -> Result<Vec<AppointmentResponse>, AppointmentError> {
        let records = self
            .appointments
            .list_recent(self.recent_limit)
            .await
            .map_err(Self::storage)?;

        let mut responses = Vec::with_capacity(records.len());
        for record in &records {
            responses.push(self.project(record).await?);
        }
        Ok(responses)
    }

    /// Cancel is deliberately not idempotent: a second cancel is an error,
    /// not a no-op.
    pub async fn cancel_appointment(
        &self,
        id: i64,
    ) -> Result<AppointmentResponse, AppointmentError> {
        debug!("Cancelling appointment {}", id);

        let record = self
            .appointments
            .get(id)
            .await
            .map_err(Self::storage)?
            .ok_or(AppointmentError::NotFound)?;

        if record.status == AppointmentStatus::Cancelled {
            return Err(AppointmentError::AlreadyCancelled);
        }
        self.lifecycle
            .validate_status_transition(record.status, AppointmentStatus::Cancelled)?;

        let updated = self
            .appointments
            .update_status(id, AppointmentStatus::Cancelled)
            .await
            .map_err(Self::storage)?;

        info!("Appointment {} cancelled", id);

        let response = self.project(&updated).await?;
        self.notify(&response).await;
        Ok(response)
    }

    /// Resolve directory names for a stored record. A dangling reference
    /// means the store lost integrity, surfaced as a storage error.
    async fn project(
        &self,
        record: &AppointmentRecord,
    ) -> Result<AppointmentResponse, AppointmentError> {
        let patient = self
            .directory
            .get_user(record.patient_user_id)
            .await
            .map_err(Self::storage)?
            .ok_or_else(|| {
                AppointmentError::DatabaseError(format!(
                    "appointment {} references missing user {}",
                    record.id, record.patient_user_id
                ))
            })?;
        let doctor = self
            .directory
            .get_doctor(record.doctor_id)
            .await
            .map_err(Self::storage)?
            .ok_or_else(|| {
                AppointmentError::DatabaseError(format!(
                    "appointment {} references missing doctor {}",
                    record.id, record.doctor_id
                ))
            })?;
        let hospital = self
            .directory
            .get_hospital(record.hospital_id)
            .await
            .map_err(Self::storage)?
            .ok_or_else(|| {
                AppointmentError::DatabaseError(format!(
                    "appointment {} references missing hospital {}",
                    record.id, record.hospital_id
                ))
            })?;

        Ok(AppointmentResponse::project(
            record, &patient, &doctor, &hospital,
        ))
    }

    /// Publish to both topics. Notification is best-effort and never fails
    /// or rolls back the mutation that triggered it.
    async fn notify(&self, response: &AppointmentResponse) {
        self.broadcaster.publish_appointment(response);

        match self.stats.snapshot().await {
            Ok(stats) => {
                self.broadcaster.publish_dashboard(&stats);
            }
            Err(e) => {
                warn!("Dashboard stats recompute failed after mutation: {}", e);
            }
        }
    }

    fn storage(err: StoreError) -> AppointmentError {
        AppointmentError::DatabaseError(err.to_string())
    }

    /// Storage faults inside the booking transaction re-signal as a
    /// descriptive `BookingFailed` (a client-visible 400) rather than a
    /// bare storage error.
    fn booking_fault(err: StoreError) -> AppointmentError {
        AppointmentError::BookingFailed(err.to_string())
    }
}
