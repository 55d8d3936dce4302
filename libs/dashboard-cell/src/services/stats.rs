use std::sync::Arc;

use tracing::debug;

use shared_database::store::{AppointmentStore, DirectoryStore, StoreError};
use shared_models::domain::{AppointmentStatus, DashboardStats};

/// Recomputes the operations-dashboard aggregates on demand. Subscribers
/// treat a pushed snapshot as a hint, not a delta, so counting afresh on
/// every call is the whole contract.
pub struct DashboardStatsService {
    directory: Arc<dyn DirectoryStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl DashboardStatsService {
    pub fn new(directory: Arc<dyn DirectoryStore>, appointments: Arc<dyn AppointmentStore>) -> Self {
        Self {
            directory,
            appointments,
        }
    }

    pub async fn snapshot(&self) -> Result<DashboardStats, StoreError> {
        let stats = DashboardStats {
            total_hospitals: self.directory.count_hospitals().await?,
            total_doctors: self.directory.count_doctors().await?,
            total_appointments: self.appointments.count_appointments().await?,
            booked_appointments: self
                .appointments
                .count_by_status(AppointmentStatus::Booked)
                .await?,
            completed_appointments: self
                .appointments
                .count_by_status(AppointmentStatus::Completed)
                .await?,
            cancelled_appointments: self
                .appointments
                .count_by_status(AppointmentStatus::Cancelled)
                .await?,
            total_patients: self.directory.count_users().await?,
        };

        debug!(
            "Dashboard snapshot: {} appointments across {} hospitals",
            stats.total_appointments, stats.total_hospitals
        );
        Ok(stats)
    }
}
