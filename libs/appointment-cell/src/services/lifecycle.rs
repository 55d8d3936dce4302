use tracing::{debug, warn};

use shared_models::domain::AppointmentStatus;

use crate::models::AppointmentError;

/// The appointment status state machine. `Booked` is the only non-terminal
/// state; nothing ever transitions back into it, and attempting to leave a
/// terminal state is an error rather than a silent no-op.
pub struct AppointmentLifecycleService;

impl AppointmentLifecycleService {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_status_transition(
        &self,
        current: AppointmentStatus,
        new: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        debug!("Validating status transition {} -> {}", current, new);

        if !self.valid_transitions(current).contains(&new) {
            warn!("Invalid status transition attempted: {} -> {}", current, new);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current,
                to: new,
            });
        }

        Ok(())
    }

    pub fn valid_transitions(&self, current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            // Completion is driven by administrative processes, cancellation
            // by the cancel endpoint.
            AppointmentStatus::Booked => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }
}

impl Default for AppointmentLifecycleService {
    fn default() -> Self {
        Self::new()
    }
}
