use std::sync::Arc;

use tracing::debug;

use shared_database::store::PatientProfileStore;
use shared_models::domain::{PatientProfile, User};
use shared_utils::dates::parse_date_robustly;

use crate::models::{ProfileError, ProfilePatch};

/// Fold a booking's demographic overrides into the stored profile (or a
/// blank one on first booking). Pure merge: persistence happens inside the
/// booking unit of work so the profile never commits without its
/// appointment.
///
/// Name falls back to the user's registered name when the override is
/// blank. Dates go through the robust multi-format parser; an unreadable
/// dob is stored as unknown rather than rejecting the booking, while an
/// unreadable last-appointment leaves the previous value alone.
pub fn merge_booking_patch(
    existing: Option<PatientProfile>,
    user: &User,
    patch: &ProfilePatch,
) -> PatientProfile {
    let mut profile = existing.unwrap_or(PatientProfile {
        user_id: user.id,
        name: user.name.clone(),
        dob: None,
        gender: None,
        mobile_number: None,
        age: None,
        last_appointment: None,
    });
    profile.user_id = user.id;

    profile.name = match &patch.patient_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => user.name.clone(),
    };

    if let Some(dob) = &patch.dob {
        if !dob.trim().is_empty() {
            profile.dob = parse_date_robustly(dob);
        }
    }

    if let Some(gender) = &patch.gender {
        profile.gender = Some(gender.clone());
    }
    if let Some(mobile) = &patch.mobile_number {
        profile.mobile_number = Some(mobile.clone());
    }
    if let Some(age) = patch.age {
        profile.age = Some(age);
    }

    if let Some(raw) = &patch.last_appointment {
        if let Some(date) = parse_date_robustly(raw) {
            profile.last_appointment = Some(date.and_hms_opt(0, 0, 0).expect("midnight").and_utc());
        }
    }

    profile
}

pub struct ProfileService {
    profiles: Arc<dyn PatientProfileStore>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn PatientProfileStore>) -> Self {
        Self { profiles }
    }

    pub async fn get_profile(&self, user_id: i64) -> Result<PatientProfile, ProfileError> {
        debug!("Fetching patient profile for user {}", user_id);
        self.profiles
            .find_profile(user_id)
            .await?
            .ok_or(ProfileError::NotFound(user_id))
    }
}
