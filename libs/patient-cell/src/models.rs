use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::domain::PatientProfile;
use shared_models::error::AppError;
use shared_database::store::StoreError;

/// Demographic overrides a booking request may carry. Every field is
/// optional; partial-update semantics mean an absent field never touches
/// the stored profile.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    pub patient_name: Option<String>,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub mobile_number: Option<String>,
    pub age: Option<i32>,
    pub last_appointment: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfileResponse {
    pub user_id: i64,
    pub name: String,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub mobile_number: Option<String>,
    pub age: Option<i32>,
    pub last_appointment: Option<DateTime<Utc>>,
}

impl From<PatientProfile> for PatientProfileResponse {
    fn from(profile: PatientProfile) -> Self {
        Self {
            user_id: profile.user_id,
            name: profile.name,
            dob: profile.dob,
            gender: profile.gender,
            mobile_number: profile.mobile_number,
            age: profile.age,
            last_appointment: profile.last_appointment,
        }
    }
}

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Patient profile not found for user {0}")]
    NotFound(i64),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<StoreError> for ProfileError {
    fn from(err: StoreError) -> Self {
        ProfileError::DatabaseError(err.to_string())
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        match err {
            ProfileError::NotFound(_) => AppError::NotFound(err.to_string()),
            ProfileError::DatabaseError(msg) => AppError::Database(msg),
        }
    }
}
