use std::sync::Arc;

use axum::{extract::State, response::Json};
use tracing::info;

use shared_models::error::AppError;
use shared_utils::extractor::AuthenticatedUser;

use crate::models::PatientProfileResponse;
use crate::services::profile::ProfileService;

/// The caller's demographic profile, absent until their first booking.
pub async fn get_my_profile(
    State(service): State<Arc<ProfileService>>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<PatientProfileResponse>, AppError> {
    info!("Profile request from user {}", user_id);
    let profile = service.get_profile(user_id).await?;
    Ok(Json(profile.into()))
}
