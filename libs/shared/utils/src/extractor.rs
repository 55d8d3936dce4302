use axum::{extract::FromRequestParts, http::request::Parts};

use shared_models::error::AppError;

/// Identity of the requesting user, as established by the auth layer in
/// front of this service. Session mechanics live outside this core; the
/// resolved user id reaches us as the `x-user-id` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedUser(pub i64);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| AppError::Auth("Missing x-user-id header".to_string()))?;

        let value = header
            .to_str()
            .map_err(|_| AppError::Auth("Invalid x-user-id header format".to_string()))?;

        let user_id = value
            .parse::<i64>()
            .map_err(|_| AppError::Auth("Invalid x-user-id header format".to_string()))?;

        Ok(AuthenticatedUser(user_id))
    }
}
