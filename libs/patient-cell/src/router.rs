use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::get_my_profile;
use crate::services::profile::ProfileService;

pub fn patient_routes(service: Arc<ProfileService>) -> Router {
    Router::new()
        .route("/me", get(get_my_profile))
        .with_state(service)
}
