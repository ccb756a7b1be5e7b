// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use shared_utils::extractor::{auth_middleware, require_doctor_or_assistant};

use crate::handlers;
use crate::state::AppState;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    // Booking and code verification are patient-facing and unauthenticated
    let public_routes = Router::new()
        .route("/", post(handlers::create_appointment))
        .route("/verify-code", post(handlers::verify_code))
        .route("/resend-code", post(handlers::resend_code));

    // Listing and status transitions are staff-only
    let staff_routes = Router::new()
        .route("/", get(handlers::list_appointments))
        .route("/update-status/{appointment_id}", put(handlers::update_status))
        .layer(middleware::from_fn(require_doctor_or_assistant))
        .layer(middleware::from_fn_with_state(state.config.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(staff_routes)
        .with_state(state)
}
