// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{
    AppointmentListQuery, CreateAppointmentRequest, ResendCodeRequest, UpdateStatusRequest,
    VerifyCodeRequest,
};
use crate::state::AppState;

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request.validate().map_err(AppError::ValidationError)?;

    let appointment = state.booking.create_appointment(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Appointment created successfully",
            "data": { "appointment": appointment }
        })),
    ))
}

#[axum::debug_handler]
pub async fn verify_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<Json<Value>, AppError> {
    request.validate().map_err(AppError::ValidationError)?;

    let appointment = state.booking.verify_code(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Code verified successfully",
        "data": { "appointment": appointment }
    })))
}

#[axum::debug_handler]
pub async fn resend_code(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResendCodeRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state.booking.resend_code(request).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Code resent successfully",
        "data": { "appointment": appointment }
    })))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AppointmentListQuery>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let appointments = state.booking.list_appointments(&user, query).await?;

    Ok(Json(json!({
        "success": true,
        "data": { "appointments": appointments }
    })))
}

#[axum::debug_handler]
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let appointment = state
        .booking
        .update_status(&user, appointment_id, request.intent())
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": { "appointment": appointment }
    })))
}
