// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use notification_cell::Mailer;
use shared_models::auth::{StaffRole, User};

use crate::models::{
    Appointment, AppointmentError, AppointmentListQuery, AppointmentStatus,
    CreateAppointmentRequest, ResendCodeRequest, TransitionIntent, VerifyCodeRequest,
};
use crate::repository::{AppointmentFilter, AppointmentStore, ChamberStore, StaffStore};
use crate::services::capacity::CapacityGuard;
use crate::services::{lifecycle, schedule, verification};
use crate::templates;

/// Orchestrates the appointment workflow over injected repositories and the
/// mail relay. Constructed once at process start.
pub struct AppointmentBookingService {
    appointments: Arc<dyn AppointmentStore>,
    chambers: Arc<dyn ChamberStore>,
    staff: Arc<dyn StaffStore>,
    mailer: Arc<dyn Mailer>,
    capacity: CapacityGuard,
}

impl AppointmentBookingService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        chambers: Arc<dyn ChamberStore>,
        staff: Arc<dyn StaffStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let capacity = CapacityGuard::new(Arc::clone(&appointments));
        Self {
            appointments,
            chambers,
            staff,
            mailer,
            capacity,
        }
    }

    /// Books a new appointment in `requested` state and emails the patient
    /// a verification code.
    pub async fn create_appointment(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for {} with doctor {} at chamber {}",
            request.patient_email, request.doctor_id, request.chamber_id
        );

        let doctor = self
            .staff
            .find_active_doctor(request.doctor_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .ok_or(AppointmentError::DoctorNotFound)?;

        let chamber = self
            .chambers
            .find_active(request.chamber_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .ok_or(AppointmentError::ChamberNotFound)?;

        let date = schedule::resolve_booking_date(request.date, request.weekday)?;

        self.capacity
            .assert_no_duplicate(request.doctor_id, request.chamber_id, &request.patient_email, date)
            .await?;

        let booked = self
            .capacity
            .assert_under_capacity(request.doctor_id, request.chamber_id, date)
            .await?;

        let (window_start, _) = schedule::visiting_window(&chamber, request.weekday)?;

        let verification_code = verification::generate();
        let now = Utc::now();

        let appointment = Appointment {
            id: Uuid::new_v4(),
            doctor_id: request.doctor_id,
            chamber_id: request.chamber_id,
            patient_name: request.patient_name.clone(),
            patient_email: request.patient_email.clone(),
            date,
            weekday: request.weekday,
            time: window_start,
            verification_code: verification_code.clone(),
            serial_no: booked.len() as i32 + 1,
            status: AppointmentStatus::Requested,
            created_at: now,
            updated_at: now,
        };

        self.appointments
            .insert(&appointment)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let email_body =
            templates::otp_verification_email(&appointment.patient_name, &doctor.name, &verification_code);

        // The record is already persisted; a failed send aborts the request
        // without rolling the appointment back.
        self.mailer
            .send_mail(
                &[appointment.patient_email.clone()],
                "Appointment Verification",
                &email_body,
            )
            .await
            .map_err(|e| AppointmentError::Notification(e.to_string()))?;

        info!(
            "Appointment {} created with serial {} for {}",
            appointment.id, appointment.serial_no, appointment.date
        );
        Ok(appointment)
    }

    /// Confirms a booking from the patient's verification code. Re-checks
    /// capacity before finalizing the slot and emails a confirmation.
    pub async fn verify_code(
        &self,
        request: VerifyCodeRequest,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Verifying code for appointment {}", request.appointment_id);

        let mut appointment = self
            .appointments
            .find_requested_with_code(request.appointment_id, &request.code)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .ok_or(AppointmentError::NotFound)?;

        if verification::is_expired(appointment.updated_at, request.current_time) {
            warn!("Expired code submitted for appointment {}", appointment.id);
            return Err(AppointmentError::CodeExpired);
        }

        self.capacity
            .assert_under_capacity(appointment.doctor_id, appointment.chamber_id, appointment.date)
            .await?;

        appointment.status = AppointmentStatus::Verified;
        appointment.updated_at = Utc::now();

        self.appointments
            .update(&appointment)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let doctor_name = self
            .staff
            .find_by_id(appointment.doctor_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .map(|d| d.name)
            .unwrap_or_default();

        let email_body = templates::confirmation_email(
            &appointment.patient_name,
            &doctor_name,
            &schedule::clinic_date_label(appointment.date),
            &appointment.time.format("%H:%M").to_string(),
        );

        self.mailer
            .send_mail(
                &[appointment.patient_email.clone()],
                "Appointment Confirmation",
                &email_body,
            )
            .await
            .map_err(|e| AppointmentError::Notification(e.to_string()))?;

        info!("Appointment {} verified", appointment.id);
        Ok(appointment)
    }

    /// Issues a fresh code for a still-unverified booking and re-sends the
    /// verification email. The status is untouched.
    pub async fn resend_code(
        &self,
        request: ResendCodeRequest,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self
            .appointments
            .find_by_id(request.appointment_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .filter(|a| a.status == AppointmentStatus::Requested)
            .ok_or(AppointmentError::NotFound)?;

        appointment.verification_code = verification::generate();
        appointment.updated_at = Utc::now();

        self.appointments
            .update(&appointment)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        let doctor_name = self
            .staff
            .find_by_id(appointment.doctor_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .map(|d| d.name)
            .unwrap_or_default();

        let email_body = templates::otp_verification_email(
            &appointment.patient_name,
            &doctor_name,
            &appointment.verification_code,
        );

        self.mailer
            .send_mail(
                &[appointment.patient_email.clone()],
                "Appointment Verification",
                &email_body,
            )
            .await
            .map_err(|e| AppointmentError::Notification(e.to_string()))?;

        info!("Verification code reissued for appointment {}", appointment.id);
        Ok(appointment)
    }

    /// Staff-driven transition. The actor must be scoped to the chamber;
    /// staff verification converges with the patient path by re-checking
    /// capacity, but sends no further patient email.
    pub async fn update_status(
        &self,
        actor: &User,
        appointment_id: Uuid,
        intent: TransitionIntent,
    ) -> Result<Appointment, AppointmentError> {
        let mut appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?
            .ok_or(AppointmentError::NotFound)?;

        self.assert_chamber_scope(actor, &appointment).await?;

        let next = lifecycle::next_status(appointment.status, intent, actor.role)?;

        if appointment.status == AppointmentStatus::Requested && next == AppointmentStatus::Verified
        {
            self.capacity
                .assert_under_capacity(
                    appointment.doctor_id,
                    appointment.chamber_id,
                    appointment.date,
                )
                .await?;
        }

        info!(
            "Appointment {} transitioning {} -> {} by {} {}",
            appointment.id, appointment.status, next, actor.role, actor.id
        );

        appointment.status = next;
        appointment.updated_at = Utc::now();

        self.appointments
            .update(&appointment)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        Ok(appointment)
    }

    /// Staff listing with filters; assistants only ever see their assigned
    /// chamber, whatever the query asks for.
    pub async fn list_appointments(
        &self,
        actor: &User,
        query: AppointmentListQuery,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let mut filter = AppointmentFilter {
            date_from: query.start_date.map(schedule::clinic_day_start),
            date_to: query.end_date.map(schedule::clinic_day_start),
            chamber_id: query.chamber_id,
            patient_email_contains: query.patient_email,
            patient_name_contains: query.patient_name,
            status: query.status,
        };

        if actor.role == StaffRole::Assistant {
            let assistant = self
                .staff
                .find_by_id(actor.id)
                .await
                .map_err(|e| AppointmentError::Database(e.to_string()))?;
            if let Some(assigned) = assistant.and_then(|s| s.assigned_chamber) {
                filter.chamber_id = Some(assigned);
            }
        }

        self.appointments
            .search(&filter)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))
    }

    async fn assert_chamber_scope(
        &self,
        actor: &User,
        appointment: &Appointment,
    ) -> Result<(), AppointmentError> {
        match actor.role {
            StaffRole::Doctor => {
                if appointment.doctor_id == actor.id {
                    Ok(())
                } else {
                    Err(AppointmentError::PermissionDenied(
                        "Appointments of another doctor cannot be managed".to_string(),
                    ))
                }
            }
            StaffRole::Assistant => {
                let assistant = self
                    .staff
                    .find_by_id(actor.id)
                    .await
                    .map_err(|e| AppointmentError::Database(e.to_string()))?
                    .ok_or_else(|| {
                        AppointmentError::PermissionDenied("Staff record not found".to_string())
                    })?;

                if assistant.assigned_chamber == Some(appointment.chamber_id) {
                    Ok(())
                } else {
                    Err(AppointmentError::PermissionDenied(
                        "Appointment belongs to another chamber".to_string(),
                    ))
                }
            }
            StaffRole::Admin => Err(AppointmentError::PermissionDenied(
                "Administrators do not manage the appointment workflow".to_string(),
            )),
        }
    }
}
