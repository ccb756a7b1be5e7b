// libs/appointment-cell/src/services/capacity.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentError};
use crate::repository::AppointmentStore;

/// Daily ceiling of confirmed-track appointments per doctor+chamber+date.
pub const MAX_DAILY_APPOINTMENTS: usize = 15;

/// Advisory read-then-check guard over the appointment store. There is no
/// exclusive lock; the second check at verification time is the backstop
/// for two near-simultaneous bookings both passing the pre-check.
pub struct CapacityGuard {
    appointments: Arc<dyn AppointmentStore>,
}

impl CapacityGuard {
    pub fn new(appointments: Arc<dyn AppointmentStore>) -> Self {
        Self { appointments }
    }

    /// Confirmed-track appointments for the day, ordered by time ascending.
    pub async fn confirmed_for_day(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        self.appointments
            .confirmed_for_day(doctor_id, chamber_id, date)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))
    }

    pub async fn assert_under_capacity(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let booked = self.confirmed_for_day(doctor_id, chamber_id, date).await?;

        if booked.len() >= MAX_DAILY_APPOINTMENTS {
            warn!(
                "Capacity ceiling reached for doctor {} chamber {} on {}",
                doctor_id, chamber_id, date
            );
            return Err(AppointmentError::CapacityExceeded);
        }

        debug!(
            "{} of {} slots taken for doctor {} chamber {}",
            booked.len(),
            MAX_DAILY_APPOINTMENTS,
            doctor_id,
            chamber_id
        );
        Ok(booked)
    }

    /// Rejects a second booking for the same doctor+chamber+email+date,
    /// whatever status the first one is in.
    pub async fn assert_no_duplicate(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        patient_email: &str,
        date: DateTime<Utc>,
    ) -> Result<(), AppointmentError> {
        let existing = self
            .appointments
            .find_duplicate(doctor_id, chamber_id, patient_email, date)
            .await
            .map_err(|e| AppointmentError::Database(e.to_string()))?;

        if existing.is_some() {
            return Err(AppointmentError::DuplicateBooking);
        }

        Ok(())
    }
}
