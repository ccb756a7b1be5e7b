// libs/appointment-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use shared_models::auth::StaffRole;
use shared_models::error::AppError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub chamber_id: Uuid,
    pub patient_name: String,
    pub patient_email: String,
    /// Midnight of the booked day in the clinic timezone, stored as UTC.
    pub date: DateTime<Utc>,
    pub weekday: WeekdayName,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub verification_code: String,
    pub serial_no: i32,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Requested,
    Verified,
    Queued,
    Cancelled,
    Ongoing,
    Completed,
}

impl AppointmentStatus {
    /// Statuses that occupy one of the day's bookable slots. `requested`
    /// bookings hold no slot until the patient (or staff) confirms them.
    pub fn counts_toward_capacity(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Verified
                | AppointmentStatus::Queued
                | AppointmentStatus::Ongoing
                | AppointmentStatus::Completed
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Requested => write!(f, "requested"),
            AppointmentStatus::Verified => write!(f, "verified"),
            AppointmentStatus::Queued => write!(f, "queued"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Ongoing => write!(f, "ongoing"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// What a staff member (or the patient verification path) is trying to do
/// with an appointment; the lifecycle table maps this to the next status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionIntent {
    Advance,
    Cancel,
}

/// Weekday labels as the booking API speaks them, Saturday-first to match
/// the Bangladeshi working week.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayName {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl WeekdayName {
    pub fn from_chrono(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat => WeekdayName::Saturday,
            Weekday::Sun => WeekdayName::Sunday,
            Weekday::Mon => WeekdayName::Monday,
            Weekday::Tue => WeekdayName::Tuesday,
            Weekday::Wed => WeekdayName::Wednesday,
            Weekday::Thu => WeekdayName::Thursday,
            Weekday::Fri => WeekdayName::Friday,
        }
    }
}

impl fmt::Display for WeekdayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekdayName::Saturday => write!(f, "saturday"),
            WeekdayName::Sunday => write!(f, "sunday"),
            WeekdayName::Monday => write!(f, "monday"),
            WeekdayName::Tuesday => write!(f, "tuesday"),
            WeekdayName::Wednesday => write!(f, "wednesday"),
            WeekdayName::Thursday => write!(f, "thursday"),
            WeekdayName::Friday => write!(f, "friday"),
        }
    }
}

// ==============================================================================
// CHAMBER AND STAFF MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chamber {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub name: String,
    pub address: String,
    pub contact: String,
    pub visiting_hours: VisitingHours,
    pub active: bool,
}

/// One weekly schedule entry. Empty start/end strings mean the chamber is
/// closed on that day.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitingHour {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub no_of_slots: i32,
}

impl VisitingHour {
    /// The open window for the day, or None when the day is closed or the
    /// stored times are not valid HH:MM strings.
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if !is_valid_wall_clock(&self.start) || !is_valid_wall_clock(&self.end) {
            return None;
        }
        let start = NaiveTime::parse_from_str(&self.start, "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(&self.end, "%H:%M").ok()?;
        Some((start, end))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitingHours {
    #[serde(default)]
    pub saturday: VisitingHour,
    #[serde(default)]
    pub sunday: VisitingHour,
    #[serde(default)]
    pub monday: VisitingHour,
    #[serde(default)]
    pub tuesday: VisitingHour,
    #[serde(default)]
    pub wednesday: VisitingHour,
    #[serde(default)]
    pub thursday: VisitingHour,
    #[serde(default)]
    pub friday: VisitingHour,
}

impl VisitingHours {
    pub fn day(&self, weekday: WeekdayName) -> &VisitingHour {
        match weekday {
            WeekdayName::Saturday => &self.saturday,
            WeekdayName::Sunday => &self.sunday,
            WeekdayName::Monday => &self.monday,
            WeekdayName::Tuesday => &self.tuesday,
            WeekdayName::Wednesday => &self.wednesday,
            WeekdayName::Thursday => &self.thursday,
            WeekdayName::Friday => &self.friday,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
    /// Set for assistants; scopes which chamber's appointments they manage.
    pub assigned_chamber: Option<Uuid>,
    pub active: bool,
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_id: Uuid,
    pub chamber_id: Uuid,
    pub date: NaiveDate,
    pub weekday: WeekdayName,
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.patient_name.trim().is_empty() {
            return Err("Patient name is required".to_string());
        }
        if !is_valid_email(&self.patient_email) {
            return Err("Invalid email address".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub code: String,
    pub current_time: DateTime<Utc>,
    pub appointment_id: Uuid,
}

impl VerifyCodeRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.code.chars().count() != 8 {
            return Err("Code must be exactly 8 characters".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendCodeRequest {
    pub appointment_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// 1 cancels the appointment, any other value advances it.
    pub cancel: u8,
}

impl UpdateStatusRequest {
    pub fn intent(&self) -> TransitionIntent {
        if self.cancel == 1 {
            TransitionIntent::Cancel
        } else {
            TransitionIntent::Advance
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub chamber_id: Option<Uuid>,
    pub patient_email: Option<String>,
    pub patient_name: Option<String>,
    pub status: Option<AppointmentStatus>,
}

fn is_valid_email(candidate: &str) -> bool {
    match regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$") {
        Ok(pattern) => pattern.is_match(candidate),
        Err(_) => false,
    }
}

/// HH:MM validation for visiting-hour times, shared with chamber ingestion.
pub fn is_valid_wall_clock(candidate: &str) -> bool {
    match regex::Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$") {
        Ok(pattern) => pattern.is_match(candidate),
        Err(_) => false,
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Chamber not found")]
    ChamberNotFound,

    #[error("Weekday does not match the date")]
    WeekdayMismatch,

    #[error("No visiting hours defined for the selected day")]
    NoVisitingHours,

    #[error("An appointment is already created with this email today with the same doctor and chamber")]
    DuplicateBooking,

    #[error("Maximum appointment limit reached for the selected doctor and chamber on this date")]
    CapacityExceeded,

    #[error("Code expired")]
    CodeExpired,

    #[error("Invalid status: no transitions allowed from {0}")]
    InvalidStatus(AppointmentStatus),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<AppointmentError> for AppError {
    fn from(err: AppointmentError) -> Self {
        let message = err.to_string();
        match err {
            AppointmentError::NotFound
            | AppointmentError::DoctorNotFound
            | AppointmentError::ChamberNotFound => AppError::NotFound(message),
            AppointmentError::WeekdayMismatch
            | AppointmentError::NoVisitingHours
            | AppointmentError::CapacityExceeded
            | AppointmentError::CodeExpired => AppError::BadRequest(message),
            AppointmentError::DuplicateBooking => AppError::Conflict(message),
            AppointmentError::InvalidStatus(_) | AppointmentError::Validation(_) => {
                AppError::ValidationError(message)
            }
            AppointmentError::PermissionDenied(_) => AppError::Forbidden(message),
            AppointmentError::Database(_) => AppError::Database(message),
            AppointmentError::Notification(_) => AppError::ExternalService(message),
        }
    }
}

/// Serializes a NaiveTime as the "HH:MM" strings the booking API exchanges.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
