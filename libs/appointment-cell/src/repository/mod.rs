// Per-entity persistence contracts. Implementations are injected once at
// process start; handlers and services never touch a connection directly.
pub mod memory;
pub mod rest;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, Chamber, StaffMember};

/// Filters for the staff-facing appointment listing.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub chamber_id: Option<Uuid>,
    pub patient_email_contains: Option<String>,
    pub patient_name_contains: Option<String>,
    pub status: Option<AppointmentStatus>,
}

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn insert(&self, appointment: &Appointment) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>>;

    /// The awaiting-code pool: a `requested` appointment matching id + code.
    async fn find_requested_with_code(&self, id: Uuid, code: &str) -> Result<Option<Appointment>>;

    /// Any-status probe for the duplicate-booking rule.
    async fn find_duplicate(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        patient_email: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<Appointment>>;

    /// Confirmed-track appointments for the day, ordered by time ascending.
    async fn confirmed_for_day(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Appointment>>;

    async fn update(&self, appointment: &Appointment) -> Result<()>;

    async fn search(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>>;
}

#[async_trait]
pub trait ChamberStore: Send + Sync {
    async fn find_active(&self, id: Uuid) -> Result<Option<Chamber>>;
}

#[async_trait]
pub trait StaffStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffMember>>;

    async fn find_active_doctor(&self, id: Uuid) -> Result<Option<StaffMember>>;
}
