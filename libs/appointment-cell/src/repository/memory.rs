// In-memory repository implementations. They back the test suite and local
// development without a document store; locks are never held across awaits.
use std::sync::RwLock;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Appointment, Chamber, StaffMember};
use crate::repository::{AppointmentFilter, AppointmentStore, ChamberStore, StaffStore};

#[derive(Default)]
pub struct InMemoryAppointments {
    records: RwLock<Vec<Appointment>>,
}

impl InMemoryAppointments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, appointment: Appointment) {
        self.records.write().unwrap().push(appointment);
    }

    pub fn all(&self) -> Vec<Appointment> {
        self.records.read().unwrap().clone()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointments {
    async fn insert(&self, appointment: &Appointment) -> Result<()> {
        self.records.write().unwrap().push(appointment.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().find(|a| a.id == id).cloned())
    }

    async fn find_requested_with_code(&self, id: Uuid, code: &str) -> Result<Option<Appointment>> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .find(|a| {
                a.id == id
                    && a.verification_code == code
                    && a.status == crate::models::AppointmentStatus::Requested
            })
            .cloned())
    }

    async fn find_duplicate(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        patient_email: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<Appointment>> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .find(|a| {
                a.doctor_id == doctor_id
                    && a.chamber_id == chamber_id
                    && a.patient_email == patient_email
                    && a.date == date
            })
            .cloned())
    }

    async fn confirmed_for_day(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let records = self.records.read().unwrap();
        let mut matching: Vec<Appointment> = records
            .iter()
            .filter(|a| {
                a.doctor_id == doctor_id
                    && a.chamber_id == chamber_id
                    && a.date == date
                    && a.status.counts_toward_capacity()
            })
            .cloned()
            .collect();
        matching.sort_by_key(|a| a.time);
        Ok(matching)
    }

    async fn update(&self, appointment: &Appointment) -> Result<()> {
        let mut records = self.records.write().unwrap();
        let slot = records
            .iter_mut()
            .find(|a| a.id == appointment.id)
            .ok_or_else(|| anyhow!("No appointment with id {}", appointment.id))?;
        *slot = appointment.clone();
        Ok(())
    }

    async fn search(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let records = self.records.read().unwrap();
        let result = records
            .iter()
            .filter(|a| {
                if let Some(from) = filter.date_from {
                    if a.date < from {
                        return false;
                    }
                }
                if let Some(to) = filter.date_to {
                    if a.date > to {
                        return false;
                    }
                }
                if let Some(chamber_id) = filter.chamber_id {
                    if a.chamber_id != chamber_id {
                        return false;
                    }
                }
                if let Some(email) = &filter.patient_email_contains {
                    if !a.patient_email.to_lowercase().contains(&email.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(name) = &filter.patient_name_contains {
                    if !a.patient_name.to_lowercase().contains(&name.to_lowercase()) {
                        return false;
                    }
                }
                if let Some(status) = filter.status {
                    if a.status != status {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();
        Ok(result)
    }
}

#[derive(Default)]
pub struct InMemoryChambers {
    records: RwLock<Vec<Chamber>>,
}

impl InMemoryChambers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, chamber: Chamber) {
        self.records.write().unwrap().push(chamber);
    }
}

#[async_trait]
impl ChamberStore for InMemoryChambers {
    async fn find_active(&self, id: Uuid) -> Result<Option<Chamber>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().find(|c| c.id == id && c.active).cloned())
    }
}

#[derive(Default)]
pub struct InMemoryStaff {
    records: RwLock<Vec<StaffMember>>,
}

impl InMemoryStaff {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, staff: StaffMember) {
        self.records.write().unwrap().push(staff);
    }
}

#[async_trait]
impl StaffStore for InMemoryStaff {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffMember>> {
        let records = self.records.read().unwrap();
        Ok(records.iter().find(|s| s.id == id).cloned())
    }

    async fn find_active_doctor(&self, id: Uuid) -> Result<Option<StaffMember>> {
        let records = self.records.read().unwrap();
        Ok(records
            .iter()
            .find(|s| s.id == id && s.active && s.role == shared_models::auth::StaffRole::Doctor)
            .cloned())
    }
}
