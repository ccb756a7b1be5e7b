// Document-store adapters for the repository traits. Collections are
// queried PostgREST-style through the shared DocStoreClient.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Method;
use tracing::debug;
use uuid::Uuid;

use shared_database::docstore::DocStoreClient;

use crate::models::{Appointment, Chamber, StaffMember};
use crate::repository::{AppointmentFilter, AppointmentStore, ChamberStore, StaffStore};

const CONFIRMED_TRACK: &str = "in.(verified,queued,ongoing,completed)";

fn representation_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("Prefer", HeaderValue::from_static("return=representation"));
    headers
}

fn encode_instant(instant: DateTime<Utc>) -> String {
    urlencoding::encode(&instant.to_rfc3339()).into_owned()
}

pub struct DocStoreAppointments {
    client: Arc<DocStoreClient>,
}

impl DocStoreAppointments {
    pub fn new(client: Arc<DocStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AppointmentStore for DocStoreAppointments {
    async fn insert(&self, appointment: &Appointment) -> Result<()> {
        let body = serde_json::to_value(appointment)?;

        let _: Vec<Appointment> = self
            .client
            .request_with_headers(
                Method::POST,
                "/rest/v1/appointments",
                Some(body),
                Some(representation_headers()),
            )
            .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>> {
        let path = format!("/rest/v1/appointments?id=eq.{}", id);
        let mut result: Vec<Appointment> = self.client.request(Method::GET, &path, None).await?;
        Ok(result.into_iter().next())
    }

    async fn find_requested_with_code(&self, id: Uuid, code: &str) -> Result<Option<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?id=eq.{}&verificationCode=eq.{}&status=eq.requested",
            id,
            urlencoding::encode(code)
        );
        let mut result: Vec<Appointment> = self.client.request(Method::GET, &path, None).await?;
        Ok(result.into_iter().next())
    }

    async fn find_duplicate(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        patient_email: &str,
        date: DateTime<Utc>,
    ) -> Result<Option<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctorId=eq.{}&chamberId=eq.{}&patientEmail=eq.{}&date=eq.{}",
            doctor_id,
            chamber_id,
            urlencoding::encode(patient_email),
            encode_instant(date)
        );
        let mut result: Vec<Appointment> = self.client.request(Method::GET, &path, None).await?;
        Ok(result.into_iter().next())
    }

    async fn confirmed_for_day(
        &self,
        doctor_id: Uuid,
        chamber_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Vec<Appointment>> {
        let path = format!(
            "/rest/v1/appointments?doctorId=eq.{}&chamberId=eq.{}&date=eq.{}&status={}&order=time.asc",
            doctor_id,
            chamber_id,
            encode_instant(date),
            CONFIRMED_TRACK
        );
        let result: Vec<Appointment> = self.client.request(Method::GET, &path, None).await?;
        Ok(result)
    }

    async fn update(&self, appointment: &Appointment) -> Result<()> {
        let path = format!("/rest/v1/appointments?id=eq.{}", appointment.id);
        let body = serde_json::to_value(appointment)?;

        let _: Vec<Appointment> = self
            .client
            .request_with_headers(Method::PATCH, &path, Some(body), Some(representation_headers()))
            .await?;

        Ok(())
    }

    async fn search(&self, filter: &AppointmentFilter) -> Result<Vec<Appointment>> {
        let mut query_parts = Vec::new();

        if let Some(date_from) = filter.date_from {
            query_parts.push(format!("date=gte.{}", encode_instant(date_from)));
        }
        if let Some(date_to) = filter.date_to {
            query_parts.push(format!("date=lte.{}", encode_instant(date_to)));
        }
        if let Some(chamber_id) = filter.chamber_id {
            query_parts.push(format!("chamberId=eq.{}", chamber_id));
        }
        if let Some(email) = &filter.patient_email_contains {
            query_parts.push(format!("patientEmail=ilike.*{}*", urlencoding::encode(email)));
        }
        if let Some(name) = &filter.patient_name_contains {
            query_parts.push(format!("patientName=ilike.*{}*", urlencoding::encode(name)));
        }
        if let Some(status) = filter.status {
            query_parts.push(format!("status=eq.{}", status));
        }

        let path = if query_parts.is_empty() {
            "/rest/v1/appointments".to_string()
        } else {
            format!("/rest/v1/appointments?{}", query_parts.join("&"))
        };

        debug!("Searching appointments: {}", path);

        let result: Vec<Appointment> = self.client.request(Method::GET, &path, None).await?;
        Ok(result)
    }
}

pub struct DocStoreChambers {
    client: Arc<DocStoreClient>,
}

impl DocStoreChambers {
    pub fn new(client: Arc<DocStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChamberStore for DocStoreChambers {
    async fn find_active(&self, id: Uuid) -> Result<Option<Chamber>> {
        let path = format!("/rest/v1/chambers?id=eq.{}&active=eq.true", id);
        let mut result: Vec<Chamber> = self.client.request(Method::GET, &path, None).await?;
        Ok(result.into_iter().next())
    }
}

pub struct DocStoreStaff {
    client: Arc<DocStoreClient>,
}

impl DocStoreStaff {
    pub fn new(client: Arc<DocStoreClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StaffStore for DocStoreStaff {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<StaffMember>> {
        let path = format!("/rest/v1/staff?id=eq.{}", id);
        let mut result: Vec<StaffMember> = self.client.request(Method::GET, &path, None).await?;
        Ok(result.into_iter().next())
    }

    async fn find_active_doctor(&self, id: Uuid) -> Result<Option<StaffMember>> {
        let path = format!("/rest/v1/staff?id=eq.{}&role=eq.doctor&active=eq.true", id);
        let mut result: Vec<StaffMember> = self.client.request(Method::GET, &path, None).await?;
        Ok(result.into_iter().next())
    }
}
