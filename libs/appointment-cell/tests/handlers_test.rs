// Handler-level tests: invoke the axum handlers directly with in-memory
// stores behind the shared state, asserting response bodies and AppError
// variants.
use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use async_trait::async_trait;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use appointment_cell::handlers;
use appointment_cell::models::{
    AppointmentListQuery, CreateAppointmentRequest, ResendCodeRequest, UpdateStatusRequest,
    VerifyCodeRequest, VisitingHour, VisitingHours, WeekdayName,
};
use appointment_cell::repository::memory::{InMemoryAppointments, InMemoryChambers, InMemoryStaff};
use appointment_cell::{AppState, Chamber, StaffMember};
use notification_cell::{Mailer, NotificationError};
use shared_models::auth::{StaffRole, User};
use shared_models::error::AppError;
use shared_utils::test_utils::TestConfig;

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_mail(
        &self,
        _recipients: &[String],
        subject: &str,
        _html_body: &str,
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(subject.to_string());
        Ok(())
    }
}

struct TestHarness {
    state: Arc<AppState>,
    staff: Arc<InMemoryStaff>,
    doctor: StaffMember,
    chamber: Chamber,
}

fn open_week() -> VisitingHours {
    let open = VisitingHour {
        start: "17:00".to_string(),
        end: "21:00".to_string(),
        no_of_slots: 0,
    };
    VisitingHours {
        saturday: VisitingHour::default(),
        sunday: open.clone(),
        monday: open.clone(),
        tuesday: open.clone(),
        wednesday: open.clone(),
        thursday: open.clone(),
        friday: open,
    }
}

fn harness() -> TestHarness {
    let appointments = Arc::new(InMemoryAppointments::new());
    let chambers = Arc::new(InMemoryChambers::new());
    let staff = Arc::new(InMemoryStaff::new());

    let doctor = StaffMember {
        id: Uuid::new_v4(),
        name: "Dr. Ayesha Khan".to_string(),
        email: "ayesha@docconnect.example".to_string(),
        role: StaffRole::Doctor,
        assigned_chamber: None,
        active: true,
    };
    staff.seed(doctor.clone());

    let chamber = Chamber {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        name: "Oasis Hospital".to_string(),
        address: "Subhanighat, Sylhet".to_string(),
        contact: "+8801701266679".to_string(),
        visiting_hours: open_week(),
        active: true,
    };
    chambers.seed(chamber.clone());

    let state = Arc::new(AppState::with_parts(
        TestConfig::default().to_arc(),
        appointments,
        chambers,
        staff.clone(),
        Arc::new(RecordingMailer::default()),
    ));

    TestHarness {
        state,
        staff,
        doctor,
        chamber,
    }
}

fn booking_body(harness: &TestHarness) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_name: "Rahim Uddin".to_string(),
        patient_email: "rahim@example.com".to_string(),
        doctor_id: harness.doctor.id,
        chamber_id: harness.chamber.id,
        date: NaiveDate::from_ymd_opt(2024, 6, 20).unwrap(),
        weekday: WeekdayName::Thursday,
    }
}

fn doctor_extension(harness: &TestHarness) -> Extension<User> {
    Extension(User {
        id: harness.doctor.id,
        email: Some(harness.doctor.email.clone()),
        role: StaffRole::Doctor,
    })
}

#[tokio::test]
async fn create_returns_created_with_booking_payload() {
    let harness = harness();

    let (status, Json(body)) = handlers::create_appointment(
        State(Arc::clone(&harness.state)),
        Json(booking_body(&harness)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Appointment created successfully");

    let appointment = &body["data"]["appointment"];
    assert_eq!(appointment["status"], "requested");
    assert_eq!(appointment["serialNo"], 1);
    assert_eq!(appointment["weekday"], "thursday");
    assert_eq!(appointment["time"], "17:00");
    assert_eq!(
        appointment["verificationCode"].as_str().unwrap().len(),
        8
    );
}

#[tokio::test]
async fn create_rejects_malformed_fields() {
    let harness = harness();

    let mut body = booking_body(&harness);
    body.patient_email = "not-an-email".to_string();

    let result =
        handlers::create_appointment(State(Arc::clone(&harness.state)), Json(body)).await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn verify_code_round_trip() {
    let harness = harness();

    let (_, Json(created)) = handlers::create_appointment(
        State(Arc::clone(&harness.state)),
        Json(booking_body(&harness)),
    )
    .await
    .unwrap();

    let appointment = &created["data"]["appointment"];
    let appointment_id: Uuid =
        serde_json::from_value(appointment["id"].clone()).unwrap();
    let code = appointment["verificationCode"].as_str().unwrap().to_string();

    let Json(verified) = handlers::verify_code(
        State(Arc::clone(&harness.state)),
        Json(VerifyCodeRequest {
            code,
            current_time: Utc::now(),
            appointment_id,
        }),
    )
    .await
    .unwrap();

    assert_eq!(verified["success"], true);
    assert_eq!(verified["data"]["appointment"]["status"], "verified");
}

#[tokio::test]
async fn verify_code_rejects_short_code() {
    let harness = harness();

    let result = handlers::verify_code(
        State(Arc::clone(&harness.state)),
        Json(VerifyCodeRequest {
            code: "ABC".to_string(),
            current_time: Utc::now(),
            appointment_id: Uuid::new_v4(),
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn verify_code_unknown_appointment_is_not_found() {
    let harness = harness();

    let result = handlers::verify_code(
        State(Arc::clone(&harness.state)),
        Json(VerifyCodeRequest {
            code: "AAAA1111".to_string(),
            current_time: Utc::now(),
            appointment_id: Uuid::new_v4(),
        }),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_create_is_a_conflict() {
    let harness = harness();

    handlers::create_appointment(State(Arc::clone(&harness.state)), Json(booking_body(&harness)))
        .await
        .unwrap();

    let result = handlers::create_appointment(
        State(Arc::clone(&harness.state)),
        Json(booking_body(&harness)),
    )
    .await;

    assert_matches!(result, Err(AppError::Conflict(_)));
}

#[tokio::test]
async fn resend_code_responds_with_fresh_code() {
    let harness = harness();

    let (_, Json(created)) = handlers::create_appointment(
        State(Arc::clone(&harness.state)),
        Json(booking_body(&harness)),
    )
    .await
    .unwrap();
    let appointment_id: Uuid =
        serde_json::from_value(created["data"]["appointment"]["id"].clone()).unwrap();

    let Json(body) = handlers::resend_code(
        State(Arc::clone(&harness.state)),
        Json(ResendCodeRequest { appointment_id }),
    )
    .await
    .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Code resent successfully");
    assert_eq!(body["data"]["appointment"]["status"], "requested");
}

#[tokio::test]
async fn update_status_walks_and_gates_completion() {
    let harness = harness();

    let (_, Json(created)) = handlers::create_appointment(
        State(Arc::clone(&harness.state)),
        Json(booking_body(&harness)),
    )
    .await
    .unwrap();
    let appointment_id: Uuid =
        serde_json::from_value(created["data"]["appointment"]["id"].clone()).unwrap();

    // Doctor advances requested → verified → queued → ongoing
    for expected in ["verified", "queued", "ongoing"] {
        let Json(body) = handlers::update_status(
            State(Arc::clone(&harness.state)),
            Path(appointment_id),
            doctor_extension(&harness),
            Json(UpdateStatusRequest { cancel: 0 }),
        )
        .await
        .unwrap();
        assert_eq!(body["data"]["appointment"]["status"], expected);
    }

    // An assistant of the chamber cannot complete the visit
    let assistant_record = StaffMember {
        id: Uuid::new_v4(),
        name: "Nusrat Jahan".to_string(),
        email: "nusrat@docconnect.example".to_string(),
        role: StaffRole::Assistant,
        assigned_chamber: Some(harness.chamber.id),
        active: true,
    };
    harness.staff.seed(assistant_record.clone());
    let result = handlers::update_status(
        State(Arc::clone(&harness.state)),
        Path(appointment_id),
        Extension(User {
            id: assistant_record.id,
            email: Some(assistant_record.email.clone()),
            role: StaffRole::Assistant,
        }),
        Json(UpdateStatusRequest { cancel: 0 }),
    )
    .await;
    assert_matches!(result, Err(AppError::Forbidden(_)));

    // The owning doctor completes it
    let Json(body) = handlers::update_status(
        State(Arc::clone(&harness.state)),
        Path(appointment_id),
        doctor_extension(&harness),
        Json(UpdateStatusRequest { cancel: 0 }),
    )
    .await
    .unwrap();
    assert_eq!(body["data"]["appointment"]["status"], "completed");

    // Terminal state rejects further updates with a validation error
    let result = handlers::update_status(
        State(Arc::clone(&harness.state)),
        Path(appointment_id),
        doctor_extension(&harness),
        Json(UpdateStatusRequest { cancel: 1 }),
    )
    .await;
    assert_matches!(result, Err(AppError::ValidationError(_)));
}

#[tokio::test]
async fn cancel_from_requested() {
    let harness = harness();

    let (_, Json(created)) = handlers::create_appointment(
        State(Arc::clone(&harness.state)),
        Json(booking_body(&harness)),
    )
    .await
    .unwrap();
    let appointment_id: Uuid =
        serde_json::from_value(created["data"]["appointment"]["id"].clone()).unwrap();

    let Json(body) = handlers::update_status(
        State(Arc::clone(&harness.state)),
        Path(appointment_id),
        doctor_extension(&harness),
        Json(UpdateStatusRequest { cancel: 1 }),
    )
    .await
    .unwrap();

    assert_eq!(body["data"]["appointment"]["status"], "cancelled");
}

#[tokio::test]
async fn unknown_appointment_is_not_found() {
    let harness = harness();

    let result = handlers::update_status(
        State(Arc::clone(&harness.state)),
        Path(Uuid::new_v4()),
        doctor_extension(&harness),
        Json(UpdateStatusRequest { cancel: 0 }),
    )
    .await;

    assert_matches!(result, Err(AppError::NotFound(_)));
}

#[tokio::test]
async fn listing_returns_appointments_for_staff() {
    let harness = harness();

    handlers::create_appointment(State(Arc::clone(&harness.state)), Json(booking_body(&harness)))
        .await
        .unwrap();

    let Json(body) = handlers::list_appointments(
        State(Arc::clone(&harness.state)),
        Query(AppointmentListQuery::default()),
        doctor_extension(&harness),
    )
    .await
    .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["appointments"].as_array().unwrap().len(), 1);
}
