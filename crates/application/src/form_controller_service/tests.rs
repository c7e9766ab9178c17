use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use http::{Method, StatusCode};
use serde_json::{Value, json};

use fypms_core::{AppError, AppResult, Role};
use fypms_domain::{FormId, REQUIRED_MESSAGE, Route, ToastKind};

use super::{
    FIX_ERRORS_MESSAGE, FormController, PortalSubmitAction, SubmitAction, SubmitAttempt,
    SubmitOutcome,
};
use crate::test_support::{FixedClock, Harness};
use crate::{AuthState, PortalApi};

type Call = (FormId, Option<String>, Value);

struct FakeAction {
    calls: Mutex<Vec<Call>>,
    result: Mutex<Option<AppResult<Value>>>,
}

impl FakeAction {
    fn returning(result: AppResult<Value>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            result: Mutex::new(Some(result)),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl SubmitAction for FakeAction {
    async fn submit(
        &self,
        form: FormId,
        editing_id: Option<&str>,
        payload: Value,
    ) -> AppResult<Value> {
        self.calls
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock calls: {error}")))?
            .push((form, editing_id.map(str::to_owned), payload));
        self.result
            .lock()
            .map_err(|error| AppError::Internal(format!("failed to lock result: {error}")))?
            .take()
            .unwrap_or_else(|| Ok(Value::Null))
    }
}

fn student_registration(clock: Arc<FixedClock>) -> FormController {
    let mut form = FormController::for_form(FormId::Registration(Role::Student), clock);
    for (name, value) in [
        ("fullName", "Ali Khan"),
        ("department", "CS"),
        ("rollNo", "21011519-085"),
        ("cgpa", "3.2"),
        ("email", "21011519-085@uog.edu.pk"),
        ("password", "secret1"),
        ("confirmPassword", "secret1"),
        ("session", "2021-2025"),
    ] {
        form.change(name, value);
    }
    form
}

#[test]
fn untouched_empty_fields_show_no_errors_until_blur() {
    let mut form = FormController::for_form(FormId::Domain, Arc::new(FixedClock::new()));
    assert!(form.errors().is_empty());

    form.blur("name");

    assert_eq!(form.field_error("name").as_deref(), Some(REQUIRED_MESSAGE));
    assert_eq!(form.field_error("description"), None);
}

#[tokio::test]
async fn invalid_submit_sets_banner_and_focus_once_without_request() {
    let clock = Arc::new(FixedClock::new());
    let mut form = student_registration(clock);
    form.change("email", "210115-085@uog.edu.pk");
    let action = FakeAction::returning(Ok(Value::Null));

    let outcome = form.submit(&action).await;

    assert_eq!(outcome, SubmitOutcome::Invalid);
    assert_eq!(form.banner(), Some(FIX_ERRORS_MESSAGE));
    assert_eq!(form.take_focus_target().as_deref(), Some("email"));
    assert_eq!(form.take_focus_target(), None);
    assert!(action.calls().is_empty());
    assert!(!form.is_in_flight());
}

#[test]
fn focus_goes_to_first_invalid_field_in_definition_order() {
    let mut form = FormController::for_form(
        FormId::Registration(Role::Admin),
        Arc::new(FixedClock::new()),
    );
    form.change("password", "abc");

    let attempt = form.begin_submit();

    assert_eq!(
        attempt,
        SubmitAttempt::Invalid {
            focus: "fullName".to_owned()
        }
    );
}

#[test]
fn valid_submit_drops_focus_left_by_failed_attempt() {
    let mut form = FormController::for_form(FormId::Domain, Arc::new(FixedClock::new()));
    let _ = form.begin_submit();
    form.change("name", "Robotics");

    assert!(matches!(form.begin_submit(), SubmitAttempt::Ready(_)));
    assert_eq!(form.take_focus_target(), None);
}

#[test]
fn change_clears_banner_but_not_field_errors() {
    let mut form = FormController::for_form(FormId::Domain, Arc::new(FixedClock::new()));
    let _ = form.begin_submit();
    assert!(form.banner().is_some());

    form.change("description", "Machine learning");

    assert_eq!(form.banner(), None);
    assert_eq!(form.field_error("name").as_deref(), Some(REQUIRED_MESSAGE));
}

#[tokio::test]
async fn valid_registration_sends_once_resets_and_toasts() {
    let clock = Arc::new(FixedClock::new());
    let mut form = student_registration(clock.clone());
    let action = FakeAction::returning(Ok(json!({"message": "Student registered"})));

    let outcome = form.submit(&action).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    let calls = action.calls();
    assert_eq!(calls.len(), 1);
    let payload = &calls[0].2;
    assert_eq!(payload["rollNo"], json!("21011519-085"));
    assert!(payload.get("confirmPassword").is_none());

    assert_eq!(form.values().get("fullName"), "");
    assert!(form.errors().is_empty());
    let toast = form.toast().unwrap_or_else(|| panic!("test"));
    assert_eq!(toast.message(), "Student registered");
    assert_eq!(toast.kind(), ToastKind::Success);

    clock.advance(Duration::seconds(5));
    assert!(form.tick());
    assert!(form.toast().is_none());
}

#[test]
fn second_submit_is_rejected_while_in_flight() {
    let mut form = student_registration(Arc::new(FixedClock::new()));

    assert!(matches!(form.begin_submit(), SubmitAttempt::Ready(_)));
    assert!(form.is_in_flight());
    assert_eq!(form.begin_submit(), SubmitAttempt::Rejected);

    let _ = form.finish_submit(Ok(Value::Null));
    assert!(!form.is_in_flight());
}

#[test]
fn failure_toast_uses_server_message_then_fallback() {
    let mut form = FormController::for_form(FormId::SessionPolicy, Arc::new(FixedClock::new()));

    let outcome = form.finish_submit(Err(AppError::Conflict(
        "Session already exists".to_owned(),
    )));
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(
        form.toast().map(|toast| toast.message().to_owned()).as_deref(),
        Some("Session already exists")
    );

    let _ = form.finish_submit(Err(AppError::Internal(String::new())));
    let toast = form.toast().unwrap_or_else(|| panic!("test"));
    assert_eq!(toast.message(), "Failed to save session.");
    assert_eq!(toast.kind(), ToastKind::Error);
    assert!(!form.is_in_flight());
}

#[test]
fn expired_session_does_not_toast() {
    let mut form = FormController::for_form(FormId::Domain, Arc::new(FixedClock::new()));

    let outcome = form.finish_submit(Err(AppError::SessionExpired(String::new())));

    assert_eq!(outcome, SubmitOutcome::SessionExpired);
    assert!(form.toast().is_none());
}

#[tokio::test]
async fn session_policy_keeps_values_after_success() {
    let mut form = FormController::for_form(FormId::SessionPolicy, Arc::new(FixedClock::new()));
    for (name, value) in [
        ("sessionYear", "2022-2026"),
        ("department", "CS"),
        ("minCGPA", "2.5"),
        ("minMembers", "2"),
        ("maxMembers", "3"),
        ("minGroups", "1"),
        ("maxGroups", "5"),
        ("numEvaluations", "2"),
        ("defense1Weightage", "40"),
        ("defense2Weightage", "60"),
    ] {
        form.change(name, value);
    }
    let action = FakeAction::returning(Ok(Value::Null));

    let outcome = form.submit(&action).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    assert_eq!(action.calls()[0].2["maxGroups"], json!(5));
    assert_eq!(form.values().get("sessionYear"), "2022-2026");
    assert_eq!(
        form.toast().map(|toast| toast.message().to_owned()).as_deref(),
        Some("Session saved successfully.")
    );
}

#[tokio::test]
async fn editing_domain_submits_update_target() {
    let mut form = FormController::for_form(FormId::Domain, Arc::new(FixedClock::new()));
    form.edit("d9", &[("name", " Robotics "), ("description", "")]);
    let action = FakeAction::returning(Ok(Value::Null));

    let _ = form.submit(&action).await;

    let calls = action.calls();
    assert_eq!(calls[0].1.as_deref(), Some("d9"));
    assert_eq!(calls[0].2["name"], json!("Robotics"));
    assert_eq!(form.editing_id(), None);
}

#[tokio::test]
async fn login_establishes_session_and_keeps_values() {
    let harness = Harness::new();
    harness.transport.respond(
        Method::POST,
        "/api/admins/login",
        StatusCode::OK,
        json!({"admin": {"_id": "a1"}, "token": "tok-7", "message": "Login successful"}),
    );
    let action = PortalSubmitAction::new(
        PortalApi::new(harness.client.clone()),
        harness.navigator.clone(),
    );
    let mut form = FormController::for_form(FormId::Login(Role::Admin), harness.clock.clone());
    form.change("email", " Admin@UOG.edu.pk ");
    form.change("password", "secret1");

    let outcome = form.submit(&action).await;

    assert_eq!(outcome, SubmitOutcome::Succeeded);
    let request = &harness.transport.requests()[0];
    assert_eq!(
        request.body,
        Some(json!({"email": "admin@uog.edu.pk", "password": "secret1"}))
    );
    assert!(matches!(
        harness.session.state(),
        Ok(AuthState::Authenticated(identity)) if identity.id() == "a1"
    ));
    assert_eq!(harness.navigator.redirects(), vec![Route::Home]);
    assert_eq!(form.values().get("password"), "secret1");
}
