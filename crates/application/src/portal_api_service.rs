//! Typed facade over the backend endpoints.

use serde::Serialize;
use serde_json::Value;

use fypms_core::{AppError, AppResult, AuthIdentity, Role};
use fypms_domain::{FormId, GroupSubmission};

use crate::{ApiClient, ApiRequest};

mod dto;

pub use dto::{
    ActiveSession, DomainRecord, DomainSupervisorRecord, EvaluatorRecord, SessionPolicyRecord,
    StudentProfile, SupervisorRecord,
};

use dto::{
    ActiveSessionEnvelope, DomainSupervisorsEnvelope, DomainsEnvelope, EvaluatorsEnvelope,
    SessionPolicyEnvelope, StudentEnvelope, StudentsEnvelope, SupervisorsEnvelope,
};

/// Builds the request a catalogue form submits. `editing_id` selects the
/// update endpoint for forms that edit an existing record.
#[must_use]
pub fn form_request(form: FormId, editing_id: Option<&str>, payload: Value) -> ApiRequest {
    match (form, editing_id) {
        (FormId::Login(role), _) => ApiRequest::post(format!("/api/{}s/login", role.slug()), payload),
        (FormId::Registration(role), _) => {
            ApiRequest::post(format!("/api/{}s/register", role.slug()), payload)
        }
        (FormId::SessionPolicy, _) => ApiRequest::post("/api/admins/save-session", payload),
        (FormId::SessionStatus, _) => ApiRequest::post("/api/admins/update-session", payload),
        (FormId::Domain, Some(id)) => ApiRequest::put(format!("/api/domains/{id}"), payload),
        (FormId::Domain, None) => ApiRequest::post("/api/domains", payload),
    }
}

/// Endpoint methods used by the portal views.
#[derive(Clone)]
pub struct PortalApi {
    client: ApiClient,
}

impl PortalApi {
    /// Creates the facade.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Submits a catalogue form and returns the raw response body.
    pub async fn submit_form(
        &self,
        form: FormId,
        editing_id: Option<&str>,
        payload: Value,
    ) -> AppResult<Value> {
        self.client
            .send(form_request(form, editing_id, payload))
            .await
    }

    /// Lists project domains.
    pub async fn list_domains(&self) -> AppResult<Vec<DomainRecord>> {
        let envelope: DomainsEnvelope = self.client.send_json(ApiRequest::get("/api/domains")).await?;
        Ok(envelope.domains)
    }

    /// Deletes a domain.
    pub async fn delete_domain(&self, id: &str) -> AppResult<Value> {
        self.client
            .send(ApiRequest::delete(format!("/api/domains/{id}")))
            .await
    }

    /// Lists supervisors.
    pub async fn list_supervisors(&self) -> AppResult<Vec<SupervisorRecord>> {
        let envelope: SupervisorsEnvelope =
            self.client.send_json(ApiRequest::get("/api/supervisors")).await?;
        Ok(envelope.supervisors)
    }

    /// Deletes a supervisor.
    pub async fn delete_supervisor(&self, id: &str) -> AppResult<Value> {
        self.client
            .send(ApiRequest::delete(format!("/api/supervisors/{id}")))
            .await
    }

    /// Lists evaluators.
    pub async fn list_evaluators(&self) -> AppResult<Vec<EvaluatorRecord>> {
        let envelope: EvaluatorsEnvelope =
            self.client.send_json(ApiRequest::get("/api/evaluators")).await?;
        Ok(envelope.evaluators)
    }

    /// Deletes an evaluator.
    pub async fn delete_evaluator(&self, id: &str) -> AppResult<Value> {
        self.client
            .send(ApiRequest::delete(format!("/api/evaluators/{id}")))
            .await
    }

    /// Lists domains with their supervisors for the active session.
    pub async fn list_domain_supervisors(&self) -> AppResult<Vec<DomainSupervisorRecord>> {
        let envelope: DomainSupervisorsEnvelope = self
            .client
            .send_json(ApiRequest::get("/api/domains-supervisors"))
            .await?;
        Ok(envelope.supervisors)
    }

    /// Returns the active academic session, if any.
    pub async fn active_session(&self) -> AppResult<Option<ActiveSession>> {
        let envelope: ActiveSessionEnvelope = self
            .client
            .send_json(ApiRequest::get("/api/sessions/active"))
            .await?;
        Ok(envelope.active_session)
    }

    /// Returns the policy of the session with the given year range.
    pub async fn session_policy(&self, year: &str) -> AppResult<Option<SessionPolicyRecord>> {
        let envelope: SessionPolicyEnvelope = self
            .client
            .send_json(ApiRequest::get("/api/session-policy").with_query("year", year))
            .await?;
        Ok(envelope.session)
    }

    /// Returns the signed-in student's profile.
    pub async fn current_student(&self) -> AppResult<Option<StudentProfile>> {
        let envelope: StudentEnvelope =
            self.client.send_json(ApiRequest::get("/api/students/me")).await?;
        Ok(envelope.student)
    }

    /// Lists students selectable as group members.
    pub async fn list_students(&self) -> AppResult<Vec<StudentProfile>> {
        let envelope: StudentsEnvelope =
            self.client.send_json(ApiRequest::get("/api/students/list")).await?;
        Ok(envelope.students)
    }

    /// Submits a group proposal.
    pub async fn submit_group(&self, submission: &GroupSubmission) -> AppResult<Value> {
        self.client
            .send(ApiRequest::post("/api/groups", to_body(submission)?))
            .await
    }
}

fn to_body(value: &impl Serialize) -> AppResult<Value> {
    serde_json::to_value(value)
        .map_err(|error| AppError::Internal(format!("failed to encode request body: {error}")))
}

/// Builds the identity carried by a login response: `<role>._id` and `token`
/// are required, the account's `fullName` and `session` are kept when present.
#[must_use]
pub fn login_identity(role: Role, body: &Value) -> Option<AuthIdentity> {
    let account = body.get(role.slug())?;
    let id = account.get("_id").and_then(Value::as_str)?;
    let token = body.get("token").and_then(Value::as_str)?;
    let mut identity = AuthIdentity::new(id, token, role).ok()?;

    if let Some(full_name) = account.get("fullName").and_then(Value::as_str) {
        identity = identity.with_full_name(full_name);
    }
    if let Some(session) = account.get("session").and_then(Value::as_str) {
        identity = identity.with_session(session);
    }

    Some(identity)
}

#[cfg(test)]
mod tests;
