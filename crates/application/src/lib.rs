//! Application services and ports.

#![forbid(unsafe_code)]

mod access_guard_service;
mod api_client_service;
mod auth_session_service;
mod form_controller_service;
mod group_registration_service;
mod list_view_service;
mod portal_api_service;
mod portal_ports;
mod session_policy_service;

#[cfg(test)]
mod test_support;

pub use access_guard_service::{AccessGuard, GuardDecision};
pub use api_client_service::{ApiClient, server_message};
pub use auth_session_service::{
    AuthSessionStore, AuthState, IDENTITY_STORAGE_KEY, TOKEN_STORAGE_KEY,
};
pub use form_controller_service::{
    FIX_ERRORS_MESSAGE, FormController, PortalSubmitAction, SubmitAction, SubmitAttempt,
    SubmitOutcome, failure_message,
};
pub use group_registration_service::{
    GROUP_SUBMITTED_MESSAGE, GroupRegistration, GroupRegistrationService,
};
pub use list_view_service::{
    ListPage, ListRow, ListState, ListView, ListViewService, LoadTicket,
};
pub use portal_api_service::{
    ActiveSession, DomainRecord, DomainSupervisorRecord, EvaluatorRecord, PortalApi,
    SessionPolicyRecord, StudentProfile, SupervisorRecord, form_request, login_identity,
};
pub use portal_ports::{ApiRequest, ApiResponse, Clock, HttpTransport, Navigator, SessionStorage};
pub use session_policy_service::{SESSION_NOT_SET_MESSAGE, SessionPolicyService, SessionPolicyView};
