use http::{Method, StatusCode};
use serde_json::json;

use fypms_core::Role;
use fypms_domain::FormId;

use super::{PortalApi, form_request, login_identity};
use crate::test_support::Harness;

#[test]
fn forms_map_to_their_endpoints() {
    let cases = [
        (FormId::Login(Role::Supervisor), None, Method::POST, "/api/supervisors/login"),
        (FormId::Registration(Role::Student), None, Method::POST, "/api/students/register"),
        (FormId::SessionPolicy, None, Method::POST, "/api/admins/save-session"),
        (FormId::SessionStatus, None, Method::POST, "/api/admins/update-session"),
        (FormId::Domain, None, Method::POST, "/api/domains"),
        (FormId::Domain, Some("d7"), Method::PUT, "/api/domains/d7"),
    ];

    for (form, editing, method, path) in cases {
        let request = form_request(form, editing, json!({}));
        assert_eq!(request.method, method);
        assert_eq!(request.path, path);
    }
}

#[test]
fn login_identity_requires_id_and_token() {
    let body = json!({
        "admin": {"_id": "a1", "fullName": "Hina Raza"},
        "token": "tok",
        "message": "Welcome"
    });
    let identity = login_identity(Role::Admin, &body).unwrap_or_else(|| panic!("test"));
    assert_eq!(identity.id(), "a1");
    assert_eq!(identity.full_name(), Some("Hina Raza"));

    assert!(login_identity(Role::Student, &body).is_none());
    assert!(login_identity(Role::Admin, &json!({"admin": {"_id": "a1"}})).is_none());
}

#[tokio::test]
async fn list_endpoints_unwrap_envelopes() {
    let harness = Harness::new().signed_in(Role::Admin);
    harness.transport.respond(
        Method::GET,
        "/api/domains",
        StatusCode::OK,
        json!({"domains": [{"_id": "d1", "name": "AI"}]}),
    );
    harness.transport.respond(
        Method::GET,
        "/api/sessions/active",
        StatusCode::OK,
        json!({"activeSession": {"_id": "s1", "sessionYear": "2022-2026", "maxMembers": 4}}),
    );
    let api = PortalApi::new(harness.client.clone());

    let domains = api.list_domains().await.unwrap_or_else(|_| panic!("test"));
    let session = api
        .active_session()
        .await
        .unwrap_or_else(|_| panic!("test"))
        .unwrap_or_else(|| panic!("test"));
    let supervisors = api
        .list_supervisors()
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert_eq!(domains[0].name, "AI");
    assert_eq!(session.max_members, Some(4));
    assert!(supervisors.is_empty());
}

#[tokio::test]
async fn session_policy_sends_year_query() {
    let harness = Harness::new().signed_in(Role::Student);
    let api = PortalApi::new(harness.client.clone());

    let policy = api
        .session_policy("2021-2025")
        .await
        .unwrap_or_else(|_| panic!("test"));

    assert!(policy.is_none());
    let request = &harness.transport.requests()[0];
    assert_eq!(request.path, "/api/session-policy");
    assert_eq!(
        request.query,
        vec![("year".to_owned(), "2021-2025".to_owned())]
    );
}
