//! FYP Management System portal composition root.

#![forbid(unsafe_code)]

mod portal_config;

use std::sync::{Arc, Mutex};

use fypms_application::{
    AccessGuard, ApiClient, AuthSessionStore, GroupRegistrationService, GuardDecision, ListState,
    ListView, ListViewService, PortalApi, SessionPolicyService, SessionPolicyView, SessionStorage,
};
use fypms_core::{AppError, AuthIdentity};
use fypms_domain::{DashboardSection, Route, display_initials, navbar_links, sidebar_links};
use fypms_infrastructure::{
    InMemorySessionStorage, JsonFileSessionStorage, RecordingNavigator, ReqwestHttpTransport,
    SystemClock,
};
use tracing::{info, warn};

use crate::portal_config::{PortalConfig, StorageLocation, init_tracing};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PortalConfig::load()?;
    info!(
        api_url = %config.api_url,
        storage = ?config.storage,
        route = %config.route,
        "starting portal"
    );

    let storage: Arc<dyn SessionStorage> = match &config.storage {
        StorageLocation::File(path) => Arc::new(JsonFileSessionStorage::new(path.clone())),
        StorageLocation::Memory => Arc::new(InMemorySessionStorage::new()),
    };
    let transport = Arc::new(ReqwestHttpTransport::new(
        config.api_url.clone(),
        config.http_timeout,
    )?);
    let navigator = Arc::new(RecordingNavigator::new());
    let clock = Arc::new(SystemClock);

    let session = AuthSessionStore::new(storage);
    session.restore()?;

    let client = ApiClient::new(transport, session.clone(), navigator.clone());
    let api = PortalApi::new(client);
    let guard = AccessGuard::new(session.clone(), navigator.clone());

    match guard.enforce(&config.route)? {
        GuardDecision::Pending => info!("session restore pending, rendering nothing"),
        GuardDecision::Redirect(target) => info!(target = %target, "redirected"),
        GuardDecision::Render(None) => info!(route = %config.route, "rendering public view"),
        GuardDecision::Render(Some(role)) => {
            let identity = session.identity()?;
            let name = identity
                .as_ref()
                .map_or("User", AuthIdentity::display_name);
            info!(role = role.as_str(), initials = %display_initials(name), "rendering dashboard");
            for link in sidebar_links(role) {
                info!(label = link.label, path = %link.route, icon = link.icon, "sidebar");
            }
            for link in navbar_links(role) {
                info!(label = link.label, path = %link.route, "navbar");
            }

            let views = Views {
                api: api.clone(),
                lists: ListViewService::new(api, clock),
            };
            if let Err(error) = views.render(&config.route, identity.as_ref()).await {
                warn!(error = %error, "view failed to render");
            }
        }
    }

    if let Some(target) = navigator.current() {
        info!(target = %target, "final location");
    }

    Ok(())
}

struct Views {
    api: PortalApi,
    lists: ListViewService,
}

impl Views {
    async fn render(&self, route: &Route, identity: Option<&AuthIdentity>) -> Result<(), AppError> {
        let Route::Section(section) = route else {
            return Ok(());
        };

        match section {
            DashboardSection::ManageDomains | DashboardSection::AllDomains => {
                let view = Mutex::new(ListView::new());
                self.lists.load_domains(&view).await?;
                log_rows("domains", &view)
            }
            DashboardSection::ManageSupervisors => {
                let view = Mutex::new(ListView::new());
                self.lists.load_supervisors(&view).await?;
                log_rows("supervisors", &view)
            }
            DashboardSection::ManageEvaluators => {
                let view = Mutex::new(ListView::new());
                self.lists.load_evaluators(&view).await?;
                log_rows("evaluators", &view)
            }
            DashboardSection::DomainsSupervisors => {
                let view = Mutex::new(ListView::new());
                self.lists.load_domain_supervisors(&view).await?;
                log_rows("domain supervisors", &view)
            }
            DashboardSection::SessionPolicy => {
                let Some(identity) = identity else {
                    return Ok(());
                };
                match SessionPolicyService::new(self.api.clone()).load(identity).await? {
                    SessionPolicyView::Policy { policy, status } => info!(
                        year = policy.year.as_deref().unwrap_or("-"),
                        status = status.label(),
                        "session policy"
                    ),
                    SessionPolicyView::Missing => info!("no session policy found"),
                    SessionPolicyView::Failed(message) => warn!(%message, "session policy"),
                }
                Ok(())
            }
            DashboardSection::RegisterGroup => {
                let registration = GroupRegistrationService::new(self.api.clone())
                    .open(identity)
                    .await?;
                info!(
                    eligible = registration.is_eligible(),
                    min_members = registration.limits().min(),
                    max_members = registration.limits().max(),
                    supervisors = registration.supervisors().len(),
                    "group registration"
                );
                Ok(())
            }
            other => {
                info!(section = other.slug(), "static section");
                Ok(())
            }
        }
    }
}

fn log_rows<T>(label: &str, view: &Mutex<ListView<T>>) -> Result<(), AppError> {
    let view = view
        .lock()
        .map_err(|error| AppError::Internal(format!("failed to lock list view: {error}")))?;
    match view.state() {
        ListState::Failed(message) => warn!(%message, list = label, "list failed"),
        ListState::Loading | ListState::Loaded(_) => info!(
            list = label,
            rows = view.rows().len(),
            session_year = view.session_year().unwrap_or("-"),
            "list loaded"
        ),
    }
    Ok(())
}
