//! Data-fetching list views.
//!
//! A view can be unmounted or reloaded while a fetch is outstanding; results
//! carry the ticket of the load that started them and stale ones are dropped.

use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{debug, warn};

use fypms_core::{AppError, AppResult};
use fypms_domain::{Toast, ToastKind, ToastSlot};

use crate::{
    Clock, DomainRecord, DomainSupervisorRecord, EvaluatorRecord, PortalApi, SupervisorRecord,
    failure_message,
};

/// Rows that can be deleted by backend id.
pub trait ListRow {
    /// Returns the backend id.
    fn row_id(&self) -> &str;
}

impl ListRow for DomainRecord {
    fn row_id(&self) -> &str {
        self.id.as_str()
    }
}

impl ListRow for SupervisorRecord {
    fn row_id(&self) -> &str {
        self.id.as_str()
    }
}

impl ListRow for EvaluatorRecord {
    fn row_id(&self) -> &str {
        self.id.as_str()
    }
}

/// Load state of a list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    /// Fetch outstanding.
    Loading,
    /// Rows received.
    Loaded(Vec<T>),
    /// Fetch failed with a user-facing message.
    Failed(String),
}

/// Identifies one load of a [`ListView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Rows plus the active session year shown in the view header.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    /// Rows in server order.
    pub rows: Vec<T>,
    /// Year range of the active session, when the view shows it.
    pub session_year: Option<String>,
}

impl<T> ListPage<T> {
    /// Page without a session year.
    #[must_use]
    pub fn rows(rows: Vec<T>) -> Self {
        Self {
            rows,
            session_year: None,
        }
    }
}

/// State of one mounted list view.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    state: ListState<T>,
    session_year: Option<String>,
    generation: u64,
    mounted: bool,
    toast: ToastSlot,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            state: ListState::Loading,
            session_year: None,
            generation: 0,
            mounted: true,
            toast: ToastSlot::default(),
        }
    }
}

impl<T> ListView<T> {
    /// Creates a mounted view in the loading state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load and invalidates every earlier ticket.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = ListState::Loading;
        LoadTicket(self.generation)
    }

    /// Applies a load result. Returns `false` when the result was stale or the
    /// session expired; the view then stays as it was.
    pub fn apply(
        &mut self,
        ticket: LoadTicket,
        result: AppResult<ListPage<T>>,
        fallback: &str,
    ) -> bool {
        if !self.mounted || ticket.0 != self.generation {
            debug!(
                ticket = ticket.0,
                generation = self.generation,
                "dropping stale list result"
            );
            return false;
        }

        self.state = match result {
            Ok(page) => {
                self.session_year = page.session_year;
                ListState::Loaded(page.rows)
            }
            Err(AppError::SessionExpired(_)) => {
                debug!("list load interrupted by expired session");
                return false;
            }
            Err(error) => {
                warn!(error = %error, "list load failed");
                ListState::Failed(failure_message(&error, fallback))
            }
        };

        true
    }

    /// Marks the view unmounted; later results are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Returns the load state.
    #[must_use]
    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    /// Returns the loaded rows, empty while loading or failed.
    #[must_use]
    pub fn rows(&self) -> &[T] {
        match &self.state {
            ListState::Loaded(rows) => rows,
            ListState::Loading | ListState::Failed(_) => &[],
        }
    }

    /// Returns the active session year.
    #[must_use]
    pub fn session_year(&self) -> Option<&str> {
        self.session_year.as_deref()
    }

    /// Returns the toast slot.
    #[must_use]
    pub fn toast_slot(&self) -> &ToastSlot {
        &self.toast
    }
}

impl<T: ListRow> ListView<T> {
    fn remove_row(&mut self, id: &str) {
        if let ListState::Loaded(rows) = &mut self.state {
            rows.retain(|row| row.row_id() != id);
        }
    }
}

fn lock<T>(view: &Mutex<ListView<T>>) -> AppResult<MutexGuard<'_, ListView<T>>> {
    view.lock()
        .map_err(|error| AppError::Internal(format!("failed to lock list view: {error}")))
}

/// Loads and mutates list views through the API.
#[derive(Clone)]
pub struct ListViewService {
    api: PortalApi,
    clock: Arc<dyn Clock>,
}

impl ListViewService {
    /// Creates the service.
    #[must_use]
    pub fn new(api: PortalApi, clock: Arc<dyn Clock>) -> Self {
        Self { api, clock }
    }

    async fn active_session_year(&self) -> AppResult<Option<String>> {
        Ok(self
            .api
            .active_session()
            .await?
            .and_then(|session| session.session_year))
    }

    /// Loads project domains.
    pub async fn load_domains(&self, view: &Mutex<ListView<DomainRecord>>) -> AppResult<bool> {
        let ticket = lock(view)?.begin_load();
        let result = self.api.list_domains().await.map(ListPage::rows);
        Ok(lock(view)?.apply(ticket, result, "Failed to load domains."))
    }

    /// Loads supervisors with the active session year.
    pub async fn load_supervisors(
        &self,
        view: &Mutex<ListView<SupervisorRecord>>,
    ) -> AppResult<bool> {
        let ticket = lock(view)?.begin_load();
        let result = async {
            let session_year = self.active_session_year().await?;
            let rows = self.api.list_supervisors().await?;
            Ok::<_, AppError>(ListPage { rows, session_year })
        }
        .await;
        Ok(lock(view)?.apply(ticket, result, "Failed to load supervisors."))
    }

    /// Loads evaluators with the active session year.
    pub async fn load_evaluators(
        &self,
        view: &Mutex<ListView<EvaluatorRecord>>,
    ) -> AppResult<bool> {
        let ticket = lock(view)?.begin_load();
        let result = async {
            let session_year = self.active_session_year().await?;
            let rows = self.api.list_evaluators().await?;
            Ok::<_, AppError>(ListPage { rows, session_year })
        }
        .await;
        Ok(lock(view)?.apply(ticket, result, "Failed to load evaluators."))
    }

    /// Loads domains with their supervisors for the active session.
    pub async fn load_domain_supervisors(
        &self,
        view: &Mutex<ListView<DomainSupervisorRecord>>,
    ) -> AppResult<bool> {
        let ticket = lock(view)?.begin_load();
        let result = async {
            let session_year = self.active_session_year().await?;
            let rows = self.api.list_domain_supervisors().await?;
            Ok::<_, AppError>(ListPage { rows, session_year })
        }
        .await;
        Ok(lock(view)?.apply(ticket, result, "Failed to load data."))
    }

    /// Deletes a domain row.
    pub async fn delete_domain(
        &self,
        view: &Mutex<ListView<DomainRecord>>,
        id: &str,
    ) -> AppResult<bool> {
        let result = self.api.delete_domain(id).await.map(|_| ());
        self.finish_delete(
            view,
            id,
            result,
            "Domain deleted successfully.",
            "Failed to delete domain.",
        )
    }

    /// Deletes a supervisor row.
    pub async fn delete_supervisor(
        &self,
        view: &Mutex<ListView<SupervisorRecord>>,
        id: &str,
    ) -> AppResult<bool> {
        let result = self.api.delete_supervisor(id).await.map(|_| ());
        self.finish_delete(
            view,
            id,
            result,
            "Supervisor deleted successfully.",
            "Failed to delete supervisor.",
        )
    }

    /// Deletes an evaluator row.
    pub async fn delete_evaluator(
        &self,
        view: &Mutex<ListView<EvaluatorRecord>>,
        id: &str,
    ) -> AppResult<bool> {
        let result = self.api.delete_evaluator(id).await.map(|_| ());
        self.finish_delete(
            view,
            id,
            result,
            "Evaluator deleted successfully.",
            "Failed to delete evaluator.",
        )
    }

    fn finish_delete<T: ListRow>(
        &self,
        view: &Mutex<ListView<T>>,
        id: &str,
        result: AppResult<()>,
        success: &str,
        fallback: &str,
    ) -> AppResult<bool> {
        let now = self.clock.now();
        let mut view = lock(view)?;

        match result {
            Ok(()) => {
                view.remove_row(id);
                view.toast.show(success, ToastKind::Success, now);
                Ok(true)
            }
            Err(AppError::SessionExpired(_)) => Ok(false),
            Err(error) => {
                warn!(row_id = id, error = %error, "list row delete failed");
                view.toast
                    .show(failure_message(&error, fallback), ToastKind::Error, now);
                Ok(false)
            }
        }
    }

    /// Returns the toast of a view visible now.
    pub fn visible_toast<T>(&self, view: &Mutex<ListView<T>>) -> AppResult<Option<Toast>> {
        Ok(lock(view)?.toast.visible(self.clock.now()).cloned())
    }
}
