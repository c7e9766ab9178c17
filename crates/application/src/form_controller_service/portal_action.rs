use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use fypms_core::AppResult;
use fypms_domain::{FormId, Route};

use super::SubmitAction;
use crate::{Navigator, PortalApi, login_identity};

/// Submits catalogue forms to the backend. A successful login also starts
/// the session and moves to the signed-in landing page.
#[derive(Clone)]
pub struct PortalSubmitAction {
    api: PortalApi,
    navigator: Arc<dyn Navigator>,
}

impl PortalSubmitAction {
    /// Creates the action.
    #[must_use]
    pub fn new(api: PortalApi, navigator: Arc<dyn Navigator>) -> Self {
        Self { api, navigator }
    }
}

#[async_trait]
impl SubmitAction for PortalSubmitAction {
    async fn submit(
        &self,
        form: FormId,
        editing_id: Option<&str>,
        payload: Value,
    ) -> AppResult<Value> {
        let body = self.api.submit_form(form, editing_id, payload).await?;

        if let FormId::Login(role) = form {
            match login_identity(role, &body) {
                Some(identity) => {
                    self.api.client().session().establish(identity)?;
                    self.navigator.redirect(&Route::Home);
                }
                None => warn!(role = %role, "login response carried no identity"),
            }
        }

        Ok(body)
    }
}
