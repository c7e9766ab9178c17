use tracing::info;

use fypms_core::{AppError, AppResult, AuthIdentity};
use fypms_domain::SessionStatus;

use crate::{PortalApi, SessionPolicyRecord, failure_message};

/// Shown when the signed-in account has no session year.
pub const SESSION_NOT_SET_MESSAGE: &str =
    "Your session is not set. You cannot view session policy.";

/// What the session policy page renders.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionPolicyView {
    /// Policy found.
    Policy {
        /// Policy as returned by the backend.
        policy: SessionPolicyRecord,
        /// Normalised status.
        status: SessionStatus,
    },
    /// The backend has no policy for the year.
    Missing,
    /// The page cannot show a policy.
    Failed(String),
}

/// Loads the policy of the signed-in account's session.
#[derive(Clone)]
pub struct SessionPolicyService {
    api: PortalApi,
}

impl SessionPolicyService {
    /// Creates the service.
    #[must_use]
    pub fn new(api: PortalApi) -> Self {
        Self { api }
    }

    /// Loads the policy for `identity`. A missing session year fails without
    /// a request.
    pub async fn load(&self, identity: &AuthIdentity) -> AppResult<SessionPolicyView> {
        let Some(year) = identity.session() else {
            return Ok(SessionPolicyView::Failed(SESSION_NOT_SET_MESSAGE.to_owned()));
        };

        match self.api.session_policy(year).await {
            Ok(Some(policy)) => {
                let status = SessionStatus::from_server(policy.status.as_deref());
                info!(year, status = status.as_str(), "session policy loaded");
                Ok(SessionPolicyView::Policy { policy, status })
            }
            Ok(None) => Ok(SessionPolicyView::Missing),
            Err(error @ AppError::SessionExpired(_)) => Err(error),
            Err(error) => Ok(SessionPolicyView::Failed(failure_message(
                &error,
                "Failed to load session policy.",
            ))),
        }
    }
}
