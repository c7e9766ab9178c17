use std::sync::Arc;

use tracing::debug;

use fypms_core::{AppResult, Role};
use fypms_domain::Route;

use crate::{AuthSessionStore, AuthState, Navigator};

/// Outcome of gating a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Restore has not finished; render nothing yet.
    Pending,
    /// Send the visitor elsewhere.
    Redirect(Route),
    /// Render the view, with the viewer's role when signed in.
    Render(Option<Role>),
}

/// Gates protected views on the restored auth session.
#[derive(Clone)]
pub struct AccessGuard {
    session: AuthSessionStore,
    navigator: Arc<dyn Navigator>,
}

impl AccessGuard {
    /// Creates the guard.
    #[must_use]
    pub fn new(session: AuthSessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Decides how `route` is shown without side effects.
    pub fn decide(&self, route: &Route) -> AppResult<GuardDecision> {
        let state = self.session.state()?;
        let role = state.identity().map(|identity| identity.role());

        if !route.is_protected() {
            return Ok(GuardDecision::Render(role));
        }

        if !self.session.is_ready() {
            return Ok(GuardDecision::Pending);
        }

        Ok(match state {
            AuthState::Unknown => GuardDecision::Pending,
            AuthState::Anonymous => GuardDecision::Redirect(Route::Entry),
            AuthState::Authenticated(identity) => GuardDecision::Render(Some(identity.role())),
        })
    }

    /// Decides and performs any redirect through the navigator.
    pub fn enforce(&self, route: &Route) -> AppResult<GuardDecision> {
        let decision = self.decide(route)?;
        debug!(route = %route, decision = ?decision, "access guard decision");

        if let GuardDecision::Redirect(target) = &decision {
            self.navigator.redirect(target);
        }

        Ok(decision)
    }
}
