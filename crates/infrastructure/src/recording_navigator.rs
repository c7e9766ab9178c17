use std::sync::Mutex;

use fypms_application::Navigator;
use fypms_domain::Route;
use tracing::info;

/// Navigator for headless hosts: logs each redirect and remembers the last
/// target.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    current: Mutex<Option<Route>>,
}

impl RecordingNavigator {
    /// Creates a navigator with no redirect recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recent redirect target.
    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.current.lock().ok().and_then(|current| current.clone())
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, route: &Route) {
        info!(route = %route, "navigating");
        if let Ok(mut current) = self.current.lock() {
            *current = Some(route.clone());
        }
    }
}
