use std::env;
use std::path::PathBuf;
use std::time::Duration;

use fypms_core::AppError;
use fypms_domain::Route;
use tracing_subscriber::EnvFilter;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_STORAGE_PATH: &str = ".fypms/session.json";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;
const DEFAULT_ROUTE: &str = "/dashboard";
const MEMORY_STORAGE: &str = ":memory:";

/// Where the auth session is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageLocation {
    File(PathBuf),
    /// Process-local; the session ends with the process.
    Memory,
}

#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub api_url: Url,
    pub storage: StorageLocation,
    pub http_timeout: Duration,
    pub route: Route,
}

impl PortalConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok(), env::args().nth(1))
    }

    /// Builds the config from a variable lookup; `route_arg` wins over
    /// `FYPMS_ROUTE`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        route_arg: Option<String>,
    ) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = non_empty("FYPMS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let api_url = Url::parse(api_url.trim())
            .map_err(|error| AppError::Validation(format!("invalid FYPMS_API_URL: {error}")))?;
        if api_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "FYPMS_API_URL must be an absolute http(s) URL, got '{api_url}'"
            )));
        }

        let storage =
            match non_empty("FYPMS_STORAGE_PATH").unwrap_or_else(|| DEFAULT_STORAGE_PATH.to_owned()) {
                path if path.trim() == MEMORY_STORAGE => StorageLocation::Memory,
                path => StorageLocation::File(PathBuf::from(path)),
            };

        let timeout_secs = match non_empty("FYPMS_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!("invalid FYPMS_HTTP_TIMEOUT_SECS: {error}"))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "FYPMS_HTTP_TIMEOUT_SECS must be greater than 0".to_owned(),
            ));
        }

        let route = route_arg
            .filter(|value| !value.trim().is_empty())
            .or_else(|| non_empty("FYPMS_ROUTE"))
            .unwrap_or_else(|| DEFAULT_ROUTE.to_owned());
        let route = Route::parse(route.trim()).ok_or_else(|| {
            AppError::Validation(format!("FYPMS_ROUTE '{route}' is not a portal route"))
        })?;

        Ok(Self {
            api_url,
            storage,
            http_timeout: Duration::from_secs(timeout_secs),
            route,
        })
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use fypms_core::{AppError, Role};
    use fypms_domain::{DashboardSection, Route};

    use super::{PortalConfig, StorageLocation};

    fn load(vars: &[(&str, &str)], route_arg: Option<&str>) -> Result<PortalConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        PortalConfig::from_lookup(|name| vars.get(name).cloned(), route_arg.map(str::to_owned))
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[], None).unwrap_or_else(|_| panic!("test"));

        assert_eq!(config.api_url.as_str(), "http://localhost:5000/");
        assert_eq!(
            config.storage,
            StorageLocation::File(".fypms/session.json".into())
        );
        assert_eq!(config.http_timeout, Duration::from_secs(15));
        assert_eq!(config.route, Route::Dashboard);
    }

    #[test]
    fn memory_marker_selects_in_process_storage() {
        let config =
            load(&[("FYPMS_STORAGE_PATH", ":memory:")], None).unwrap_or_else(|_| panic!("test"));

        assert_eq!(config.storage, StorageLocation::Memory);
    }

    #[test]
    fn argument_wins_over_route_variable() {
        let config = load(
            &[("FYPMS_ROUTE", "/student-login")],
            Some("/dashboard/register-group"),
        )
        .unwrap_or_else(|_| panic!("test"));
        assert_eq!(
            config.route,
            Route::Section(DashboardSection::RegisterGroup)
        );

        let config =
            load(&[("FYPMS_ROUTE", "/student-login")], None).unwrap_or_else(|_| panic!("test"));
        assert_eq!(config.route, Route::Login(Role::Student));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        for (vars, variable) in [
            (vec![("FYPMS_API_URL", "not a url")], "FYPMS_API_URL"),
            (vec![("FYPMS_HTTP_TIMEOUT_SECS", "0")], "FYPMS_HTTP_TIMEOUT_SECS"),
            (vec![("FYPMS_HTTP_TIMEOUT_SECS", "soon")], "FYPMS_HTTP_TIMEOUT_SECS"),
            (vec![("FYPMS_ROUTE", "/nowhere")], "FYPMS_ROUTE"),
        ] {
            match load(&vars, None) {
                Err(AppError::Validation(message)) => assert!(message.contains(variable)),
                other => panic!("expected validation error for {variable}, got {other:?}"),
            }
        }
    }
}
