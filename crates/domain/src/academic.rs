use std::str::FromStr;

use fypms_core::{AppError, AppResult};

/// Lifecycle status of an academic session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Saved but not yet opened.
    Draft,
    /// Open for registrations and groups.
    Active,
    /// Closed.
    Inactive,
}

impl SessionStatus {
    /// Returns stable storage value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }

    /// Returns the human label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }

    /// Maps a server status string to a status. Unknown values read as inactive.
    #[must_use]
    pub fn from_server(value: Option<&str>) -> Self {
        value
            .and_then(|value| value.parse().ok())
            .unwrap_or(Self::Inactive)
    }
}

impl FromStr for SessionStatus {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        match value.trim() {
            "draft" => Ok(Self::Draft),
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown session status '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStatus;

    #[test]
    fn server_status_maps_to_labels() {
        assert_eq!(SessionStatus::from_server(Some("active")).label(), "Active");
        assert_eq!(SessionStatus::from_server(Some("draft")).label(), "Draft");
        assert_eq!(SessionStatus::from_server(Some("archived")).label(), "Inactive");
        assert_eq!(SessionStatus::from_server(None).label(), "Inactive");
    }

    #[test]
    fn parse_rejects_unknown_status() {
        assert!("closed".parse::<SessionStatus>().is_err());
        assert_eq!(
            "inactive".parse::<SessionStatus>().ok(),
            Some(SessionStatus::Inactive)
        );
    }
}
