//! Route table and role navigation.

use std::fmt;

use fypms_core::Role;

/// Dashboard section mounted under `/dashboard/<section>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardSection {
    /// Admin session management.
    ManageSessions,
    /// Admin domain management.
    ManageDomains,
    /// Admin supervisor management.
    ManageSupervisors,
    /// Admin evaluator management.
    ManageEvaluators,
    /// Student group registration.
    RegisterGroup,
    /// Session policy for the signed-in user's session.
    SessionPolicy,
    /// Read-only domain list.
    AllDomains,
    /// Domains with their supervisors.
    DomainsSupervisors,
    /// Student project guide.
    FypGuide,
    /// Event calendar placeholder.
    FypEvents,
    /// Resource library placeholder.
    FypResources,
}

impl DashboardSection {
    const ALL: [Self; 11] = [
        Self::ManageSessions,
        Self::ManageDomains,
        Self::ManageSupervisors,
        Self::ManageEvaluators,
        Self::RegisterGroup,
        Self::SessionPolicy,
        Self::AllDomains,
        Self::DomainsSupervisors,
        Self::FypGuide,
        Self::FypEvents,
        Self::FypResources,
    ];

    /// Returns the path segment.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::ManageSessions => "manage-sessions",
            Self::ManageDomains => "manage-domains",
            Self::ManageSupervisors => "manage-supervisors",
            Self::ManageEvaluators => "manage-evaluators",
            Self::RegisterGroup => "register-group",
            Self::SessionPolicy => "session-policy",
            Self::AllDomains => "all-domains",
            Self::DomainsSupervisors => "domains-supervisors",
            Self::FypGuide => "fyp-guide",
            Self::FypEvents => "fyp-events",
            Self::FypResources => "fyp-resources",
        }
    }

    /// Looks a section up by path segment.
    #[must_use]
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|section| section.slug() == slug)
    }
}

/// Client-side route.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// Unauthenticated entry page `/`.
    Entry,
    /// Signed-in landing page `/home`.
    Home,
    /// Role-scoped login page `/<role>-login`.
    Login(Role),
    /// Dashboard root `/dashboard`.
    Dashboard,
    /// Known dashboard section.
    Section(DashboardSection),
    /// Unmapped dashboard path, rendered as a placeholder.
    Placeholder(String),
}

impl Route {
    /// Parses a path. Query strings, fragments and trailing slashes are ignored.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let path = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim();
        let path = path.trim_end_matches('/');

        match path {
            "" => return Some(Self::Entry),
            "/home" => return Some(Self::Home),
            "/dashboard" => return Some(Self::Dashboard),
            _ => {}
        }

        if let Some(section) = path.strip_prefix("/dashboard/") {
            if section.is_empty() || section.contains('/') {
                return None;
            }
            return Some(
                DashboardSection::from_slug(section)
                    .map_or_else(|| Self::Placeholder(section.to_owned()), Self::Section),
            );
        }

        path.strip_prefix('/')
            .and_then(|rest| rest.strip_suffix("-login"))
            .and_then(|role| {
                Role::all()
                    .iter()
                    .copied()
                    .find(|candidate| candidate.slug() == role)
            })
            .map(Self::Login)
    }

    /// Returns the canonical path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Entry => "/".to_owned(),
            Self::Home => "/home".to_owned(),
            Self::Login(role) => format!("/{}-login", role.slug()),
            Self::Dashboard => "/dashboard".to_owned(),
            Self::Section(section) => format!("/dashboard/{}", section.slug()),
            Self::Placeholder(section) => format!("/dashboard/{section}"),
        }
    }

    /// Returns whether the route needs an authenticated session.
    #[must_use]
    pub fn is_protected(&self) -> bool {
        !matches!(self, Self::Entry | Self::Login(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.path())
    }
}

/// One navigation entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Visible label.
    pub label: &'static str,
    /// Target route.
    pub route: Route,
    /// Icon key; presentation picks the glyph.
    pub icon: &'static str,
}

impl NavLink {
    fn new(label: &'static str, route: Route, icon: &'static str) -> Self {
        Self { label, route, icon }
    }
}

fn section(section: DashboardSection) -> Route {
    Route::Section(section)
}

/// Returns the sidebar entries for a role.
#[must_use]
pub fn sidebar_links(role: Role) -> Vec<NavLink> {
    let mut links = vec![NavLink::new("Dashboard", Route::Dashboard, "dashboard")];

    match role {
        Role::Admin => links.extend([
            NavLink::new(
                "Manage Sessions",
                section(DashboardSection::ManageSessions),
                "calendar",
            ),
            NavLink::new(
                "Manage Domains",
                section(DashboardSection::ManageDomains),
                "file",
            ),
            NavLink::new(
                "Manage Supervisors",
                section(DashboardSection::ManageSupervisors),
                "users",
            ),
            NavLink::new(
                "Manage Evaluators",
                section(DashboardSection::ManageEvaluators),
                "users",
            ),
        ]),
        Role::Student => {
            links.push(NavLink::new(
                "Register Group",
                section(DashboardSection::RegisterGroup),
                "users",
            ));
            links.extend(shared_links());
        }
        Role::Supervisor | Role::Evaluator => links.extend(shared_links()),
    }

    links
}

fn shared_links() -> [NavLink; 3] {
    [
        NavLink::new(
            "Session Policy",
            section(DashboardSection::SessionPolicy),
            "settings",
        ),
        NavLink::new("All Domains", section(DashboardSection::AllDomains), "file"),
        NavLink::new(
            "Domains & Supervisors",
            section(DashboardSection::DomainsSupervisors),
            "message",
        ),
    ]
}

/// Returns the top bar quick links for a role.
#[must_use]
pub fn navbar_links(role: Role) -> Vec<NavLink> {
    let guide = if role == Role::Student {
        DashboardSection::FypGuide
    } else {
        DashboardSection::SessionPolicy
    };

    vec![
        NavLink::new("FYP Guide", section(guide), "file"),
        NavLink::new("FYP Events", section(DashboardSection::FypEvents), "calendar"),
        NavLink::new(
            "FYP Resources",
            section(DashboardSection::FypResources),
            "file",
        ),
    ]
}

/// Avatar initials for a display name.
#[must_use]
pub fn display_initials(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    match words.as_slice() {
        [] => "U".to_owned(),
        [first, .., last] => first
            .chars()
            .take(1)
            .chain(last.chars().take(1))
            .collect::<String>()
            .to_uppercase(),
        [only] => only.chars().take(2).collect::<String>().to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use fypms_core::Role;

    use super::{DashboardSection, Route, display_initials, navbar_links, sidebar_links};

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Entry));
        assert_eq!(Route::parse("/admin-login"), Some(Route::Login(Role::Admin)));
        assert_eq!(Route::parse("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(
            Route::parse("/dashboard/manage-domains?page=2"),
            Some(Route::Section(DashboardSection::ManageDomains))
        );
        assert_eq!(
            Route::parse("/dashboard/reports"),
            Some(Route::Placeholder("reports".to_owned()))
        );
        assert_eq!(Route::parse("/guest-login"), None);
        assert_eq!(Route::parse("/dashboard/a/b"), None);
    }

    #[test]
    fn only_entry_and_login_routes_are_public() {
        assert!(!Route::Entry.is_protected());
        assert!(!Route::Login(Role::Student).is_protected());
        assert!(Route::Home.is_protected());
        assert!(Route::Dashboard.is_protected());
        assert!(Route::Section(DashboardSection::SessionPolicy).is_protected());
    }

    #[test]
    fn sidebar_differs_per_role() {
        let labels = |role| {
            sidebar_links(role)
                .into_iter()
                .map(|link| link.label)
                .collect::<Vec<_>>()
        };

        assert_eq!(
            labels(Role::Admin),
            [
                "Dashboard",
                "Manage Sessions",
                "Manage Domains",
                "Manage Supervisors",
                "Manage Evaluators"
            ]
        );
        assert_eq!(
            labels(Role::Student),
            [
                "Dashboard",
                "Register Group",
                "Session Policy",
                "All Domains",
                "Domains & Supervisors"
            ]
        );
        assert_eq!(labels(Role::Supervisor), labels(Role::Evaluator));
        assert_eq!(labels(Role::Evaluator).len(), 4);
    }

    #[test]
    fn guide_link_depends_on_role() {
        assert_eq!(navbar_links(Role::Student)[0].route.path(), "/dashboard/fyp-guide");
        assert_eq!(
            navbar_links(Role::Admin)[0].route.path(),
            "/dashboard/session-policy"
        );
    }

    #[test]
    fn initials_follow_name_shape() {
        assert_eq!(display_initials("ayesha khan malik"), "AM");
        assert_eq!(display_initials("Admin"), "AD");
        assert_eq!(display_initials("   "), "U");
    }
}
