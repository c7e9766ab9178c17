use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, NonEmptyString};

/// Portal roles recognised by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Manages sessions, domains, supervisors and evaluators.
    Admin,
    /// Registers project groups.
    Student,
    /// Supervises project groups.
    Supervisor,
    /// Evaluates project defenses.
    Evaluator,
}

impl Role {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Student => "Student",
            Self::Supervisor => "Supervisor",
            Self::Evaluator => "Evaluator",
        }
    }

    /// Returns the lowercase slug used in API paths and routes.
    #[must_use]
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
            Self::Supervisor => "supervisor",
            Self::Evaluator => "evaluator",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::Admin, Role::Student, Role::Supervisor, Role::Evaluator];

        ALL
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.slug().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}

/// Opaque credential sent as `Authorization: Bearer <token>`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(NonEmptyString);

impl BearerToken {
    /// Creates a validated bearer token.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the raw token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the `Authorization` header value.
    #[must_use]
    pub fn authorization_value(&self) -> String {
        format!("Bearer {}", self.0.as_str())
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("BearerToken(<redacted>)")
    }
}

/// Authenticated identity held by the session store and persisted client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthIdentity {
    id: NonEmptyString,
    token: BearerToken,
    role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    session: Option<String>,
}

impl AuthIdentity {
    /// Creates an identity from the fields returned by a login response.
    pub fn new(
        id: impl Into<String>,
        token: impl Into<String>,
        role: Role,
    ) -> AppResult<Self> {
        let id = NonEmptyString::new(id)
            .map_err(|_| AppError::Validation("identity id must not be empty".to_owned()))?;
        let token = BearerToken::new(token)
            .map_err(|_| AppError::Validation("identity token must not be empty".to_owned()))?;

        Ok(Self {
            id,
            token,
            role,
            full_name: None,
            session: None,
        })
    }

    /// Attaches the display name.
    #[must_use]
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let trimmed = full_name.trim();
        self.full_name = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Attaches the academic session year of the account.
    #[must_use]
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        let session = session.into();
        let trimmed = session.trim();
        self.session = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the backend identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    /// Returns the role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the display name, if known.
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    /// Returns the name shown in the navbar: the full name, else the role.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.full_name().unwrap_or(self.role.as_str())
    }

    /// Returns the academic session year, if known.
    #[must_use]
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }
}
