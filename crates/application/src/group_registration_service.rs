//! Student group registration.

use tracing::{info, warn};

use fypms_core::{AppError, AppResult, AuthIdentity, Role};
use fypms_domain::{GroupProposal, MemberLimits};

use crate::{ActiveSession, DomainSupervisorRecord, PortalApi, StudentProfile, failure_message};

/// Shown after the backend accepts a proposal.
pub const GROUP_SUBMITTED_MESSAGE: &str = "Group submitted for approval.";

/// Registration page state.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRegistration {
    eligible: bool,
    limits: MemberLimits,
    proposal: GroupProposal,
    students: Vec<StudentProfile>,
    supervisors: Vec<DomainSupervisorRecord>,
    error: Option<String>,
    success: Option<String>,
    submitting: bool,
}

impl GroupRegistration {
    fn closed(limits: MemberLimits) -> Self {
        Self {
            eligible: false,
            limits,
            proposal: GroupProposal::new(limits),
            students: Vec::new(),
            supervisors: Vec::new(),
            error: None,
            success: None,
            submitting: false,
        }
    }

    /// Returns whether the student may register a group now.
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    /// Returns the member limits.
    #[must_use]
    pub fn limits(&self) -> MemberLimits {
        self.limits
    }

    /// Returns the editable proposal.
    #[must_use]
    pub fn proposal(&self) -> &GroupProposal {
        &self.proposal
    }

    /// Returns the proposal for editing.
    pub fn proposal_mut(&mut self) -> &mut GroupProposal {
        &mut self.proposal
    }

    /// Returns selectable students.
    #[must_use]
    pub fn students(&self) -> &[StudentProfile] {
        &self.students
    }

    /// Returns selectable supervisors.
    #[must_use]
    pub fn supervisors(&self) -> &[DomainSupervisorRecord] {
        &self.supervisors
    }

    /// Returns the last error banner.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the last success banner.
    #[must_use]
    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    /// Returns whether a submit is outstanding.
    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn first_supervisor_id(&self) -> Option<&str> {
        self.supervisors
            .iter()
            .find_map(|supervisor| supervisor.id.as_deref())
    }
}

/// Loads eligibility and options and submits proposals.
#[derive(Clone)]
pub struct GroupRegistrationService {
    api: PortalApi,
}

impl GroupRegistrationService {
    /// Creates the service.
    #[must_use]
    pub fn new(api: PortalApi) -> Self {
        Self { api }
    }

    /// Opens the page for `identity`. Only a student whose session is the
    /// active one is eligible; lookup failures read as not eligible.
    pub async fn open(&self, identity: Option<&AuthIdentity>) -> AppResult<GroupRegistration> {
        if identity.is_none_or(|identity| identity.role() != Role::Student) {
            return Ok(GroupRegistration::closed(MemberLimits::default()));
        }

        let (session, student) = match self.lookup().await {
            Ok(found) => found,
            Err(error @ AppError::SessionExpired(_)) => return Err(error),
            Err(error) => {
                warn!(error = %error, "group eligibility lookup failed");
                return Ok(GroupRegistration::closed(MemberLimits::default()));
            }
        };

        let limits = MemberLimits::from_session(
            session.as_ref().and_then(|session| session.min_members),
            session.as_ref().and_then(|session| session.max_members),
        );
        let active_id = session.map(|session| session.id);
        let student_session = student.and_then(|student| student.session_id);
        let eligible = matches!(
            (&active_id, &student_session),
            (Some(active), Some(own)) if active == own
        );

        let mut registration = GroupRegistration::closed(limits);
        if !eligible {
            return Ok(registration);
        }

        registration.eligible = true;
        match self.options().await {
            Ok((students, supervisors)) => {
                registration.students = students;
                registration.supervisors = supervisors;
            }
            Err(error @ AppError::SessionExpired(_)) => return Err(error),
            Err(error) => warn!(error = %error, "group options lookup failed"),
        }
        if let Some(supervisor_id) = registration.first_supervisor_id().map(str::to_owned) {
            registration.proposal.set_supervisor(supervisor_id);
        }

        Ok(registration)
    }

    async fn lookup(&self) -> AppResult<(Option<ActiveSession>, Option<StudentProfile>)> {
        let session = self.api.active_session().await?;
        let student = self.api.current_student().await?;
        Ok((session, student))
    }

    async fn options(&self) -> AppResult<(Vec<StudentProfile>, Vec<DomainSupervisorRecord>)> {
        let students = self.api.list_students().await?;
        let supervisors = self.api.list_domain_supervisors().await?;
        Ok((students, supervisors))
    }

    /// Validates and submits the proposal. Returns `true` when accepted.
    pub async fn submit(&self, registration: &mut GroupRegistration) -> bool {
        if registration.submitting || !registration.eligible {
            return false;
        }

        registration.error = None;
        registration.success = None;

        let submission = match registration.proposal.validate(registration.limits) {
            Ok(submission) => submission,
            Err(error) => {
                registration.error = Some(error.message().to_owned());
                return false;
            }
        };

        registration.submitting = true;
        let result = self.api.submit_group(&submission).await;
        registration.submitting = false;

        match result {
            Ok(_) => {
                info!(members = submission.members.len(), "group proposal submitted");
                registration.success = Some(GROUP_SUBMITTED_MESSAGE.to_owned());
                let supervisor_id = registration.first_supervisor_id().map(str::to_owned);
                registration
                    .proposal
                    .reset(registration.limits, supervisor_id.as_deref());
                true
            }
            Err(AppError::SessionExpired(_)) => false,
            Err(error) => {
                warn!(error = %error, "group proposal rejected");
                registration.error = Some(failure_message(&error, "Failed to register group."));
                false
            }
        }
    }
}
