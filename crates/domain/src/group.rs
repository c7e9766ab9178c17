use std::collections::BTreeSet;

use fypms_core::{AppError, AppResult};
use serde::Serialize;

/// Member count used when the active session does not define one.
pub const DEFAULT_MAX_MEMBERS: u32 = 3;

/// Minimum idea name length after trimming.
pub const IDEA_NAME_MIN_LENGTH: usize = 2;

/// Group size bounds derived from the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberLimits {
    min: u32,
    max: u32,
}

impl MemberLimits {
    /// Clamps session limits: `max = max(1, maxMembers or 3)` and
    /// `min = max(1, min(minMembers, max))`.
    #[must_use]
    pub fn from_session(min_members: Option<u32>, max_members: Option<u32>) -> Self {
        let max = max_members
            .filter(|max| *max > 0)
            .unwrap_or(DEFAULT_MAX_MEMBERS)
            .max(1);
        let min = min_members.unwrap_or(1).min(max).max(1);

        Self { min, max }
    }

    /// Returns the minimum member count.
    #[must_use]
    pub fn min(&self) -> u32 {
        self.min
    }

    /// Returns the number of member slots.
    #[must_use]
    pub fn max(&self) -> u32 {
        self.max
    }
}

impl Default for MemberLimits {
    fn default() -> Self {
        Self::from_session(None, None)
    }
}

/// Body of `POST /api/groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSubmission {
    /// Trimmed idea name.
    pub idea_name: String,
    /// Trimmed idea description.
    pub idea_description: String,
    /// Selected supervisor id.
    #[serde(rename = "supervisor_id")]
    pub supervisor_id: String,
    /// Distinct selected student ids.
    pub members: Vec<String>,
}

/// Editable group proposal with one slot per allowed member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupProposal {
    idea_name: String,
    idea_description: String,
    supervisor_id: String,
    members: Vec<String>,
}

impl GroupProposal {
    /// Creates an empty proposal with `limits.max()` member slots.
    #[must_use]
    pub fn new(limits: MemberLimits) -> Self {
        let mut proposal = Self::default();
        proposal.resize_slots(limits);
        proposal
    }

    /// Resizes member slots, keeping selections that still fit.
    pub fn resize_slots(&mut self, limits: MemberLimits) {
        self.members.resize(limits.max() as usize, String::new());
    }

    /// Sets the idea name.
    pub fn set_idea_name(&mut self, value: impl Into<String>) {
        self.idea_name = value.into();
    }

    /// Sets the idea description.
    pub fn set_idea_description(&mut self, value: impl Into<String>) {
        self.idea_description = value.into();
    }

    /// Selects a supervisor.
    pub fn set_supervisor(&mut self, supervisor_id: impl Into<String>) {
        self.supervisor_id = supervisor_id.into();
    }

    /// Selects a student for one slot. Out-of-range slots are ignored.
    pub fn set_member(&mut self, slot: usize, student_id: impl Into<String>) {
        if let Some(member) = self.members.get_mut(slot) {
            *member = student_id.into();
        }
    }

    /// Returns the selected supervisor id.
    #[must_use]
    pub fn supervisor_id(&self) -> &str {
        self.supervisor_id.as_str()
    }

    /// Returns member slots, empty strings for unselected ones.
    #[must_use]
    pub fn member_slots(&self) -> &[String] {
        &self.members
    }

    /// Clears the proposal and selects `supervisor_id`.
    pub fn reset(&mut self, limits: MemberLimits, supervisor_id: Option<&str>) {
        *self = Self::new(limits);
        if let Some(supervisor_id) = supervisor_id {
            self.supervisor_id = supervisor_id.to_owned();
        }
    }

    /// Checks the proposal, first failing rule wins.
    pub fn validate(&self, limits: MemberLimits) -> AppResult<GroupSubmission> {
        let idea_name = self.idea_name.trim();
        if idea_name.chars().count() < IDEA_NAME_MIN_LENGTH {
            return Err(AppError::Validation(
                "Idea name is required (at least 2 characters).".to_owned(),
            ));
        }

        let members: Vec<String> = self
            .members
            .iter()
            .filter(|member| !member.is_empty())
            .cloned()
            .collect();
        if members.len() < limits.min() as usize {
            return Err(AppError::Validation(format!(
                "Select at least {} member(s) for the group.",
                limits.min()
            )));
        }

        let distinct: BTreeSet<&str> = members.iter().map(String::as_str).collect();
        if distinct.len() != members.len() {
            return Err(AppError::Validation(
                "Each member can only be selected once.".to_owned(),
            ));
        }

        let supervisor_id = self.supervisor_id.trim();
        if supervisor_id.is_empty() {
            return Err(AppError::Validation(
                "Please select a supervisor.".to_owned(),
            ));
        }

        Ok(GroupSubmission {
            idea_name: idea_name.to_owned(),
            idea_description: self.idea_description.trim().to_owned(),
            supervisor_id: supervisor_id.to_owned(),
            members,
        })
    }
}

#[cfg(test)]
mod tests {
    use fypms_core::AppError;
    use serde_json::json;

    use super::{GroupProposal, MemberLimits};

    fn filled(limits: MemberLimits) -> GroupProposal {
        let mut proposal = GroupProposal::new(limits);
        proposal.set_idea_name("  Smart Attendance  ");
        proposal.set_idea_description(" Face recognition ");
        proposal.set_member(0, "s1");
        proposal.set_member(1, "s2");
        proposal.set_supervisor("sup-1");
        proposal
    }

    #[test]
    fn limits_are_clamped() {
        assert_eq!(MemberLimits::from_session(None, None).max(), 3);
        assert_eq!(MemberLimits::from_session(Some(0), Some(0)).max(), 3);
        let limits = MemberLimits::from_session(Some(5), Some(4));
        assert_eq!((limits.min(), limits.max()), (4, 4));
        assert_eq!(MemberLimits::from_session(Some(0), Some(2)).min(), 1);
    }

    #[test]
    fn slots_follow_max_members() {
        let mut proposal = GroupProposal::new(MemberLimits::from_session(Some(1), Some(4)));
        assert_eq!(proposal.member_slots().len(), 4);
        proposal.set_member(1, "s2");
        proposal.resize_slots(MemberLimits::from_session(Some(1), Some(2)));
        assert_eq!(proposal.member_slots(), ["".to_owned(), "s2".to_owned()]);
        proposal.set_member(7, "ignored");
        assert_eq!(proposal.member_slots().len(), 2);
    }

    #[test]
    fn valid_proposal_builds_trimmed_submission() {
        let limits = MemberLimits::from_session(Some(2), Some(3));
        let submission = filled(limits)
            .validate(limits)
            .unwrap_or_else(|_| panic!("test"));
        let body = serde_json::to_value(&submission).unwrap_or_else(|_| panic!("test"));
        assert_eq!(
            body,
            json!({
                "ideaName": "Smart Attendance",
                "ideaDescription": "Face recognition",
                "supervisor_id": "sup-1",
                "members": ["s1", "s2"],
            })
        );
    }

    #[test]
    fn first_failing_rule_wins() {
        let limits = MemberLimits::from_session(Some(3), Some(3));
        let mut proposal = filled(limits);
        proposal.set_idea_name("x");
        proposal.set_supervisor("");
        assert!(matches!(
            proposal.validate(limits),
            Err(AppError::Validation(message)) if message.starts_with("Idea name")
        ));

        proposal.set_idea_name("Valid");
        assert!(matches!(
            proposal.validate(limits),
            Err(AppError::Validation(message)) if message == "Select at least 3 member(s) for the group."
        ));

        proposal.set_member(2, "s1");
        assert!(matches!(
            proposal.validate(limits),
            Err(AppError::Validation(message)) if message == "Each member can only be selected once."
        ));

        proposal.set_member(2, "s3");
        assert!(matches!(
            proposal.validate(limits),
            Err(AppError::Validation(message)) if message == "Please select a supervisor."
        ));
    }
}
