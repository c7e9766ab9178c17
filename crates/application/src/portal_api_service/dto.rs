use serde::Deserialize;

/// Project domain row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainRecord {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Domain name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Supervisor row of the admin list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorRecord {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display position.
    #[serde(default)]
    pub number: Option<u32>,
    /// Supervisor name.
    #[serde(default)]
    pub supervisor_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
}

/// Evaluator row of the admin list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluatorRecord {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Display position.
    #[serde(default)]
    pub number: Option<u32>,
    /// Evaluator name.
    #[serde(default)]
    pub evaluator_name: String,
    /// Contact email.
    #[serde(default)]
    pub email: String,
}

/// Row of the domains-with-supervisors table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSupervisorRecord {
    /// Supervisor identifier, selectable in group registration.
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    /// Display position.
    #[serde(default)]
    pub number: Option<u32>,
    /// Domain name.
    #[serde(default)]
    pub domain_name: String,
    /// Supervisor name.
    #[serde(default)]
    pub supervisor_name: String,
    /// Supervisor email.
    #[serde(default)]
    pub supervisor_email: String,
}

/// Currently active academic session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSession {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Year range, e.g. `2021-2025`.
    #[serde(default, alias = "year")]
    pub session_year: Option<String>,
    /// Minimum group size.
    #[serde(default)]
    pub min_members: Option<u32>,
    /// Maximum group size.
    #[serde(default)]
    pub max_members: Option<u32>,
}

/// Signed-in student profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    /// Backend identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Student name.
    #[serde(default)]
    pub full_name: String,
    /// Roll number.
    #[serde(default)]
    pub roll_no: String,
    /// Academic session the student belongs to.
    #[serde(rename = "session_id", default)]
    pub session_id: Option<String>,
}

/// Policy of one academic session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPolicyRecord {
    /// Year range.
    #[serde(default)]
    pub year: Option<String>,
    /// Minimum CGPA to register.
    #[serde(default, rename = "minCGPA")]
    pub min_cgpa: Option<f64>,
    /// Minimum group size.
    #[serde(default)]
    pub min_members: Option<u32>,
    /// Maximum group size.
    #[serde(default)]
    pub max_members: Option<u32>,
    /// Minimum groups per supervisor.
    #[serde(default)]
    pub min_groups: Option<u32>,
    /// Maximum groups per supervisor.
    #[serde(default)]
    pub max_groups: Option<u32>,
    /// Number of evaluations.
    #[serde(default)]
    pub num_evaluation: Option<u32>,
    /// First defense weightage.
    #[serde(default)]
    pub d1_weightage: Option<f64>,
    /// Second defense weightage.
    #[serde(default)]
    pub d2_weightage: Option<f64>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DomainsEnvelope {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SupervisorsEnvelope {
    #[serde(default)]
    pub supervisors: Vec<SupervisorRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct EvaluatorsEnvelope {
    #[serde(default)]
    pub evaluators: Vec<EvaluatorRecord>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct DomainSupervisorsEnvelope {
    #[serde(default)]
    pub supervisors: Vec<DomainSupervisorRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ActiveSessionEnvelope {
    #[serde(default)]
    pub active_session: Option<ActiveSession>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StudentEnvelope {
    #[serde(default)]
    pub student: Option<StudentProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct StudentsEnvelope {
    #[serde(default)]
    pub students: Vec<StudentProfile>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct SessionPolicyEnvelope {
    #[serde(default)]
    pub session: Option<SessionPolicyRecord>,
}
