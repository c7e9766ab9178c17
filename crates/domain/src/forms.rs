//! Form catalogue.
//!
//! Each portal form is composed from the shared [`FieldRule`] registry.
//! Fields with the same name carry the same rule in every form they appear in.

use fypms_core::Role;
use serde_json::{Map, Value};

use crate::{
    FieldConstraints, FieldDefinition, FieldKind, FieldRule, FormValues, PayloadEncoding,
    SiblingField,
};

/// Departments offered in department dropdowns.
pub const DEPARTMENTS: &[&str] = &["IT", "CS", "SE"];

/// Status values accepted by the session status form.
pub const SESSION_STATUSES: &[&str] = &["active", "inactive"];

/// Identifies a form in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    /// Role-scoped login.
    Login(Role),
    /// Role-scoped account registration.
    Registration(Role),
    /// Academic session create/update.
    SessionPolicy,
    /// Department-scoped session status change.
    SessionStatus,
    /// Project domain create/update.
    Domain,
}

/// What the controller does with the values after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessBehavior {
    /// Clear values and touched state.
    Reset,
    /// Leave values intact for the caller's own follow-up.
    KeepValues,
}

/// Declarative description of one form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    id: FormId,
    fields: Vec<FieldDefinition>,
    extra_payload: Vec<(String, Value)>,
    on_success: SuccessBehavior,
    success_message: String,
    failure_message: String,
}

impl FormSchema {
    fn new(
        id: FormId,
        fields: Vec<FieldDefinition>,
        on_success: SuccessBehavior,
        success_message: &str,
        failure_message: &str,
    ) -> Self {
        Self {
            id,
            fields,
            extra_payload: Vec::new(),
            on_success,
            success_message: success_message.to_owned(),
            failure_message: failure_message.to_owned(),
        }
    }

    /// Returns the schema for a catalogue entry.
    #[must_use]
    pub fn for_form(id: FormId) -> Self {
        match id {
            FormId::Login(role) => login(role),
            FormId::Registration(role) => registration(role),
            FormId::SessionPolicy => session_policy(),
            FormId::SessionStatus => session_status(),
            FormId::Domain => domain(),
        }
    }

    /// Adds a constant payload entry.
    #[must_use]
    fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extra_payload.push((key.to_owned(), value));
        self
    }

    /// Returns the form identifier.
    #[must_use]
    pub fn id(&self) -> FormId {
        self.id
    }

    /// Returns field definitions in display order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDefinition] {
        &self.fields
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Returns the post-success behaviour.
    #[must_use]
    pub fn on_success(&self) -> SuccessBehavior {
        self.on_success
    }

    /// Returns the toast text used when the server sends no message.
    #[must_use]
    pub fn success_message(&self) -> &str {
        self.success_message.as_str()
    }

    /// Returns the toast text used when a failure carries no message.
    #[must_use]
    pub fn failure_message(&self) -> &str {
        self.failure_message.as_str()
    }

    /// Builds the outgoing JSON body. Confirmation-only fields are stripped.
    #[must_use]
    pub fn payload(&self, values: &FormValues) -> Map<String, Value> {
        let mut payload: Map<String, Value> = self
            .fields
            .iter()
            .filter(|field| !field.is_confirmation_only())
            .map(|field| {
                (
                    field.name().to_owned(),
                    field.encoding().encode(values.get(field.name())),
                )
            })
            .collect();

        for (key, value) in &self.extra_payload {
            payload.insert(key.clone(), value.clone());
        }

        payload
    }
}

fn full_name() -> FieldDefinition {
    FieldDefinition::new("fullName", "Full name", FieldKind::Text, FieldRule::FullName)
}

fn department() -> FieldDefinition {
    FieldDefinition::new("department", "Department", FieldKind::Select, FieldRule::Select)
        .with_options(DEPARTMENTS)
}

fn username() -> FieldDefinition {
    FieldDefinition::new(
        "username",
        "Username",
        FieldKind::Text,
        FieldRule::PlainText {
            min_length: Some(2),
        },
    )
}

fn password() -> FieldDefinition {
    FieldDefinition::new("password", "Password", FieldKind::Password, FieldRule::Password)
}

fn confirm_password() -> FieldDefinition {
    FieldDefinition::new(
        "confirmPassword",
        "Confirm password",
        FieldKind::Password,
        FieldRule::ConfirmPassword {
            password_field: "password".to_owned(),
        },
    )
}

fn required_text(name: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(name, label, FieldKind::Text, FieldRule::PlainText { min_length: None })
}

fn integer(name: &str, label: &str, min: f64, at_least: Option<SiblingField>) -> FieldDefinition {
    FieldDefinition::new(
        name,
        label,
        FieldKind::Number,
        FieldRule::Number {
            integer: true,
            at_least,
        },
    )
    .with_constraints(FieldConstraints::bounded(Some(min), None))
    .encoded_as(PayloadEncoding::Number)
}

fn weightage(name: &str, label: &str) -> FieldDefinition {
    FieldDefinition::new(
        name,
        label,
        FieldKind::Number,
        FieldRule::Number {
            integer: false,
            at_least: None,
        },
    )
    .with_constraints(FieldConstraints::bounded(Some(0.0), Some(100.0)))
    .encoded_as(PayloadEncoding::Number)
}

fn session_year() -> FieldDefinition {
    FieldDefinition::new(
        "sessionYear",
        "Session year",
        FieldKind::Text,
        FieldRule::SessionRange { ascending: true },
    )
    .encoded_as(PayloadEncoding::Trimmed)
}

fn login(role: Role) -> FormSchema {
    FormSchema::new(
        FormId::Login(role),
        vec![
            FieldDefinition::new("email", "Email", FieldKind::Email, FieldRule::GenericEmail)
                .encoded_as(PayloadEncoding::TrimmedLowercase),
            password(),
        ],
        SuccessBehavior::KeepValues,
        "Logged in successfully.",
        "Login failed. Please check your email and password.",
    )
}

fn registration(role: Role) -> FormSchema {
    let institution_email = FieldDefinition::new(
        "email",
        "University email",
        FieldKind::Email,
        FieldRule::InstitutionEmail,
    );
    let registration_session = FieldDefinition::new(
        "session",
        "Session",
        FieldKind::Text,
        FieldRule::SessionRange { ascending: false },
    );

    let fields = match role {
        Role::Student => vec![
            full_name(),
            department(),
            FieldDefinition::new("rollNo", "Roll number", FieldKind::Text, FieldRule::RollNumber),
            FieldDefinition::new("cgpa", "CGPA", FieldKind::Number, FieldRule::Cgpa)
                .with_constraints(FieldConstraints::bounded(Some(0.0), Some(4.0)).with_step(0.1)),
            FieldDefinition::new(
                "email",
                "University email",
                FieldKind::Email,
                FieldRule::StudentEmail,
            ),
            password(),
            confirm_password(),
            registration_session,
        ],
        Role::Admin => vec![
            full_name(),
            department(),
            username(),
            institution_email,
            password(),
            confirm_password(),
            registration_session,
        ],
        Role::Supervisor => vec![
            full_name(),
            department(),
            username(),
            institution_email,
            password(),
            confirm_password(),
            required_text("domain", "Domain"),
            required_text("designation", "Designation"),
        ],
        Role::Evaluator => vec![
            full_name(),
            department(),
            username(),
            institution_email,
            password(),
            confirm_password(),
            required_text("designation", "Designation"),
        ],
    };

    FormSchema::new(
        FormId::Registration(role),
        fields,
        SuccessBehavior::Reset,
        "Account created successfully.",
        "Registration failed. Please try again.",
    )
}

fn session_policy() -> FormSchema {
    FormSchema::new(
        FormId::SessionPolicy,
        vec![
            session_year(),
            department(),
            FieldDefinition::new(
                "minCGPA",
                "Min CGPA",
                FieldKind::Number,
                FieldRule::Number {
                    integer: false,
                    at_least: None,
                },
            )
            .with_constraints(FieldConstraints::bounded(Some(1.0), Some(4.0)).with_step(0.01))
            .encoded_as(PayloadEncoding::Number),
            integer("minMembers", "Min members", 1.0, None),
            integer(
                "maxMembers",
                "Max members",
                1.0,
                Some(SiblingField::new("minMembers", "Min members")),
            ),
            integer("minGroups", "Min groups per supervisor", 0.0, None),
            integer(
                "maxGroups",
                "Max groups per supervisor",
                0.0,
                Some(SiblingField::new("minGroups", "Min groups")),
            ),
            integer("numEvaluations", "Number of evaluations", 0.0, None),
            weightage("defense1Weightage", "Defense 1 weightage"),
            weightage("defense2Weightage", "Defense 2 weightage"),
        ],
        SuccessBehavior::KeepValues,
        "Session saved successfully.",
        "Failed to save session.",
    )
    .with_extra("status", Value::String("draft".to_owned()))
}

fn session_status() -> FormSchema {
    FormSchema::new(
        FormId::SessionStatus,
        vec![
            session_year(),
            department(),
            FieldDefinition::new("status", "New status", FieldKind::Select, FieldRule::Select)
                .with_options(SESSION_STATUSES)
                .with_default("active"),
        ],
        SuccessBehavior::KeepValues,
        "Session status updated successfully.",
        "Failed to update session status.",
    )
}

fn domain() -> FormSchema {
    FormSchema::new(
        FormId::Domain,
        vec![
            required_text("name", "Domain name").encoded_as(PayloadEncoding::Trimmed),
            FieldDefinition::new(
                "description",
                "Description",
                FieldKind::Text,
                FieldRule::PlainText { min_length: None },
            )
            .optional()
            .encoded_as(PayloadEncoding::Trimmed),
        ],
        SuccessBehavior::Reset,
        "Domain saved successfully.",
        "Failed to save domain.",
    )
}
