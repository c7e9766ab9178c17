//! Domain types for the project-management portal: field rules, form state,
//! form catalogue, group proposals and role navigation.

#![forbid(unsafe_code)]

mod academic;
mod field;
mod form_state;
mod forms;
mod group;
mod navigation;
mod toast;
mod validation;

pub use academic::SessionStatus;
pub use field::{
    FieldConstraints, FieldDefinition, FieldKind, FieldPattern, FieldRule, PayloadEncoding,
    SiblingField,
};
pub use form_state::{FormValues, TouchedSet};
pub use forms::{DEPARTMENTS, FormId, FormSchema, SESSION_STATUSES, SuccessBehavior};
pub use group::{
    DEFAULT_MAX_MEMBERS, GroupProposal, GroupSubmission, IDEA_NAME_MIN_LENGTH, MemberLimits,
};
pub use navigation::{
    DashboardSection, NavLink, Route, display_initials, navbar_links, sidebar_links,
};
pub use toast::{TOAST_DURATION_SECONDS, Toast, ToastKind, ToastSlot};
pub use validation::{
    FULL_NAME_MAX_LENGTH, FULL_NAME_MIN_LENGTH, FieldError, INSTITUTION_EMAIL_DOMAIN,
    PASSWORD_MIN_LENGTH, REQUIRED_MESSAGE, is_email_shape, is_roll_number, is_student_email,
    parse_number, parse_year_range, validate_all, validate_field,
};
