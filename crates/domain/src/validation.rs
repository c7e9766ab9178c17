//! Field Validator.
//!
//! Pure functions mapping a field definition, the current form values and the
//! touched set to an optional error message. Rules are looked up by the
//! field's semantic [`FieldRule`], never by the form it appears in.

use crate::{FieldDefinition, FieldRule, FormValues, TouchedSet};

/// Email domain accepted for institution and student addresses.
pub const INSTITUTION_EMAIL_DOMAIN: &str = "uog.edu.pk";

/// Minimum password length for every portal account.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Minimum full name length.
pub const FULL_NAME_MIN_LENGTH: usize = 2;

/// Maximum full name length.
pub const FULL_NAME_MAX_LENGTH: usize = 100;

/// Message shown for a touched, empty, required field.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// A field-scoped validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the error belongs to.
    pub field: String,
    /// Message rendered under the input.
    pub message: String,
}

/// Validates one field against the current values.
///
/// Untouched empty fields never produce an error; touched empty required
/// fields always produce [`REQUIRED_MESSAGE`]. Format rules only run on
/// non-empty values.
#[must_use]
pub fn validate_field(
    field: &FieldDefinition,
    values: &FormValues,
    touched: &TouchedSet,
) -> Option<String> {
    let raw = values.get(field.name());
    let value = raw.trim();

    if value.is_empty() {
        return (field.is_required() && touched.contains(field.name()))
            .then(|| REQUIRED_MESSAGE.to_owned());
    }

    if let Some(message) = check_rule(field, raw, value, values) {
        return Some(message);
    }

    field
        .constraints()
        .pattern
        .as_ref()
        .filter(|pattern| !pattern.matches(value))
        .map(|_| format!("{} has an invalid format.", field.label()))
}

/// Validates every field in definition order.
#[must_use]
pub fn validate_all(
    fields: &[FieldDefinition],
    values: &FormValues,
    touched: &TouchedSet,
) -> Vec<FieldError> {
    fields
        .iter()
        .filter_map(|field| {
            validate_field(field, values, touched).map(|message| FieldError {
                field: field.name().to_owned(),
                message,
            })
        })
        .collect()
}

fn check_rule(
    field: &FieldDefinition,
    raw: &str,
    value: &str,
    values: &FormValues,
) -> Option<String> {
    let constraints = field.constraints();

    match field.rule() {
        FieldRule::PlainText { min_length } => min_length
            .filter(|min| value.chars().count() < *min)
            .map(|min| format!("Enter at least {min} characters.")),
        FieldRule::FullName => validate_full_name(value),
        FieldRule::GenericEmail => {
            (!is_email_shape(value)).then(|| "Enter a valid email address.".to_owned())
        }
        FieldRule::InstitutionEmail => validate_institution_email(value),
        FieldRule::StudentEmail => (!is_student_email(value)).then(|| {
            format!(
                "Email must be like 21011519-085@{INSTITUTION_EMAIL_DOMAIN} (8 digits, hyphen, 3 digits)."
            )
        }),
        FieldRule::Password => (value.chars().count() < PASSWORD_MIN_LENGTH)
            .then(|| format!("Password must be at least {PASSWORD_MIN_LENGTH} characters.")),
        FieldRule::ConfirmPassword { password_field } => {
            (raw != values.get(password_field)).then(|| "Passwords do not match.".to_owned())
        }
        FieldRule::RollNumber => (!is_roll_number(value)).then(|| {
            "Roll number must be like 21011519-085 (8 digits, hyphen, 3 digits).".to_owned()
        }),
        FieldRule::SessionRange { ascending } => validate_session_range(value, *ascending),
        FieldRule::Cgpa => validate_cgpa(value, constraints.min, constraints.max),
        FieldRule::Number { integer, at_least } => {
            let label = field.label();
            let Some(number) = parse_number(value) else {
                return Some(format!("{label} must be a number."));
            };

            if *integer && number.fract() != 0.0 {
                return Some(format!("{label} must be a whole number."));
            }
            if let Some(min) = constraints.min.filter(|min| number < *min) {
                return Some(format!("{label} must be at least {min}."));
            }
            if let Some(max) = constraints.max.filter(|max| number > *max) {
                return Some(format!("{label} must be at most {max}."));
            }

            at_least.as_ref().and_then(|sibling| {
                parse_number(values.get(sibling.name()).trim())
                    .filter(|lower| number < *lower)
                    .map(|_| format!("{label} must be ≥ {}.", sibling.label().to_lowercase()))
            })
        }
        FieldRule::Select => None,
    }
}

fn validate_full_name(value: &str) -> Option<String> {
    let length = value.chars().count();
    if length < FULL_NAME_MIN_LENGTH {
        return Some(format!("Enter at least {FULL_NAME_MIN_LENGTH} characters."));
    }
    if length > FULL_NAME_MAX_LENGTH {
        return Some("Name is too long.".to_owned());
    }

    let allowed = value.chars().all(|character| {
        character.is_alphabetic()
            || character.is_whitespace()
            || matches!(character, '-' | '\'' | '.')
    });
    (!allowed).then(|| "Use only letters, spaces, hyphens, apostrophes and periods.".to_owned())
}

fn validate_institution_email(value: &str) -> Option<String> {
    if !is_email_shape(value) {
        return Some("Enter a valid email address.".to_owned());
    }

    let on_institution_domain = value
        .rsplit_once('@')
        .is_some_and(|(_, domain)| domain.eq_ignore_ascii_case(INSTITUTION_EMAIL_DOMAIN));
    (!on_institution_domain).then(|| format!("Email must be from @{INSTITUTION_EMAIL_DOMAIN}."))
}

fn validate_session_range(value: &str, ascending: bool) -> Option<String> {
    let Some((start, end)) = parse_year_range(value) else {
        return Some("Session must be like 2021-2025 (YYYY-YYYY).".to_owned());
    };

    (ascending && end <= start).then(|| "End year must be greater than start year.".to_owned())
}

fn validate_cgpa(value: &str, min: Option<f64>, max: Option<f64>) -> Option<String> {
    let min = min.unwrap_or(0.0);
    let max = max.unwrap_or(4.0);

    match parse_number(value) {
        None => Some(format!("Enter a valid number ({min} to {max}).")),
        Some(cgpa) if cgpa < min || cgpa > max => {
            Some(format!("CGPA must be between {min} and {max}."))
        }
        Some(_) => None,
    }
}

/// Parses a finite decimal number.
#[must_use]
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}

/// Parses a `YYYY-YYYY` academic year range into its start and end years.
#[must_use]
pub fn parse_year_range(value: &str) -> Option<(u16, u16)> {
    let (start, end) = value.split_once('-')?;
    if !is_ascii_digits(start, 4) || !is_ascii_digits(end, 4) {
        return None;
    }

    Some((start.parse().ok()?, end.parse().ok()?))
}

/// Returns whether the value has the generic `local@domain.tld` shape.
#[must_use]
pub fn is_email_shape(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(index, character)| character == '.' && index > 0 && index + 1 < domain.len())
}

/// Returns whether the value is a roll number `########-###`.
#[must_use]
pub fn is_roll_number(value: &str) -> bool {
    value
        .split_once('-')
        .is_some_and(|(left, right)| is_ascii_digits(left, 8) && is_ascii_digits(right, 3))
}

/// Returns whether the value is a student address on the institution domain.
#[must_use]
pub fn is_student_email(value: &str) -> bool {
    value.split_once('@').is_some_and(|(local, domain)| {
        is_roll_number(local) && domain.eq_ignore_ascii_case(INSTITUTION_EMAIL_DOMAIN)
    })
}

fn is_ascii_digits(value: &str, width: usize) -> bool {
    value.len() == width && value.bytes().all(|byte| byte.is_ascii_digit())
}
