use fypms_core::{AppError, AppResult};
use regex::Regex;
use serde_json::Value;

/// Input control rendered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text input.
    Text,
    /// Email input.
    Email,
    /// Masked password input.
    Password,
    /// Numeric input.
    Number,
    /// Dropdown with fixed options.
    Select,
}

/// Reference to a sibling field used by cross-field rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiblingField {
    name: String,
    label: String,
}

impl SiblingField {
    /// Creates a sibling reference.
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
        }
    }

    /// Returns the sibling field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the sibling label used in messages.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }
}

/// Semantic validation rule. Every form that shares a semantic field type
/// shares the same variant, so a field name validates identically everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRule {
    /// Free text with an optional minimum length.
    PlainText {
        /// Minimum character count after trimming.
        min_length: Option<usize>,
    },
    /// Person name: 2-100 letters, spaces, hyphens, apostrophes, periods.
    FullName,
    /// Any `local@domain.tld` address.
    GenericEmail,
    /// Address on the institution domain.
    InstitutionEmail,
    /// Student address `########-###@<institution domain>`.
    StudentEmail,
    /// Account password.
    Password,
    /// Must equal the sibling password field. Never sent to the backend.
    ConfirmPassword {
        /// Name of the password field being confirmed.
        password_field: String,
    },
    /// University roll number `########-###`.
    RollNumber,
    /// Academic year range `YYYY-YYYY`.
    SessionRange {
        /// Requires the end year to be strictly greater than the start year.
        ascending: bool,
    },
    /// A person's CGPA, bounded by the field constraints.
    Cgpa,
    /// Generic number bounded by the field constraints.
    Number {
        /// Rejects fractional values.
        integer: bool,
        /// Sibling whose current value this field must be greater than or equal to.
        at_least: Option<SiblingField>,
    },
    /// Dropdown; only presence is checked client-side.
    Select,
}

/// Compiled custom format constraint, anchored to the whole value.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    source: String,
    compiled: Regex,
}

impl FieldPattern {
    /// Compiles a pattern.
    pub fn new(pattern: &str) -> AppResult<Self> {
        let compiled = Regex::new(&format!("^(?:{pattern})$"))
            .map_err(|error| AppError::Validation(format!("invalid field pattern: {error}")))?;

        Ok(Self {
            source: pattern.to_owned(),
            compiled,
        })
    }

    /// Returns whether the whole value matches.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.compiled.is_match(value)
    }

    /// Returns the pattern source.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.source.as_str()
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Numeric bounds, step and format constraints attached to a field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConstraints {
    /// Inclusive lower bound for numeric fields.
    pub min: Option<f64>,
    /// Inclusive upper bound for numeric fields.
    pub max: Option<f64>,
    /// Input increment hint for numeric fields.
    pub step: Option<f64>,
    /// Extra format constraint checked after the semantic rule.
    pub pattern: Option<FieldPattern>,
}

impl FieldConstraints {
    /// Creates inclusive numeric bounds.
    #[must_use]
    pub fn bounded(min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            min,
            max,
            ..Self::default()
        }
    }

    /// Sets the step hint.
    #[must_use]
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Adds a format constraint.
    pub fn with_pattern(mut self, pattern: &str) -> AppResult<Self> {
        self.pattern = Some(FieldPattern::new(pattern)?);
        Ok(self)
    }
}

/// How a field value is written into the outgoing payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    /// Sent exactly as typed.
    #[default]
    Raw,
    /// Surrounding whitespace removed.
    Trimmed,
    /// Trimmed and lowercased.
    TrimmedLowercase,
    /// Parsed into a JSON number.
    Number,
}

impl PayloadEncoding {
    /// Encodes a raw input value.
    #[must_use]
    pub fn encode(&self, value: &str) -> Value {
        match self {
            Self::Raw => Value::String(value.to_owned()),
            Self::Trimmed => Value::String(value.trim().to_owned()),
            Self::TrimmedLowercase => Value::String(value.trim().to_lowercase()),
            Self::Number => value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|number| number.is_finite())
                .map(|number| {
                    if number.fract() == 0.0 && number.abs() < 9.0e15 {
                        Value::from(number as i64)
                    } else {
                        Value::from(number)
                    }
                })
                .unwrap_or(Value::Null),
        }
    }
}

/// Static per-form field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    name: String,
    label: String,
    kind: FieldKind,
    required: bool,
    rule: FieldRule,
    constraints: FieldConstraints,
    options: Vec<String>,
    default_value: String,
    encoding: PayloadEncoding,
}

impl FieldDefinition {
    /// Creates a required field.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        kind: FieldKind,
        rule: FieldRule,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: true,
            rule,
            constraints: FieldConstraints::default(),
            options: Vec::new(),
            default_value: String::new(),
            encoding: PayloadEncoding::Raw,
        }
    }

    /// Marks the field as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Attaches constraints.
    #[must_use]
    pub fn with_constraints(mut self, constraints: FieldConstraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Attaches dropdown options.
    #[must_use]
    pub fn with_options(mut self, options: &[&str]) -> Self {
        self.options = options.iter().map(|option| (*option).to_owned()).collect();
        self
    }

    /// Sets the value used when the form mounts or resets.
    #[must_use]
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Sets the payload encoding.
    #[must_use]
    pub fn encoded_as(mut self, encoding: PayloadEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the label.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Returns the input kind.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns whether an empty value is an error once touched.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the semantic rule.
    #[must_use]
    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    /// Returns the constraints.
    #[must_use]
    pub fn constraints(&self) -> &FieldConstraints {
        &self.constraints
    }

    /// Returns dropdown options.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the initial value.
    #[must_use]
    pub fn default_value(&self) -> &str {
        self.default_value.as_str()
    }

    /// Returns the payload encoding.
    #[must_use]
    pub fn encoding(&self) -> PayloadEncoding {
        self.encoding
    }

    /// Returns whether the field only confirms another and is stripped from payloads.
    #[must_use]
    pub fn is_confirmation_only(&self) -> bool {
        matches!(self.rule, FieldRule::ConfirmPassword { .. })
    }
}
