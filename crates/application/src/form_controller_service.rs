//! Form State Controller.
//!
//! Owns the values, touched set and submission outcome of one form instance.
//! Field errors are derived from the validator on demand; only the submit
//! banner, focus target, in-flight flag and toast are stored.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use fypms_core::{AppError, AppResult};
use fypms_domain::{
    FieldError, FormId, FormSchema, FormValues, SuccessBehavior, Toast, ToastKind, ToastSlot,
    TouchedSet, validate_all, validate_field,
};

use crate::{Clock, server_message};

mod portal_action;

pub use portal_action::PortalSubmitAction;

/// Banner shown when a submit attempt fails validation.
pub const FIX_ERRORS_MESSAGE: &str = "Please fix the errors below.";

/// Port the controller submits through.
#[async_trait]
pub trait SubmitAction: Send + Sync {
    /// Sends the payload of `form` and returns the response body.
    async fn submit(
        &self,
        form: FormId,
        editing_id: Option<&str>,
        payload: Value,
    ) -> AppResult<Value>;
}

/// Result of [`FormController::begin_submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitAttempt {
    /// A submit is already in flight; nothing happened.
    Rejected,
    /// Validation failed; `focus` is the first field with an error.
    Invalid {
        /// Field that receives focus.
        focus: String,
    },
    /// Validation passed; the payload is ready to send.
    Ready(Value),
}

/// Final outcome of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Re-entrant attempt ignored.
    Rejected,
    /// Blocked by field errors.
    Invalid,
    /// Server accepted the submit.
    Succeeded,
    /// Submit failed; the message went to the toast.
    Failed,
    /// Session expired; the global redirect took over.
    SessionExpired,
}

/// Per-form controller.
pub struct FormController {
    schema: FormSchema,
    values: FormValues,
    touched: TouchedSet,
    banner: Option<String>,
    focus_target: Option<String>,
    in_flight: bool,
    toast: ToastSlot,
    editing_id: Option<String>,
    clock: Arc<dyn Clock>,
}

impl FormController {
    /// Mounts a form with its initial values.
    #[must_use]
    pub fn new(schema: FormSchema, clock: Arc<dyn Clock>) -> Self {
        let values = FormValues::initial(schema.fields());

        Self {
            schema,
            values,
            touched: TouchedSet::new(),
            banner: None,
            focus_target: None,
            in_flight: false,
            toast: ToastSlot::default(),
            editing_id: None,
            clock,
        }
    }

    /// Mounts a catalogue form.
    #[must_use]
    pub fn for_form(form: FormId, clock: Arc<dyn Clock>) -> Self {
        Self::new(FormSchema::for_form(form), clock)
    }

    /// Pre-fills the form to edit an existing record.
    pub fn edit(&mut self, id: impl Into<String>, values: &[(&str, &str)]) {
        self.reset();
        for (name, value) in values {
            self.values.set(*name, *value);
        }
        self.editing_id = Some(id.into());
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Returns the current values.
    #[must_use]
    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Returns the record being edited, if any.
    #[must_use]
    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    /// Updates a value and clears the submit banner.
    pub fn change(&mut self, name: &str, value: impl Into<String>) {
        self.values.set(name, value);
        self.banner = None;
    }

    /// Marks a field touched.
    pub fn blur(&mut self, name: &str) {
        self.touched.mark(name);
    }

    /// Returns the current error of one field.
    #[must_use]
    pub fn field_error(&self, name: &str) -> Option<String> {
        self.schema
            .field(name)
            .and_then(|field| validate_field(field, &self.values, &self.touched))
    }

    /// Returns all current field errors in definition order.
    #[must_use]
    pub fn errors(&self) -> Vec<FieldError> {
        validate_all(self.schema.fields(), &self.values, &self.touched)
    }

    /// Returns the submit banner.
    #[must_use]
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Takes the pending focus request. Each failed submit yields it once.
    pub fn take_focus_target(&mut self) -> Option<String> {
        self.focus_target.take()
    }

    /// Returns whether a submit is outstanding.
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Returns the toast visible now.
    #[must_use]
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.visible(self.clock.now())
    }

    /// Hides an expired toast. Returns `true` when one was hidden.
    pub fn tick(&mut self) -> bool {
        self.toast.tick(self.clock.now())
    }

    /// Clears values, touched fields, banner and edit target.
    pub fn reset(&mut self) {
        self.values = FormValues::initial(self.schema.fields());
        self.touched.clear();
        self.banner = None;
        self.focus_target = None;
        self.editing_id = None;
    }

    /// Validates everything with all fields touched. On success marks the
    /// form in flight and returns the outgoing payload.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        if self.in_flight {
            return SubmitAttempt::Rejected;
        }

        self.touched = TouchedSet::all(self.schema.fields());
        if let Some(first) = self.errors().into_iter().next() {
            self.banner = Some(FIX_ERRORS_MESSAGE.to_owned());
            self.focus_target = Some(first.field.clone());
            return SubmitAttempt::Invalid { focus: first.field };
        }

        self.banner = None;
        self.focus_target = None;
        self.in_flight = true;
        SubmitAttempt::Ready(Value::Object(self.schema.payload(&self.values)))
    }

    /// Converts the server result into toast and form state and always
    /// clears the in-flight flag.
    pub fn finish_submit(&mut self, result: AppResult<Value>) -> SubmitOutcome {
        self.in_flight = false;
        let now = self.clock.now();

        match result {
            Ok(body) => {
                let message = server_message(&body)
                    .unwrap_or_else(|| self.schema.success_message().to_owned());
                self.toast.show(message, ToastKind::Success, now);
                if self.schema.on_success() == SuccessBehavior::Reset {
                    self.reset();
                }
                info!(form = ?self.schema.id(), "form submitted");
                SubmitOutcome::Succeeded
            }
            Err(AppError::SessionExpired(_)) => {
                warn!(form = ?self.schema.id(), "form submit interrupted by expired session");
                SubmitOutcome::SessionExpired
            }
            Err(error) => {
                warn!(form = ?self.schema.id(), error = %error, "form submit failed");
                let message = failure_message(&error, self.schema.failure_message());
                self.toast.show(message, ToastKind::Error, now);
                SubmitOutcome::Failed
            }
        }
    }

    /// Runs one full submit through `action`.
    pub async fn submit(&mut self, action: &dyn SubmitAction) -> SubmitOutcome {
        let payload = match self.begin_submit() {
            SubmitAttempt::Rejected => return SubmitOutcome::Rejected,
            SubmitAttempt::Invalid { .. } => return SubmitOutcome::Invalid,
            SubmitAttempt::Ready(payload) => payload,
        };

        let result = action
            .submit(self.schema.id(), self.editing_id.as_deref(), payload)
            .await;
        self.finish_submit(result)
    }
}

/// Picks the user-facing text of a failed request: the server or transport
/// message when there is one, else `fallback`.
#[must_use]
pub fn failure_message(error: &AppError, fallback: &str) -> String {
    let message = error.message().trim();
    if message.is_empty() {
        fallback.to_owned()
    } else {
        message.to_owned()
    }
}

#[cfg(test)]
mod tests;
