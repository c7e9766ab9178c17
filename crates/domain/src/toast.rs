use chrono::{DateTime, Duration, Utc};

/// How long a toast stays visible.
pub const TOAST_DURATION_SECONDS: i64 = 5;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// Operation completed.
    Success,
    /// Operation failed.
    Error,
}

/// Transient status notification with an absolute expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    message: String,
    kind: ToastKind,
    expires_at: DateTime<Utc>,
}

impl Toast {
    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Returns the severity.
    #[must_use]
    pub fn kind(&self) -> ToastKind {
        self.kind
    }

    /// Returns when the toast hides itself.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the toast is still showing at `now`.
    #[must_use]
    pub fn is_visible_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Single-slot toast holder. Showing a toast replaces the previous one and
/// restarts the expiry; hiding happens when the owner calls [`ToastSlot::tick`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastSlot {
    current: Option<Toast>,
}

impl ToastSlot {
    /// Shows a toast, replacing any previous one.
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind, now: DateTime<Utc>) {
        self.current = Some(Toast {
            message: message.into(),
            kind,
            expires_at: now + Duration::seconds(TOAST_DURATION_SECONDS),
        });
    }

    /// Hides an expired toast. Returns `true` when a toast was hidden.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|toast| !toast.is_visible_at(now));
        if expired {
            self.current = None;
        }

        expired
    }

    /// Returns the toast visible at `now`.
    #[must_use]
    pub fn visible(&self, now: DateTime<Utc>) -> Option<&Toast> {
        self.current
            .as_ref()
            .filter(|toast| toast.is_visible_at(now))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::{ToastKind, ToastSlot};

    #[test]
    fn toast_hides_after_five_seconds() {
        let shown_at = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"));
        let mut slot = ToastSlot::default();
        slot.show("Saved.", ToastKind::Success, shown_at);

        assert!(!slot.tick(shown_at + Duration::milliseconds(4_999)));
        assert!(slot.visible(shown_at + Duration::milliseconds(4_999)).is_some());
        assert!(slot.tick(shown_at + Duration::seconds(5)));
        assert!(slot.visible(shown_at + Duration::seconds(5)).is_none());
    }

    #[test]
    fn new_toast_restarts_the_timer() {
        let shown_at = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(|| panic!("test"));
        let mut slot = ToastSlot::default();
        slot.show("First", ToastKind::Success, shown_at);
        slot.show("Second", ToastKind::Error, shown_at + Duration::seconds(3));

        assert!(!slot.tick(shown_at + Duration::seconds(6)));
        let toast = slot
            .visible(shown_at + Duration::seconds(6))
            .unwrap_or_else(|| panic!("test"));
        assert_eq!(toast.message(), "Second");
        assert_eq!(toast.kind(), ToastKind::Error);
        assert!(slot.tick(shown_at + Duration::seconds(8)));
    }
}
