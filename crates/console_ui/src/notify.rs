//! Notification area shared by the controllers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NotificationKind::Info => "info",
            NotificationKind::Warning => "warning",
            NotificationKind::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// Receives transient alerts; the toolkit adapter decides how they look.
pub trait NotificationSink {
    fn notify(&mut self, kind: NotificationKind, message: &str);
}

/// In-memory alert list, drained by whoever renders it.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.entries)
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&mut self, kind: NotificationKind, message: &str) {
        tracing::debug!(%kind, message, "notification posted");
        self.entries.push(Notification {
            kind,
            message: message.to_string(),
        });
    }
}
