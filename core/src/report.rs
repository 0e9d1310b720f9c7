//! User-facing error reporting.
//!
//! # Design
//! `ErrorReporter::report` is the single place failures turn into a
//! notification. An error that ended the session shows a fixed message
//! instead of the backend's text. `ApiError` carries that verdict from the
//! moment the 401 arrived; untyped errors are judged here, and recovery is
//! started for them. Reporting never fails; the raw error is always logged.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{error, warn};

use crate::error::ApiError;
use crate::recovery::SessionRecovery;

pub const SESSION_EXPIRED_MESSAGE: &str = "Your session has expired. Please log in again.";
pub const DEFAULT_ERROR_MESSAGE: &str = "An error occurred. Please try again.";

/// Anything the reporter can classify.
pub trait Reportable: fmt::Debug {
    fn status(&self) -> Option<u16>;
    fn message(&self) -> Option<String>;

    /// `Some` when the error already knows whether it ended the session and
    /// recovery has been taken care of; `None` leaves the decision to the
    /// reporter.
    fn session_expired(&self) -> Option<bool> {
        None
    }
}

impl Reportable for ApiError {
    fn status(&self) -> Option<u16> {
        Some(ApiError::status(self))
    }

    fn message(&self) -> Option<String> {
        Some(ApiError::message(self).to_string())
    }

    fn session_expired(&self) -> Option<bool> {
        Some(ApiError::session_expired(self))
    }
}

/// Untyped error payloads: a `message` field and an optional numeric
/// `status`.
impl Reportable for Value {
    fn status(&self) -> Option<u16> {
        self.get("status")
            .and_then(Value::as_u64)
            .and_then(|status| u16::try_from(status).ok())
    }

    fn message(&self) -> Option<String> {
        self.get("message").map(|message| match message {
            Value::String(message) => message.clone(),
            other => other.to_string(),
        })
    }
}

/// Sink for user-visible failure notifications.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Notifier that only logs.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn error(&self, message: &str) {
        warn!(target: "notification", "{message}");
    }
}

pub struct ErrorReporter {
    notifier: Arc<dyn Notifier>,
    recovery: Arc<SessionRecovery>,
}

impl ErrorReporter {
    pub fn new(notifier: Arc<dyn Notifier>, recovery: Arc<SessionRecovery>) -> Self {
        Self { notifier, recovery }
    }

    /// Log `err` and notify the user. `fallback` replaces a missing message;
    /// without one the generic default is shown.
    pub fn report(&self, err: &dyn Reportable, fallback: Option<&str>) {
        error!(error = ?err, "operation failed");

        let expired = match err.session_expired() {
            Some(expired) => expired,
            None if err.status() == Some(401) && !self.recovery.on_login_section() => {
                let _ = self.recovery.spawn();
                true
            }
            None => false,
        };
        if expired {
            self.notifier.error(SESSION_EXPIRED_MESSAGE);
            return;
        }

        let message = err
            .message()
            .unwrap_or_else(|| fallback.unwrap_or(DEFAULT_ERROR_MESSAGE).to_string());
        self.notifier.error(&message);
    }
}
