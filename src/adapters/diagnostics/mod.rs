//! Diagnostics sinks: structured `tracing` events, optionally mirrored into
//! the repository's message log.

use tracing::Level;

use crate::{
    adapters::persistence::{PostgresPersistence, message_log::LogEntry},
    application::ports::diagnostics::{DiagnosticsSink, EventId, Severity},
};

fn level_for(severity: Severity) -> Level {
    match severity {
        Severity::Error | Severity::FailureAudit => Level::ERROR,
        Severity::Warning => Level::WARN,
        Severity::Information | Severity::SuccessAudit => Level::INFO,
    }
}

/// Error text and the text of its immediate cause, empty when absent.
fn describe_error(error: Option<&(dyn std::error::Error + 'static)>) -> (String, String) {
    match error {
        Some(err) => (
            err.to_string(),
            err.source().map(|s| s.to_string()).unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics {
    verbose: bool,
}

impl TracingDiagnostics {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl DiagnosticsSink for TracingDiagnostics {
    fn log_message(
        &self,
        message: &str,
        severity: Severity,
        event_id: EventId,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        let (error, cause) = describe_error(error);
        let code = event_id.code();
        let level = level_for(severity);
        if level == Level::ERROR {
            tracing::error!(
                event_id = code,
                severity = %severity,
                error = %error,
                cause = %cause,
                "{message}"
            );
        } else if level == Level::WARN {
            tracing::warn!(
                event_id = code,
                severity = %severity,
                error = %error,
                cause = %cause,
                "{message}"
            );
        } else {
            tracing::info!(event_id = code, severity = %severity, "{message}");
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Writes every record through `TracingDiagnostics` and also persists it with
/// the `log_message` routine on a detached task. Persistence failures are
/// dropped.
#[derive(Clone)]
pub struct PersistentDiagnostics {
    inner: TracingDiagnostics,
    persistence: PostgresPersistence,
    server: String,
}

impl PersistentDiagnostics {
    pub fn new(inner: TracingDiagnostics, persistence: PostgresPersistence, server: String) -> Self {
        Self {
            inner,
            persistence,
            server,
        }
    }
}

impl DiagnosticsSink for PersistentDiagnostics {
    fn log_message(
        &self,
        message: &str,
        severity: Severity,
        event_id: EventId,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        self.inner.log_message(message, severity, event_id, error);

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::debug!(event_id = event_id.code(), "No runtime, message log skipped");
            return;
        };

        let (error_message, error_source) = describe_error(error);
        let entry = LogEntry {
            message: message.to_string(),
            severity: severity.to_string(),
            server: self.server.clone(),
            event_id: event_id.code(),
            error_message,
            error_source,
        };
        let persistence = self.persistence.clone();
        handle.spawn(async move {
            if let Err(err) = persistence.write_log_entry(&entry).await {
                tracing::debug!(error = %err, event_id = entry.event_id, "Message log write failed");
            }
        });
    }

    fn is_verbose(&self) -> bool {
        self.inner.is_verbose()
    }
}
