//! Diagnostics hook used by the dispatcher and the claims provider.
//!
//! Sinks are fire-and-forget: `log_message` returns nothing and a sink must
//! never panic or surface its own failures to the caller.

use strum::{AsRefStr, Display};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Severity {
    Error,
    FailureAudit,
    Information,
    SuccessAudit,
    Warning,
}

/// Stable event ids recorded with each diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum EventId {
    Trace,
    Configuration,
    GetUserFailed,
    MissingQuery,
    MissingParameters,
    QueryFailed,
    GetUserRolesFailed,
    IdentityClaimTypeFailed,
    RoleClaimTypeFailed,
    GetAllRolesFailed,
    AcceptTouFailed,
    SetRolesInactiveFailed,
    SaveUserFailed,
    LogClaimFailed,
    ProfilePropertiesFailed,
    LookupUsersFailed,
    IssuerLookupFailed,
    InvalidIdentityClaimType,
}

impl EventId {
    pub fn code(&self) -> i32 {
        match self {
            EventId::Trace => 1,
            EventId::Configuration => 3,
            EventId::GetUserFailed => 1001,
            EventId::MissingQuery => 1002,
            EventId::MissingParameters => 1003,
            EventId::QueryFailed => 1004,
            EventId::GetUserRolesFailed => 1005,
            EventId::IdentityClaimTypeFailed => 1006,
            EventId::RoleClaimTypeFailed => 1007,
            EventId::GetAllRolesFailed => 1008,
            EventId::AcceptTouFailed => 1009,
            EventId::SetRolesInactiveFailed => 1010,
            EventId::SaveUserFailed => 1011,
            EventId::LogClaimFailed => 1012,
            EventId::ProfilePropertiesFailed => 1013,
            EventId::LookupUsersFailed => 1014,
            EventId::IssuerLookupFailed => 2001,
            EventId::InvalidIdentityClaimType => 2003,
        }
    }
}

pub trait DiagnosticsSink: Send + Sync {
    fn log_message(
        &self,
        message: &str,
        severity: Severity,
        event_id: EventId,
        error: Option<&(dyn std::error::Error + 'static)>,
    );

    /// Whether verbose trace records should be emitted.
    fn is_verbose(&self) -> bool;

    /// Emit an informational trace record, only when verbose logging is on.
    fn trace(&self, message: &str) {
        if self.is_verbose() {
            self.log_message(message, Severity::Information, EventId::Trace, None);
        }
    }
}
