use std::sync::Arc;

use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::helpers::attribute_query::{
    AttributeQuery, GetIdentityRequest, LogClaimRequest, SetRolesInactiveRequest,
};
use crate::application::ports::{
    diagnostics::{DiagnosticsSink, EventId, Severity},
    user_directory::{UserDirectoryRepo, UserLookup},
};

/// Rows of string columns returned to the attribute store host.
pub type AttributeTable = Vec<Vec<String>>;

/// Dispatcher for attribute store queries.
///
/// Only malformed input (`AppError::QueryFormat`) crosses this boundary.
/// Repository failures and unusable parameters are logged and reported as
/// "no output".
#[derive(Clone)]
pub struct AttributeStoreUseCases {
    repo: Arc<dyn UserDirectoryRepo>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl AttributeStoreUseCases {
    pub fn new(repo: Arc<dyn UserDirectoryRepo>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self { repo, diagnostics }
    }

    /// Execute one raw query. `Ok(None)` means no output table.
    #[instrument(skip(self, parameters))]
    pub async fn execute_query(
        &self,
        command: Option<&str>,
        parameters: Option<&[String]>,
    ) -> AppResult<Option<AttributeTable>> {
        let first_parameter = parameters
            .and_then(|p| p.first())
            .map(String::as_str)
            .unwrap_or_default();
        self.diagnostics.trace(&format!(
            "ExecuteQuery: {}\nParameters: {}",
            command.unwrap_or_default(),
            first_parameter
        ));

        let query = match AttributeQuery::parse(command, parameters) {
            Ok(query) => query,
            Err(err @ AppError::QueryFormat(_)) => {
                let event_id = if command.is_none_or(str::is_empty) {
                    EventId::MissingQuery
                } else {
                    EventId::MissingParameters
                };
                self.diagnostics
                    .log_message(&err.to_string(), Severity::Error, event_id, None);
                return Err(err);
            }
            Err(err) => {
                self.report("Error parsing attribute store query", EventId::QueryFailed, &err);
                return Ok(None);
            }
        };

        Ok(self.dispatch(query).await)
    }

    async fn dispatch(&self, query: AttributeQuery) -> Option<AttributeTable> {
        match query {
            AttributeQuery::GetIdentity(request) => self.get_identity(request).await,
            AttributeQuery::LogClaim(request) => {
                self.log_claim(request).await;
                None
            }
            AttributeQuery::SetRolesInactive(request) => {
                self.set_roles_inactive(request).await;
                None
            }
            AttributeQuery::Unsupported => None,
        }
    }

    async fn get_identity(&self, request: GetIdentityRequest) -> Option<AttributeTable> {
        match self.repo.get_user(&request.identity, UserLookup::LOGIN).await {
            Ok(Some(user)) => match request.project(&user) {
                Some(row) => Some(vec![row]),
                None => {
                    self.diagnostics.log_message(
                        &format!(
                            "GetIdentity for identity: {} has no ';' separated field list",
                            request.identity
                        ),
                        Severity::Error,
                        EventId::QueryFailed,
                        None,
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                self.report(
                    &format!("Error getting user for identity: {}", request.identity),
                    EventId::GetUserFailed,
                    &err,
                );
                None
            }
        }
    }

    async fn log_claim(&self, request: LogClaimRequest) {
        self.diagnostics.trace(&format!(
            "Logging claim for identity: {} with ClaimType: {} and ClaimValue: {}",
            request.identity, request.claim_type, request.claim_value
        ));
        if let Err(err) = self
            .repo
            .log_claim(&request.identity, &request.claim_type, &request.claim_value)
            .await
        {
            self.report(
                &format!(
                    "Error logging claim for identity: {} with ClaimType: {} and ClaimValue: {}",
                    request.identity, request.claim_type, request.claim_value
                ),
                EventId::LogClaimFailed,
                &err,
            );
        }
    }

    async fn set_roles_inactive(&self, request: SetRolesInactiveRequest) {
        let user = match self.repo.get_user(&request.identity, UserLookup::READ_ONLY).await {
            Ok(Some(user)) => user,
            Ok(None) => return,
            Err(err) => {
                self.report(
                    &format!("Error getting user for identity: {}", request.identity),
                    EventId::GetUserFailed,
                    &err,
                );
                return;
            }
        };

        match self.repo.set_roles_inactive(&user).await {
            Ok(true) => {}
            Ok(false) => self.diagnostics.log_message(
                &format!("Roles were not set inactive for user identity: {}", user.identity),
                Severity::Warning,
                EventId::SetRolesInactiveFailed,
                None,
            ),
            Err(err) => self.report(
                &format!("Error setting roles inactive for user identity: {}", user.identity),
                EventId::SetRolesInactiveFailed,
                &err,
            ),
        }
    }

    fn report(&self, message: &str, event_id: EventId, err: &AppError) {
        self.diagnostics
            .log_message(message, Severity::Error, event_id, Some(err));
    }
}
