use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::app_error::{AppError, AppResult};
use crate::application::ports::{
    diagnostics::{DiagnosticsSink, EventId, Severity},
    user_directory::{UserDirectoryRepo, UserLookup, UserSearchMode},
};
use crate::domain::entities::{
    directory_role::DirectoryRole,
    directory_user::{ApprovalFlags, DirectoryUser},
    profile_property::ProfileProperty,
};

/// A user together with everything the directory knows about them.
#[derive(Debug, Clone, Serialize)]
pub struct UserDetails {
    pub user: DirectoryUser,
    pub properties: Vec<ProfileProperty>,
    pub roles: Vec<DirectoryRole>,
}

/// Operator-facing directory lookups and user maintenance.
#[derive(Clone)]
pub struct DirectoryUseCases {
    repo: Arc<dyn UserDirectoryRepo>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl DirectoryUseCases {
    pub fn new(repo: Arc<dyn UserDirectoryRepo>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self { repo, diagnostics }
    }

    /// Search users with `mode` and attach profile properties and active roles.
    ///
    /// A failed property or role fetch leaves that part empty for the user.
    #[instrument(skip(self))]
    pub async fn lookup_users_with_details(
        &self,
        pattern: &str,
        mode: UserSearchMode,
    ) -> AppResult<Vec<UserDetails>> {
        let users = self
            .repo
            .lookup_users(pattern, mode)
            .await
            .inspect_err(|err| {
                self.report(
                    &format!(
                        "Error searching for users with query: {} and queryType: {}",
                        pattern, mode
                    ),
                    EventId::LookupUsersFailed,
                    err,
                )
            })?;

        let mut details = Vec::with_capacity(users.len());
        for user in users {
            let properties = self
                .repo
                .get_all_profile_properties(&user)
                .await
                .unwrap_or_else(|err| {
                    self.report(
                        &format!("Error getting user properties for identity: {}", user.identity),
                        EventId::ProfilePropertiesFailed,
                        &err,
                    );
                    vec![]
                });
            let roles = self.repo.get_user_roles(&user).await.unwrap_or_else(|err| {
                self.report(
                    &format!("Error getting roles for user identity: {}", user.identity),
                    EventId::GetUserRolesFailed,
                    &err,
                );
                vec![]
            });
            details.push(UserDetails {
                user,
                properties,
                roles,
            });
        }

        Ok(details)
    }

    /// Record terms-of-use acceptance for an existing user.
    #[instrument(skip(self))]
    pub async fn accept_terms_of_use(&self, identity: &str) -> AppResult<DirectoryUser> {
        let user = self.existing_user(identity).await?;
        self.diagnostics
            .trace(&format!("Accepting TOU for user identity: {}", identity));

        self.repo
            .accept_tou(&user)
            .await
            .inspect_err(|err| {
                self.report(
                    &format!("Error accepting TOU for user identity: {}", identity),
                    EventId::AcceptTouFailed,
                    err,
                )
            })?
            .ok_or(AppError::NotFound)
    }

    /// Overwrite approval flags of an existing user.
    #[instrument(skip(self))]
    pub async fn update_approval(
        &self,
        identity: &str,
        flags: ApprovalFlags,
    ) -> AppResult<DirectoryUser> {
        let mut user = self.existing_user(identity).await?;
        user.apply_flags(flags);

        self.repo.save_user(&user).await.inspect_err(|err| {
            self.report(
                &format!("Error saving user identity: {}", identity),
                EventId::SaveUserFailed,
                err,
            )
        })?;

        Ok(user)
    }

    async fn existing_user(&self, identity: &str) -> AppResult<DirectoryUser> {
        self.repo
            .get_user(identity, UserLookup::READ_ONLY)
            .await
            .inspect_err(|err| {
                self.report(
                    &format!("Error getting user for identity: {}", identity),
                    EventId::GetUserFailed,
                    err,
                )
            })?
            .ok_or(AppError::NotFound)
    }

    fn report(&self, message: &str, event_id: EventId, err: &AppError) {
        self.diagnostics
            .log_message(message, Severity::Error, event_id, Some(err));
    }
}
