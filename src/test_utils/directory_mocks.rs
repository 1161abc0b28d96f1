//! In-memory doubles for the user directory, diagnostics and issuer ports.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        diagnostics::{DiagnosticsSink, EventId, Severity},
        issuer::IssuerNameProvider,
        user_directory::{UserDirectoryRepo, UserLookup, UserSearchMode},
    },
    domain::entities::{
        directory_role::DirectoryRole, directory_user::DirectoryUser,
        profile_property::ProfileProperty,
    },
};

// ============================================================================
// User Directory
// ============================================================================

#[derive(Debug, Clone)]
pub struct RoleAssignment {
    pub identity: String,
    pub role: DirectoryRole,
    pub active: bool,
}

/// In-memory implementation of `UserDirectoryRepo` for testing.
///
/// Users are returned in insertion order. The `fail_*` switches make the
/// matching operations return `AppError::Database`.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    pub users: Mutex<Vec<DirectoryUser>>,
    pub assignments: Mutex<Vec<RoleAssignment>>,
    pub unassigned_roles: Mutex<Vec<String>>,
    pub properties: Mutex<Vec<(String, ProfileProperty)>>,
    pub claims: Mutex<Vec<(String, String, String)>>,
    identity_claim_type: Mutex<Option<String>>,
    role_claim_type: Mutex<Option<String>>,
    identity_claim_type_fetches: AtomicUsize,
    role_claim_type_fetches: AtomicUsize,
    user_lookups: AtomicUsize,
    fail_users: AtomicBool,
    fail_roles: AtomicBool,
    fail_claim_types: AtomicBool,
    fail_properties: AtomicBool,
    refuse_provisioning: AtomicBool,
    reject_role_deactivation: AtomicBool,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_claim_types(identity: &str, role: &str) -> Self {
        let repo = Self::new();
        repo.set_claim_types(identity, role);
        repo
    }

    /// Seed a user; ids are assigned sequentially.
    pub fn with_user(self, mut user: DirectoryUser) -> Self {
        {
            let mut users = self.users.lock().unwrap();
            user.id = users.len() as i32 + 1;
            users.push(user);
        }
        self
    }

    /// Assign an active role to a seeded user.
    pub fn with_role(self, identity: &str, mut role: DirectoryRole) -> Self {
        {
            let mut assignments = self.assignments.lock().unwrap();
            role.id = assignments.len() as i32 + 1;
            assignments.push(RoleAssignment {
                identity: identity.to_string(),
                role,
                active: true,
            });
        }
        self
    }

    /// Register a role name that nobody holds.
    pub fn with_role_name(self, name: &str) -> Self {
        self.unassigned_roles.lock().unwrap().push(name.to_string());
        self
    }

    pub fn with_property(self, identity: &str, property: ProfileProperty) -> Self {
        self.properties
            .lock()
            .unwrap()
            .push((identity.to_string(), property));
        self
    }

    pub fn set_claim_types(&self, identity: &str, role: &str) {
        *self.identity_claim_type.lock().unwrap() = Some(identity.to_string());
        *self.role_claim_type.lock().unwrap() = Some(role.to_string());
    }

    pub fn fail_users(&self, fail: bool) {
        self.fail_users.store(fail, Ordering::SeqCst);
    }

    pub fn fail_roles(&self, fail: bool) {
        self.fail_roles.store(fail, Ordering::SeqCst);
    }

    pub fn fail_claim_types(&self, fail: bool) {
        self.fail_claim_types.store(fail, Ordering::SeqCst);
    }

    pub fn fail_properties(&self, fail: bool) {
        self.fail_properties.store(fail, Ordering::SeqCst);
    }

    /// Unknown identities are not created even when the lookup asks for it.
    pub fn refuse_provisioning(&self, refuse: bool) {
        self.refuse_provisioning.store(refuse, Ordering::SeqCst);
    }

    /// `set_roles_inactive` reports that nothing was deactivated.
    pub fn reject_role_deactivation(&self, reject: bool) {
        self.reject_role_deactivation.store(reject, Ordering::SeqCst);
    }

    pub fn identity_claim_type_fetches(&self) -> usize {
        self.identity_claim_type_fetches.load(Ordering::SeqCst)
    }

    pub fn role_claim_type_fetches(&self) -> usize {
        self.role_claim_type_fetches.load(Ordering::SeqCst)
    }

    /// Number of `get_user` and `lookup_users` calls.
    pub fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    /// Get a stored user (for test assertions).
    pub fn find(&self, identity: &str) -> Option<DirectoryUser> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.identity.eq_ignore_ascii_case(identity))
            .cloned()
    }

    pub fn logged_claims(&self) -> Vec<(String, String, String)> {
        self.claims.lock().unwrap().clone()
    }

    fn check(&self, switch: &AtomicBool) -> AppResult<()> {
        if switch.load(Ordering::SeqCst) {
            Err(AppError::Database("simulated repository failure".into()))
        } else {
            Ok(())
        }
    }
}

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl UserDirectoryRepo for InMemoryUserDirectory {
    async fn get_user(
        &self,
        identity: &str,
        lookup: UserLookup,
    ) -> AppResult<Option<DirectoryUser>> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_users)?;

        let mut users = self.users.lock().unwrap();
        let position = users
            .iter()
            .position(|u| u.identity.eq_ignore_ascii_case(identity));
        let create = lookup.create_if_absent && !self.refuse_provisioning.load(Ordering::SeqCst);
        let index = match (position, create) {
            (Some(index), _) => index,
            (None, true) => {
                let created = DirectoryUser {
                    id: users.len() as i32 + 1,
                    identity: identity.to_string(),
                    display_name: String::new(),
                    email: String::new(),
                    is_approved: false,
                    is_security_approved: false,
                    is_tou_accepted: false,
                    created_at: Some(now()),
                    tou_accepted_at: None,
                    last_modified_at: Some(now()),
                    last_login_at: None,
                    login_count: 0,
                };
                users.push(created);
                users.len() - 1
            }
            (None, false) => return Ok(None),
        };

        let user = &mut users[index];
        if lookup.is_login {
            user.login_count += 1;
            user.last_login_at = Some(now());
        }
        Ok(Some(user.clone()))
    }

    async fn get_user_roles(&self, user: &DirectoryUser) -> AppResult<Vec<DirectoryRole>> {
        self.check(&self.fail_roles)?;
        Ok(self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .filter(|a| a.active && a.identity.eq_ignore_ascii_case(&user.identity))
            .map(|a| a.role.clone())
            .collect())
    }

    async fn get_all_roles(&self) -> AppResult<Vec<String>> {
        self.check(&self.fail_roles)?;
        let mut names: Vec<String> = Vec::new();
        let assigned = self
            .assignments
            .lock()
            .unwrap()
            .iter()
            .map(|a| a.role.role_name.clone())
            .collect::<Vec<_>>();
        let unassigned = self.unassigned_roles.lock().unwrap().clone();
        for name in assigned.into_iter().chain(unassigned) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Ok(names)
    }

    async fn set_roles_inactive(&self, user: &DirectoryUser) -> AppResult<bool> {
        self.check(&self.fail_users)?;
        if self.reject_role_deactivation.load(Ordering::SeqCst) {
            return Ok(false);
        }
        for assignment in self
            .assignments
            .lock()
            .unwrap()
            .iter_mut()
            .filter(|a| a.identity.eq_ignore_ascii_case(&user.identity))
        {
            assignment.active = false;
        }
        Ok(true)
    }

    async fn log_claim(&self, identity: &str, claim_type: &str, claim_value: &str) -> AppResult<()> {
        self.check(&self.fail_users)?;
        self.claims.lock().unwrap().push((
            identity.to_string(),
            claim_type.to_string(),
            claim_value.to_string(),
        ));
        Ok(())
    }

    async fn get_identity_claim_type(&self) -> AppResult<Option<String>> {
        self.identity_claim_type_fetches
            .fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_claim_types)?;
        Ok(self.identity_claim_type.lock().unwrap().clone())
    }

    async fn get_role_claim_type(&self) -> AppResult<Option<String>> {
        self.role_claim_type_fetches.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_claim_types)?;
        Ok(self.role_claim_type.lock().unwrap().clone())
    }

    async fn lookup_users(
        &self,
        pattern: &str,
        mode: UserSearchMode,
    ) -> AppResult<Vec<DirectoryUser>> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.check(&self.fail_users)?;

        let pattern = pattern.trim();
        let properties = self.properties.lock().unwrap().clone();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| match mode {
                UserSearchMode::AllUserFieldsContains => {
                    contains_ignore_case(&u.identity, pattern)
                        || contains_ignore_case(&u.display_name, pattern)
                        || contains_ignore_case(&u.email, pattern)
                }
                UserSearchMode::DisplayNameContains => contains_ignore_case(&u.display_name, pattern),
                UserSearchMode::IdentityContains => contains_ignore_case(&u.identity, pattern),
                UserSearchMode::ProfilePropertyValuesContains => properties.iter().any(|(id, p)| {
                    id.eq_ignore_ascii_case(&u.identity) && contains_ignore_case(&p.value, pattern)
                }),
            })
            .cloned()
            .collect())
    }

    async fn get_all_profile_properties(
        &self,
        user: &DirectoryUser,
    ) -> AppResult<Vec<ProfileProperty>> {
        self.check(&self.fail_properties)?;
        Ok(self
            .properties
            .lock()
            .unwrap()
            .iter()
            .filter(|(identity, _)| identity.eq_ignore_ascii_case(&user.identity))
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn accept_tou(&self, user: &DirectoryUser) -> AppResult<Option<DirectoryUser>> {
        self.check(&self.fail_users)?;
        let mut users = self.users.lock().unwrap();
        Ok(users.iter_mut().find(|u| u.id == user.id).map(|u| {
            u.is_tou_accepted = true;
            u.tou_accepted_at = Some(now());
            u.last_modified_at = Some(now());
            u.clone()
        }))
    }

    async fn save_user(&self, user: &DirectoryUser) -> AppResult<()> {
        self.check(&self.fail_users)?;
        let mut users = self.users.lock().unwrap();
        let stored = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(AppError::NotFound)?;
        stored.is_approved = user.is_approved;
        stored.is_security_approved = user.is_security_approved;
        stored.is_tou_accepted = user.is_tou_accepted;
        stored.last_modified_at = Some(now());
        Ok(())
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

#[derive(Debug, Clone)]
pub struct DiagnosticRecord {
    pub message: String,
    pub severity: Severity,
    pub event_id: EventId,
    pub error: Option<String>,
}

/// Diagnostics sink that keeps every record for assertions.
#[derive(Default)]
pub struct RecordingDiagnostics {
    verbose: bool,
    pub records: Mutex<Vec<DiagnosticRecord>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self {
            verbose: true,
            ..Self::default()
        }
    }

    pub fn has_event(&self, event_id: EventId) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.event_id == event_id)
    }

    pub fn messages_for(&self, event_id: EventId) -> Vec<String> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.event_id == event_id)
            .map(|r| r.message.clone())
            .collect()
    }
}

impl DiagnosticsSink for RecordingDiagnostics {
    fn log_message(
        &self,
        message: &str,
        severity: Severity,
        event_id: EventId,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        self.records.lock().unwrap().push(DiagnosticRecord {
            message: message.to_string(),
            severity,
            event_id,
            error: error.map(|e| e.to_string()),
        });
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }
}

// ============================================================================
// Issuer Names
// ============================================================================

/// Issuer provider that always answers with the same name.
pub struct StaticIssuerNames {
    name: String,
}

impl StaticIssuerNames {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl IssuerNameProvider for StaticIssuerNames {
    fn issuer_name(&self, _context: Option<&Url>) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;

    #[tokio::test]
    async fn test_get_user_matches_identity_case_insensitively() {
        let repo = InMemoryUserDirectory::new().with_user(create_test_user(|u| {
            u.identity = "Alice".into();
        }));

        let found = repo.get_user("ALICE", UserLookup::READ_ONLY).await.unwrap();

        assert_eq!(found.unwrap().identity, "Alice");
    }

    #[tokio::test]
    async fn test_get_all_roles_is_distinct() {
        let repo = InMemoryUserDirectory::new()
            .with_role("a", crate::test_utils::create_test_role("urn:role", "Admin"))
            .with_role("b", crate::test_utils::create_test_role("urn:role", "Admin"))
            .with_role_name("Viewer");

        assert_eq!(repo.get_all_roles().await.unwrap(), vec!["Admin", "Viewer"]);
    }
}
