use async_trait::async_trait;

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::{
        directory_role::DirectoryRole, directory_user::DirectoryUser,
        profile_property::ProfileProperty,
    },
};

// ============================================================================
// Port Types
// ============================================================================

/// How `get_user` should treat the lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserLookup {
    /// Insert a new user record when the identity is unknown.
    pub create_if_absent: bool,
    /// Count the lookup as a login (bumps login count and last login date).
    pub is_login: bool,
}

impl UserLookup {
    /// Plain read: never creates, never counts as a login.
    pub const READ_ONLY: UserLookup = UserLookup {
        create_if_absent: false,
        is_login: false,
    };

    /// Sign-in lookup: provisions unknown users and records the login.
    pub const LOGIN: UserLookup = UserLookup {
        create_if_absent: true,
        is_login: true,
    };
}

/// Which user fields a `lookup_users` pattern is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserSearchMode {
    AllUserFieldsContains,
    DisplayNameContains,
    ProfilePropertyValuesContains,
    IdentityContains,
}

impl UserSearchMode {
    /// Integer code understood by the repository's lookup routine.
    pub fn code(&self) -> i32 {
        match self {
            UserSearchMode::AllUserFieldsContains => 1,
            UserSearchMode::DisplayNameContains => 2,
            UserSearchMode::ProfilePropertyValuesContains => 3,
            UserSearchMode::IdentityContains => 4,
        }
    }
}

impl std::fmt::Display for UserSearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UserSearchMode::AllUserFieldsContains => "AllUserFieldsContains",
            UserSearchMode::DisplayNameContains => "DisplayNameContains",
            UserSearchMode::ProfilePropertyValuesContains => "ProfilePropertyValuesContains",
            UserSearchMode::IdentityContains => "IdentityContains",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for UserSearchMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AllUserFieldsContains" => Ok(UserSearchMode::AllUserFieldsContains),
            "DisplayNameContains" => Ok(UserSearchMode::DisplayNameContains),
            "ProfilePropertyValuesContains" => Ok(UserSearchMode::ProfilePropertyValuesContains),
            "IdentityContains" => Ok(UserSearchMode::IdentityContains),
            _ => Err(AppError::InvalidInput(format!("Unknown search mode: {}", s))),
        }
    }
}

/// Normalize a search pattern the way the repository expects it.
pub fn normalize_search_pattern(pattern: &str) -> String {
    pattern.trim().to_lowercase()
}

// ============================================================================
// Repository Trait
// ============================================================================

/// Relational store of users, roles, profile properties and claim type metadata.
#[async_trait]
pub trait UserDirectoryRepo: Send + Sync {
    async fn get_user(&self, identity: &str, lookup: UserLookup)
    -> AppResult<Option<DirectoryUser>>;
    /// Active roles held by the user.
    async fn get_user_roles(&self, user: &DirectoryUser) -> AppResult<Vec<DirectoryRole>>;
    /// Names of every role known to the repository.
    async fn get_all_roles(&self) -> AppResult<Vec<String>>;
    async fn set_roles_inactive(&self, user: &DirectoryUser) -> AppResult<bool>;
    async fn log_claim(&self, identity: &str, claim_type: &str, claim_value: &str)
    -> AppResult<()>;
    async fn get_identity_claim_type(&self) -> AppResult<Option<String>>;
    async fn get_role_claim_type(&self) -> AppResult<Option<String>>;
    async fn lookup_users(&self, pattern: &str, mode: UserSearchMode)
    -> AppResult<Vec<DirectoryUser>>;
    async fn get_all_profile_properties(
        &self,
        user: &DirectoryUser,
    ) -> AppResult<Vec<ProfileProperty>>;
    async fn accept_tou(&self, user: &DirectoryUser) -> AppResult<Option<DirectoryUser>>;
    async fn save_user(&self, user: &DirectoryUser) -> AppResult<()>;
}
