//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::NaiveDateTime;

use crate::domain::entities::{directory_role::DirectoryRole, directory_user::DirectoryUser};

/// Create a test user with sensible defaults. All approval flags start false.
pub fn create_test_user(overrides: impl FnOnce(&mut DirectoryUser)) -> DirectoryUser {
    let mut user = DirectoryUser {
        id: 0,
        identity: "jdoe".to_string(),
        display_name: "Jane Doe".to_string(),
        email: "jdoe@example.com".to_string(),
        is_approved: false,
        is_security_approved: false,
        is_tou_accepted: false,
        created_at: Some(test_datetime()),
        tou_accepted_at: None,
        last_modified_at: Some(test_datetime()),
        last_login_at: None,
        login_count: 0,
    };
    overrides(&mut user);
    user
}

/// Create a test role under the given claim type.
pub fn create_test_role(claim_type: &str, role_name: &str) -> DirectoryRole {
    DirectoryRole {
        id: 0,
        claim_type: claim_type.to_string(),
        role_name: role_name.to_string(),
        created_at: Some(test_datetime()),
        last_modified_at: Some(test_datetime()),
    }
}

/// Fixed timestamp so fixtures compare equal across runs.
pub fn test_datetime() -> NaiveDateTime {
    chrono::DateTime::from_timestamp(1_700_000_000, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or_default()
}
