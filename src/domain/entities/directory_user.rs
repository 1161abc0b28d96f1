use chrono::NaiveDateTime;
use serde::Serialize;

/// A user record as stored in the user repository.
///
/// `identity` is the unique key; the repository matches it case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryUser {
    pub id: i32,
    pub identity: String,
    pub display_name: String,
    pub email: String,
    pub is_approved: bool,
    pub is_security_approved: bool,
    pub is_tou_accepted: bool,
    pub created_at: Option<NaiveDateTime>,
    pub tou_accepted_at: Option<NaiveDateTime>,
    pub last_modified_at: Option<NaiveDateTime>,
    pub last_login_at: Option<NaiveDateTime>,
    pub login_count: i32,
}

/// Flags the repository can update through an explicit save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApprovalFlags {
    pub is_approved: Option<bool>,
    pub is_security_approved: Option<bool>,
    pub is_tou_accepted: Option<bool>,
}

impl DirectoryUser {
    pub fn apply_flags(&mut self, flags: ApprovalFlags) {
        if let Some(v) = flags.is_approved {
            self.is_approved = v;
        }
        if let Some(v) = flags.is_security_approved {
            self.is_security_approved = v;
        }
        if let Some(v) = flags.is_tou_accepted {
            self.is_tou_accepted = v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_user;

    #[test]
    fn apply_flags_only_touches_supplied_values() {
        let mut user = create_test_user(|u| {
            u.is_approved = false;
            u.is_security_approved = true;
            u.is_tou_accepted = false;
        });

        user.apply_flags(ApprovalFlags {
            is_approved: Some(true),
            ..Default::default()
        });

        assert!(user.is_approved);
        assert!(user.is_security_approved);
        assert!(!user.is_tou_accepted);
    }
}
