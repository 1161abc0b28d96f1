use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryRole {
    pub id: i32,
    /// Claim namespace the role is issued under.
    pub claim_type: String,
    pub role_name: String,
    pub created_at: Option<NaiveDateTime>,
    pub last_modified_at: Option<NaiveDateTime>,
}
