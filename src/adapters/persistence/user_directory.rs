use async_trait::async_trait;
use sqlx::Row;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::ports::user_directory::{
        UserDirectoryRepo, UserLookup, UserSearchMode, normalize_search_pattern,
    },
    domain::entities::{
        directory_role::DirectoryRole, directory_user::DirectoryUser,
        profile_property::ProfileProperty,
    },
};

const USER_COLUMNS: &str = "id, identity, display_name, email_address, is_approved, \
     is_security_approved, is_tou_accepted, create_date, tou_accepted_date, \
     last_modified_date, last_login_date, login_count";

fn row_to_user(row: sqlx::postgres::PgRow) -> DirectoryUser {
    DirectoryUser {
        id: row.get("id"),
        identity: row.get("identity"),
        display_name: row
            .get::<Option<String>, _>("display_name")
            .unwrap_or_default(),
        email: row
            .get::<Option<String>, _>("email_address")
            .unwrap_or_default(),
        is_approved: row.get("is_approved"),
        is_security_approved: row.get("is_security_approved"),
        is_tou_accepted: row.get("is_tou_accepted"),
        created_at: row.get("create_date"),
        tou_accepted_at: row.get("tou_accepted_date"),
        last_modified_at: row.get("last_modified_date"),
        last_login_at: row.get("last_login_date"),
        login_count: row.get("login_count"),
    }
}

fn row_to_role(row: sqlx::postgres::PgRow) -> DirectoryRole {
    DirectoryRole {
        id: row.get("id"),
        claim_type: row.get("claim_type"),
        role_name: row.get("role_name"),
        created_at: row.get("create_date"),
        last_modified_at: row.get("last_modified_date"),
    }
}

fn row_to_property(row: sqlx::postgres::PgRow) -> ProfileProperty {
    ProfileProperty {
        name: row.get("name"),
        value: row.get::<Option<String>, _>("value").unwrap_or_default(),
    }
}

/// Empty claim type rows count as "not configured".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// The routine answers TRUE once the user's roles are inactive; NULL counts as failure.
fn deactivation_succeeded(result: Option<bool>) -> bool {
    result.unwrap_or(false)
}

#[async_trait]
impl UserDirectoryRepo for PostgresPersistence {
    async fn get_user(
        &self,
        identity: &str,
        lookup: UserLookup,
    ) -> AppResult<Option<DirectoryUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM get_user($1, $2, $3)");
        let row = sqlx::query(&sql)
            .bind(identity)
            .bind(lookup.is_login)
            .bind(lookup.create_if_absent)
            .fetch_optional(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(row.map(row_to_user))
    }

    async fn get_user_roles(&self, user: &DirectoryUser) -> AppResult<Vec<DirectoryRole>> {
        let rows = sqlx::query(
            r#"
            SELECT id, claim_type, role_name, create_date, last_modified_date
            FROM get_user_roles($1)
            "#,
        )
        .bind(user.id)
        .fetch_all(self.pool())
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_role).collect())
    }

    async fn get_all_roles(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query("SELECT role_name FROM get_all_roles()")
            .fetch_all(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(|row| row.get("role_name")).collect())
    }

    async fn set_roles_inactive(&self, user: &DirectoryUser) -> AppResult<bool> {
        let deactivated: Option<bool> = sqlx::query_scalar("SELECT set_roles_inactive($1)")
            .bind(user.id)
            .fetch_one(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(deactivation_succeeded(deactivated))
    }

    async fn log_claim(
        &self,
        identity: &str,
        claim_type: &str,
        claim_value: &str,
    ) -> AppResult<()> {
        sqlx::query("SELECT log_claim($1, $2, $3)")
            .bind(identity)
            .bind(claim_type)
            .bind(claim_value)
            .execute(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn get_identity_claim_type(&self) -> AppResult<Option<String>> {
        let claim_type: Option<String> =
            sqlx::query_scalar("SELECT claim_type FROM get_identity_claim_type()")
                .fetch_optional(self.pool())
                .await
                .map_err(AppError::from)?
                .flatten();

        Ok(non_empty(claim_type))
    }

    async fn get_role_claim_type(&self) -> AppResult<Option<String>> {
        let claim_type: Option<String> =
            sqlx::query_scalar("SELECT claim_type FROM get_role_claim_type()")
                .fetch_optional(self.pool())
                .await
                .map_err(AppError::from)?
                .flatten();

        Ok(non_empty(claim_type))
    }

    async fn lookup_users(
        &self,
        pattern: &str,
        mode: UserSearchMode,
    ) -> AppResult<Vec<DirectoryUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM lookup_users($1, $2)");
        let rows = sqlx::query(&sql)
            .bind(normalize_search_pattern(pattern))
            .bind(mode.code())
            .fetch_all(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_user).collect())
    }

    async fn get_all_profile_properties(
        &self,
        user: &DirectoryUser,
    ) -> AppResult<Vec<ProfileProperty>> {
        let rows = sqlx::query("SELECT name, value FROM get_user_profile_properties($1)")
            .bind(user.id)
            .fetch_all(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(row_to_property).collect())
    }

    async fn accept_tou(&self, user: &DirectoryUser) -> AppResult<Option<DirectoryUser>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM accept_tou($1)");
        let row = sqlx::query(&sql)
            .bind(user.id)
            .fetch_optional(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(row.map(row_to_user))
    }

    async fn save_user(&self, user: &DirectoryUser) -> AppResult<()> {
        sqlx::query("SELECT save_user($1, $2, $3, $4, $5)")
            .bind(user.id)
            .bind(&user.identity)
            .bind(user.is_approved)
            .bind(user.is_security_approved)
            .bind(user.is_tou_accepted)
            .execute(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
