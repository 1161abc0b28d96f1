use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
};

/// One diagnostic record as written by the `log_message` routine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub message: String,
    pub severity: String,
    pub server: String,
    pub event_id: i32,
    pub error_message: String,
    pub error_source: String,
}

impl PostgresPersistence {
    pub async fn write_log_entry(&self, entry: &LogEntry) -> AppResult<()> {
        sqlx::query("SELECT log_message($1, $2, $3, $4, $5, $6)")
            .bind(&entry.message)
            .bind(&entry.severity)
            .bind(&entry.server)
            .bind(entry.event_id)
            .bind(&entry.error_message)
            .bind(&entry.error_source)
            .execute(self.pool())
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}
