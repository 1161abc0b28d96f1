use std::str::FromStr;

use secrecy::ExposeSecret;
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::infra::config::{AppConfig, DatabaseConfig};

/// Build connect options from either a URL or the individual connection parts.
/// `SQL_SERVER` may carry a port as `host:port`.
pub fn connect_options(database: &DatabaseConfig) -> anyhow::Result<PgConnectOptions> {
    match database {
        DatabaseConfig::Url(url) => PgConnectOptions::from_str(url.expose_secret())
            .map_err(|e| anyhow::anyhow!("DATABASE_URL is not a valid Postgres URL: {e}")),
        DatabaseConfig::Parts {
            server,
            database,
            user,
            password,
        } => {
            let mut options = match server.rsplit_once(':') {
                Some((host, port)) => {
                    let port: u16 = port
                        .parse()
                        .map_err(|_| anyhow::anyhow!("SQL_SERVER port '{port}' is not a number"))?;
                    PgConnectOptions::new().host(host).port(port)
                }
                None => PgConnectOptions::new().host(server),
            };
            options = options.database(database);
            if let Some(user) = user {
                options = options.username(user);
            }
            if let Some(password) = password {
                options = options.password(password.expose_secret());
            }
            Ok(options)
        }
    }
}

pub async fn init_db(config: &AppConfig) -> anyhow::Result<PgPool> {
    let mut pool_options = PgPoolOptions::new().max_connections(config.db_max_connections);
    if let Some(timeout) = config.db_timeout {
        pool_options = pool_options.acquire_timeout(timeout);
    }

    let pool = pool_options
        .connect_with(connect_options(&config.database)?)
        .await
        .map_err(|e| {
            anyhow::anyhow!("Postgres connection failed (check DATABASE_URL/SQL_* settings): {e}")
        })?;

    info!("Connected to database!");
    Ok(pool)
}
