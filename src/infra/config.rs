use std::{collections::HashMap, net::SocketAddr, path::PathBuf, time::Duration};

use env_helpers::get_env_default;
use secrecy::SecretString;

use crate::adapters::issuer::parse_host_overrides;

/// Where the user repository lives.
pub enum DatabaseConfig {
    /// A full connection URL (`DATABASE_URL`).
    Url(SecretString),
    /// Connection parts. Without a user the driver's ambient credentials apply.
    Parts {
        server: String,
        database: String,
        user: Option<String>,
        password: Option<SecretString>,
    },
}

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseConfig,
    /// Connect and acquire timeout; `None` keeps the driver default.
    pub db_timeout: Option<Duration>,
    pub db_max_connections: u32,
    /// Mirror diagnostics into the repository's message log.
    pub log_to_db: bool,
    pub log_verbose: bool,
    /// Optional JSON log file next to the console output.
    pub log_file: Option<PathBuf>,
    /// Display name of this claims provider; issuer of augmented role claims.
    pub provider_name: String,
    /// Default trusted identity issuer label.
    pub trusted_issuer_name: Option<String>,
    /// Per-host trusted issuer overrides, keyed by lower-cased host.
    pub trusted_issuer_hosts: HashMap<String, String>,
    /// Server name recorded with persisted diagnostics.
    pub server_name: String,
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr: SocketAddr =
            get_env_default("BIND_ADDR", SocketAddr::from(([127, 0, 0, 1], 3002)));

        let database = match optional_env("DATABASE_URL") {
            Some(url) => DatabaseConfig::Url(SecretString::new(url.into())),
            None => {
                let server = optional_env("SQL_SERVER").ok_or_else(|| {
                    anyhow::anyhow!("Either DATABASE_URL or SQL_SERVER must be set")
                })?;
                DatabaseConfig::Parts {
                    server,
                    database: get_env_default("SQL_DATABASE", "claims".to_string()),
                    user: optional_env("SQL_USER"),
                    password: optional_env("SQL_PASSWORD").map(|p| SecretString::new(p.into())),
                }
            }
        };

        let timeout_secs: u64 = get_env_default("SQL_TIMEOUT_SECS", 0);
        let db_max_connections: u32 = get_env_default("DB_MAX_CONNECTIONS", 5);
        let log_to_db: bool = get_env_default("LOG_TO_DB", false);
        let log_verbose: bool = get_env_default("LOG_VERBOSE", false);
        let log_file = optional_env("LOG_FILE").map(PathBuf::from);
        let provider_name: String =
            get_env_default("CLAIMS_PROVIDER_NAME", "claims-bridge".to_string());
        let trusted_issuer_name = optional_env("TRUSTED_ISSUER_NAME");
        let trusted_issuer_hosts = match optional_env("TRUSTED_ISSUER_HOSTS") {
            Some(raw) => parse_host_overrides(&raw)?,
            None => HashMap::new(),
        };
        let server_name = optional_env("SERVER_NAME")
            .or_else(|| optional_env("HOSTNAME"))
            .unwrap_or_else(|| "unknown".to_string());

        Ok(Self {
            bind_addr,
            database,
            db_timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
            db_max_connections,
            log_to_db,
            log_verbose,
            log_file,
            provider_name,
            trusted_issuer_name,
            trusted_issuer_hosts,
            server_name,
        })
    }
}
