use std::{collections::HashMap, sync::Arc};

use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    application::ports::{
        diagnostics::{DiagnosticsSink, EventId, Severity},
        issuer::IssuerNameProvider,
    },
};

/// Parse `host=name,host=name` overrides. Hosts are matched case-insensitively.
pub fn parse_host_overrides(raw: &str) -> AppResult<HashMap<String, String>> {
    let mut hosts = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (host, name) = entry.split_once('=').ok_or_else(|| {
            AppError::InvalidInput(format!("Issuer override '{entry}' is not host=name"))
        })?;
        let (host, name) = (host.trim(), name.trim());
        if host.is_empty() || name.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Issuer override '{entry}' is not host=name"
            )));
        }
        hosts.insert(host.to_lowercase(), name.to_string());
    }
    Ok(hosts)
}

/// Issuer names taken from configuration: a per-host override for the
/// request's context, falling back to the default trusted issuer.
pub struct ConfiguredIssuerNames {
    default_name: Option<String>,
    hosts: HashMap<String, String>,
    diagnostics: Arc<dyn DiagnosticsSink>,
}

impl ConfiguredIssuerNames {
    pub fn new(
        default_name: Option<String>,
        hosts: HashMap<String, String>,
        diagnostics: Arc<dyn DiagnosticsSink>,
    ) -> Self {
        Self {
            default_name: default_name.filter(|n| !n.is_empty()),
            hosts,
            diagnostics,
        }
    }
}

impl IssuerNameProvider for ConfiguredIssuerNames {
    fn issuer_name(&self, context: Option<&Url>) -> String {
        let by_host = context
            .and_then(|url| url.host_str())
            .and_then(|host| self.hosts.get(&host.to_lowercase()));

        match by_host.or(self.default_name.as_ref()) {
            Some(name) => name.clone(),
            None => {
                let context = context.map(Url::as_str).unwrap_or("<none>");
                self.diagnostics.log_message(
                    &format!("No trusted identity issuer configured for context {context}"),
                    Severity::Error,
                    EventId::IssuerLookupFailed,
                    None,
                );
                String::new()
            }
        }
    }
}
