use std::sync::Arc;

use tokio::sync::RwLock;

use crate::application::ports::{
    diagnostics::{DiagnosticsSink, EventId, Severity},
    user_directory::UserDirectoryRepo,
};

/// Identity and role claim type strings discovered from the repository.
///
/// A `None` half has not been resolved yet (or the repository returned an
/// empty value) and will be fetched again on the next `resolve`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimTypeBinding {
    pub identity: Option<String>,
    pub role: Option<String>,
}

/// A fully resolved binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTypes {
    pub identity: String,
    pub role: String,
}

impl ClaimTypeBinding {
    pub fn is_complete(&self) -> bool {
        self.identity.is_some() && self.role.is_some()
    }

    pub fn ready(&self) -> Option<ClaimTypes> {
        match (&self.identity, &self.role) {
            (Some(identity), Some(role)) => Some(ClaimTypes {
                identity: identity.clone(),
                role: role.clone(),
            }),
            _ => None,
        }
    }
}

/// Process-wide cache of the claim type binding.
///
/// Resolved halves are immutable once set. Missing halves are re-fetched on
/// every call; concurrent cold-cache callers may fetch twice, but the write
/// lock only ever fills halves that are still empty.
pub struct ClaimTypeResolver {
    repo: Arc<dyn UserDirectoryRepo>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    binding: RwLock<ClaimTypeBinding>,
}

impl ClaimTypeResolver {
    pub fn new(repo: Arc<dyn UserDirectoryRepo>, diagnostics: Arc<dyn DiagnosticsSink>) -> Self {
        Self {
            repo,
            diagnostics,
            binding: RwLock::new(ClaimTypeBinding::default()),
        }
    }

    /// Return the binding, fetching whichever halves are still missing.
    pub async fn resolve(&self) -> ClaimTypeBinding {
        let snapshot = self.binding.read().await.clone();
        if snapshot.is_complete() {
            return snapshot;
        }

        let identity = match snapshot.identity {
            Some(_) => None,
            None => self.fetch_identity().await,
        };
        let role = match snapshot.role {
            Some(_) => None,
            None => self.fetch_role().await,
        };

        let mut binding = self.binding.write().await;
        if binding.identity.is_none() {
            binding.identity = identity;
        }
        if binding.role.is_none() {
            binding.role = role;
        }
        binding.clone()
    }

    /// Resolve and return both claim types, or `None` when the provider is not ready.
    pub async fn ready(&self) -> Option<ClaimTypes> {
        self.resolve().await.ready()
    }

    /// The binding as currently cached, without touching the repository.
    pub async fn current(&self) -> ClaimTypeBinding {
        self.binding.read().await.clone()
    }

    async fn fetch_identity(&self) -> Option<String> {
        self.diagnostics
            .trace("Getting identity claim type from repository");
        match self.repo.get_identity_claim_type().await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                self.diagnostics.log_message(
                    "Error getting identity claim type from repository",
                    Severity::Error,
                    EventId::IdentityClaimTypeFailed,
                    Some(&err),
                );
                None
            }
        }
    }

    async fn fetch_role(&self) -> Option<String> {
        self.diagnostics.trace("Getting role claim type from repository");
        match self.repo.get_role_claim_type().await {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(err) => {
                self.diagnostics.log_message(
                    "Error getting role claim type from repository",
                    Severity::Error,
                    EventId::RoleClaimTypeFailed,
                    Some(&err),
                );
                None
            }
        }
    }
}
