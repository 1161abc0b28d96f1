use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::app_error::AppError;
use crate::application::picker::{PICKER_SCHEMA, SchemaElement, normalize_role, normalize_user};
use crate::application::ports::{
    diagnostics::{DiagnosticsSink, EventId, Severity},
    issuer::IssuerNameProvider,
    user_directory::{UserDirectoryRepo, UserLookup, UserSearchMode},
};
use crate::application::use_cases::claim_types::ClaimTypeResolver;
use crate::domain::entities::{
    claim::{Claim, IssuedClaim, STRING_CLAIM_VALUE_TYPE},
    entity_kind::{EntityKind, EntityKinds},
    resolved_entity::ResolvedEntity,
};

// ============================================================================
// Provider Metadata
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ProviderCapabilities {
    pub supports_entity_information: bool,
    pub supports_hierarchy: bool,
    pub supports_resolve: bool,
    pub supports_search: bool,
}

const CAPABILITIES: ProviderCapabilities = ProviderCapabilities {
    supports_entity_information: true,
    supports_hierarchy: false,
    supports_resolve: true,
    supports_search: true,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    pub name: String,
    pub claim_types: Vec<String>,
    pub claim_value_types: Vec<String>,
    pub entity_types: Vec<EntityKind>,
    pub schema: Vec<SchemaElement>,
    pub capabilities: ProviderCapabilities,
}

// ============================================================================
// Use Cases
// ============================================================================

/// Claims resolution engine backing the people picker.
///
/// Every operation needs a resolved claim type binding; until the binding is
/// available all operations return empty results. Repository failures are
/// logged per lookup and never abort the other lookups of the same request.
#[derive(Clone)]
pub struct ClaimsProviderUseCases {
    repo: Arc<dyn UserDirectoryRepo>,
    claim_types: Arc<ClaimTypeResolver>,
    issuers: Arc<dyn IssuerNameProvider>,
    diagnostics: Arc<dyn DiagnosticsSink>,
    provider_name: String,
}

impl ClaimsProviderUseCases {
    pub fn new(
        repo: Arc<dyn UserDirectoryRepo>,
        claim_types: Arc<ClaimTypeResolver>,
        issuers: Arc<dyn IssuerNameProvider>,
        diagnostics: Arc<dyn DiagnosticsSink>,
        provider_name: String,
    ) -> Self {
        Self {
            repo,
            claim_types,
            issuers,
            diagnostics,
            provider_name,
        }
    }

    // ========================================================================
    // Resolve / Search
    // ========================================================================

    /// Resolve a single identity or role claim into entities.
    #[instrument(skip(self))]
    pub async fn resolve_claim(&self, context: Option<&Url>, claim: &Claim) -> Vec<ResolvedEntity> {
        let Some(types) = self.claim_types.ready().await else {
            return vec![];
        };

        self.diagnostics.trace(&format!(
            "ResolveClaim called with ClaimType: {} and ClaimValue: {}",
            claim.claim_type, claim.value
        ));

        if claim.claim_type == types.identity {
            let user = match self.repo.get_user(&claim.value, UserLookup::READ_ONLY).await {
                Ok(user) => user,
                Err(err) => {
                    self.report(
                        &format!("Error getting user for identity: {}", claim.value),
                        EventId::GetUserFailed,
                        &err,
                    );
                    None
                }
            };
            let Some(user) = user else {
                return vec![];
            };
            let issuer = self.issuer_name(context);
            vec![self.traced(normalize_user(&user, &types.identity, &issuer))]
        } else if claim.claim_type == types.role {
            let issuer = self.issuer_name(context);
            self.match_roles(&claim.value, &types.role, &issuer).await
        } else {
            vec![]
        }
    }

    /// Resolve free text typed into the picker.
    #[instrument(skip(self))]
    pub async fn resolve_free_text(
        &self,
        context: Option<&Url>,
        text: &str,
        kinds: EntityKinds,
    ) -> Vec<ResolvedEntity> {
        self.diagnostics
            .trace(&format!("ResolveFreeText called with input: {}", text));
        self.find_entities(context, text, kinds).await
    }

    /// Search for entities matching `pattern`.
    ///
    /// `max_count` is advisory for the caller's rendering layer; the full match
    /// set is returned.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        context: Option<&Url>,
        pattern: &str,
        kinds: EntityKinds,
        max_count: usize,
    ) -> Vec<ResolvedEntity> {
        self.diagnostics.trace(&format!(
            "Search called with pattern: {} and max count: {}",
            pattern, max_count
        ));
        self.find_entities(context, pattern, kinds).await
    }

    // ========================================================================
    // Entity Information
    // ========================================================================

    /// Role claims to add to a signed-in identity.
    #[instrument(skip(self))]
    pub async fn claims_for_entity(&self, entity: &Claim) -> Vec<IssuedClaim> {
        let Some(types) = self.claim_types.ready().await else {
            return vec![];
        };

        if entity.claim_type != types.identity {
            if self.diagnostics.is_verbose() {
                self.diagnostics.log_message(
                    &format!(
                        "ClaimsForEntity called with invalid identity ClaimType: {} and ClaimValue: {}",
                        entity.claim_type, entity.value
                    ),
                    Severity::Warning,
                    EventId::InvalidIdentityClaimType,
                    None,
                );
            }
            return vec![];
        }

        let user = match self.repo.get_user(&entity.value, UserLookup::READ_ONLY).await {
            Ok(Some(user)) => user,
            Ok(None) => return vec![],
            Err(err) => {
                self.report(
                    &format!("Error getting user for identity: {}", entity.value),
                    EventId::GetUserFailed,
                    &err,
                );
                return vec![];
            }
        };

        let roles = match self.repo.get_user_roles(&user).await {
            Ok(roles) => roles,
            Err(err) => {
                self.report(
                    &format!("Error getting roles for user identity: {}", user.identity),
                    EventId::GetUserRolesFailed,
                    &err,
                );
                return vec![];
            }
        };

        roles
            .into_iter()
            .map(|role| {
                self.diagnostics.trace(&format!(
                    "Added claim to identity: {} with ClaimType: {} and Value: {}",
                    user.identity, role.claim_type, role.role_name
                ));
                IssuedClaim::trusted(role.claim_type, role.role_name, &self.provider_name)
            })
            .collect()
    }

    /// Claim types, value types, entity types and schema this provider offers.
    pub async fn metadata(&self) -> ProviderMetadata {
        let binding = self.claim_types.resolve().await;

        let mut claim_types = Vec::new();
        let mut entity_types = Vec::new();
        if let Some(identity) = &binding.identity {
            claim_types.push(identity.clone());
            entity_types.push(EntityKind::User);
        }
        if let Some(role) = &binding.role {
            if !claim_types.contains(role) {
                claim_types.push(role.clone());
            }
            entity_types.push(EntityKind::Role);
        }
        let claim_value_types = entity_types
            .iter()
            .map(|_| STRING_CLAIM_VALUE_TYPE.to_string())
            .collect();

        ProviderMetadata {
            name: self.provider_name.clone(),
            claim_types,
            claim_value_types,
            entity_types,
            schema: PICKER_SCHEMA.to_vec(),
            capabilities: CAPABILITIES,
        }
    }

    // ========================================================================
    // Private Helpers
    // ========================================================================

    async fn find_entities(
        &self,
        context: Option<&Url>,
        pattern: &str,
        kinds: EntityKinds,
    ) -> Vec<ResolvedEntity> {
        if kinds.is_empty() {
            return vec![];
        }
        let Some(types) = self.claim_types.ready().await else {
            return vec![];
        };
        let issuer = self.issuer_name(context);

        let mut entities = Vec::new();
        if kinds.allows(EntityKind::User) {
            entities.extend(self.match_users(pattern, &types.identity, &issuer).await);
        }
        if kinds.allows(EntityKind::Role) {
            entities.extend(self.match_roles(pattern, &types.role, &issuer).await);
        }
        entities
    }

    async fn match_users(
        &self,
        pattern: &str,
        identity_claim_type: &str,
        issuer: &str,
    ) -> Vec<ResolvedEntity> {
        match self
            .repo
            .lookup_users(pattern, UserSearchMode::AllUserFieldsContains)
            .await
        {
            Ok(users) => users
                .iter()
                .map(|user| self.traced(normalize_user(user, identity_claim_type, issuer)))
                .collect(),
            Err(err) => {
                self.report(
                    &format!(
                        "Error searching for users with query: {} and queryType: {}",
                        pattern,
                        UserSearchMode::AllUserFieldsContains
                    ),
                    EventId::LookupUsersFailed,
                    &err,
                );
                vec![]
            }
        }
    }

    async fn match_roles(
        &self,
        needle: &str,
        role_claim_type: &str,
        issuer: &str,
    ) -> Vec<ResolvedEntity> {
        match self.repo.get_all_roles().await {
            Ok(roles) => roles
                .iter()
                .filter(|name| contains_ignore_case(name, needle))
                .map(|name| self.traced(normalize_role(name, role_claim_type, issuer)))
                .collect(),
            Err(err) => {
                self.report("Error getting all roles from repository", EventId::GetAllRolesFailed, &err);
                vec![]
            }
        }
    }

    fn issuer_name(&self, context: Option<&Url>) -> String {
        let name = self.issuers.issuer_name(context);
        self.diagnostics
            .trace(&format!("Resolving name of trusted identity issuer to {}", name));
        name
    }

    fn traced(&self, entity: ResolvedEntity) -> ResolvedEntity {
        if self.diagnostics.is_verbose() {
            if let Ok(json) = serde_json::to_string(&entity) {
                self.diagnostics.trace(&format!("Picker entity: {}", json));
            }
        }
        entity
    }

    fn report(&self, message: &str, event_id: EventId, err: &AppError) {
        self.diagnostics
            .log_message(message, Severity::Error, event_id, Some(err));
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
