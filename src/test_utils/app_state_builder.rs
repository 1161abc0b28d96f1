//! Test app state builder for HTTP-level integration testing.
//!
//! `TestAppStateBuilder` wires every use case against one shared
//! `InMemoryUserDirectory`, a `RecordingDiagnostics` sink and a fixed issuer.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use secrecy::SecretString;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        attribute_store::AttributeStoreUseCases, claim_types::ClaimTypeResolver,
        claims_provider::ClaimsProviderUseCases, directory::DirectoryUseCases,
    },
    infra::config::{AppConfig, DatabaseConfig},
    test_utils::{InMemoryUserDirectory, RecordingDiagnostics, StaticIssuerNames},
};

pub const TEST_ISSUER_NAME: &str = "test-sts";
pub const TEST_PROVIDER_NAME: &str = "claims-bridge";

pub struct TestAppStateBuilder {
    repo: InMemoryUserDirectory,
    verbose: bool,
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            repo: InMemoryUserDirectory::new(),
            verbose: false,
        }
    }

    pub fn with_repo(mut self, repo: InMemoryUserDirectory) -> Self {
        self.repo = repo;
        self
    }

    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    pub fn build(self) -> AppState {
        self.build_with_mocks().0
    }

    /// Build the state and hand back the shared repository and diagnostics
    /// for assertions.
    pub fn build_with_mocks(
        self,
    ) -> (
        AppState,
        Arc<InMemoryUserDirectory>,
        Arc<RecordingDiagnostics>,
    ) {
        let repo = Arc::new(self.repo);
        let diagnostics = Arc::new(if self.verbose {
            RecordingDiagnostics::verbose()
        } else {
            RecordingDiagnostics::new()
        });
        let issuers = Arc::new(StaticIssuerNames::new(TEST_ISSUER_NAME));

        let claim_types = Arc::new(ClaimTypeResolver::new(repo.clone(), diagnostics.clone()));

        let attribute_store_use_cases =
            AttributeStoreUseCases::new(repo.clone(), diagnostics.clone());
        let claims_provider_use_cases = ClaimsProviderUseCases::new(
            repo.clone(),
            claim_types,
            issuers,
            diagnostics.clone(),
            TEST_PROVIDER_NAME.to_string(),
        );
        let directory_use_cases = DirectoryUseCases::new(repo.clone(), diagnostics.clone());

        // Create minimal config for testing
        let config = Arc::new(AppConfig {
            bind_addr: "127.0.0.1:3002".parse::<SocketAddr>().unwrap(),
            database: DatabaseConfig::Url(SecretString::new(
                "postgres://localhost/claims_test".into(),
            )),
            db_timeout: None,
            db_max_connections: 1,
            log_to_db: false,
            log_verbose: self.verbose,
            log_file: None,
            provider_name: TEST_PROVIDER_NAME.to_string(),
            trusted_issuer_name: Some(TEST_ISSUER_NAME.to_string()),
            trusted_issuer_hosts: HashMap::new(),
            server_name: "test-host".to_string(),
        });

        let app_state = AppState {
            config,
            attribute_store_use_cases: Arc::new(attribute_store_use_cases),
            claims_provider_use_cases: Arc::new(claims_provider_use_cases),
            directory_use_cases: Arc::new(directory_use_cases),
        };

        (app_state, repo, diagnostics)
    }
}
