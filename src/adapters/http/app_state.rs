use std::sync::Arc;

use crate::{
    application::use_cases::{
        attribute_store::AttributeStoreUseCases, claims_provider::ClaimsProviderUseCases,
        directory::DirectoryUseCases,
    },
    infra::config::AppConfig,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub attribute_store_use_cases: Arc<AttributeStoreUseCases>,
    pub claims_provider_use_cases: Arc<ClaimsProviderUseCases>,
    pub directory_use_cases: Arc<DirectoryUseCases>,
}
