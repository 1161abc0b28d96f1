use std::{fs::File, sync::Arc};

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    adapters::{
        diagnostics::{PersistentDiagnostics, TracingDiagnostics},
        http::app_state::AppState,
        issuer::ConfiguredIssuerNames,
    },
    application::{
        ports::{
            diagnostics::{DiagnosticsSink, EventId, Severity},
            issuer::IssuerNameProvider,
            user_directory::UserDirectoryRepo,
        },
        use_cases::{
            attribute_store::AttributeStoreUseCases, claim_types::ClaimTypeResolver,
            claims_provider::ClaimsProviderUseCases, directory::DirectoryUseCases,
        },
    },
    infra::{config::AppConfig, postgres_persistence},
};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let postgres = postgres_persistence(&config).await?;

    let tracing_sink = TracingDiagnostics::new(config.log_verbose);
    let diagnostics: Arc<dyn DiagnosticsSink> = if config.log_to_db {
        Arc::new(PersistentDiagnostics::new(
            tracing_sink,
            postgres.clone(),
            config.server_name.clone(),
        ))
    } else {
        Arc::new(tracing_sink)
    };

    diagnostics.log_message(
        &format!(
            "Claims provider '{}' starting (log to db: {}, verbose: {})",
            config.provider_name, config.log_to_db, config.log_verbose
        ),
        Severity::Information,
        EventId::Configuration,
        None,
    );

    let repo = Arc::new(postgres) as Arc<dyn UserDirectoryRepo>;
    let issuers = Arc::new(ConfiguredIssuerNames::new(
        config.trusted_issuer_name.clone(),
        config.trusted_issuer_hosts.clone(),
        diagnostics.clone(),
    )) as Arc<dyn IssuerNameProvider>;

    let claim_types = Arc::new(ClaimTypeResolver::new(repo.clone(), diagnostics.clone()));
    // Warm the cache; failures are logged and retried on first use.
    claim_types.resolve().await;

    let attribute_store_use_cases = AttributeStoreUseCases::new(repo.clone(), diagnostics.clone());
    let claims_provider_use_cases = ClaimsProviderUseCases::new(
        repo.clone(),
        claim_types,
        issuers,
        diagnostics.clone(),
        config.provider_name.clone(),
    );
    let directory_use_cases = DirectoryUseCases::new(repo, diagnostics);

    Ok(AppState {
        config: Arc::new(config),
        attribute_store_use_cases: Arc::new(attribute_store_use_cases),
        claims_provider_use_cases: Arc::new(claims_provider_use_cases),
        directory_use_cases: Arc::new(directory_use_cases),
    })
}

pub fn init_tracing(log_file: Option<&std::path::Path>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "claims_bridge=info,tower_http=info".into());

    // Console (pretty logs)
    let console_layer = fmt::layer()
        .with_target(false) // don’t show target (module path)
        .with_level(true) // show log level
        .pretty(); // human-friendly, with colors

    // File (structured JSON logs)
    let json_layer = log_file.and_then(|path| match File::create(path) {
        Ok(file) => Some(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(true)
                .with_span_list(true)
                .boxed(),
        ),
        Err(err) => {
            eprintln!("cannot create log file {}: {err}", path.display());
            None
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();
}
