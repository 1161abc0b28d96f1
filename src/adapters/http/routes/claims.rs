use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    domain::entities::{
        claim::Claim,
        entity_kind::{EntityKind, EntityKinds},
        resolved_entity::ResolvedEntity,
    },
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resolve", post(resolve_claim))
        .route("/resolve-text", post(resolve_free_text))
        .route("/search", post(search))
        .route("/entity-claims", post(claims_for_entity))
        .route("/metadata", get(metadata))
}

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Deserialize)]
struct ResolveClaimPayload {
    claim_type: String,
    value: String,
    context: Option<String>,
}

#[derive(Deserialize)]
struct ResolveTextPayload {
    text: String,
    entity_types: Vec<String>,
    context: Option<String>,
}

#[derive(Deserialize)]
struct SearchPayload {
    pattern: String,
    entity_types: Vec<String>,
    max_count: usize,
    context: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse {
    max_count: usize,
    entities: Vec<ResolvedEntity>,
}

#[derive(Deserialize)]
struct EntityClaimsPayload {
    claim_type: String,
    value: String,
}

fn parse_context(raw: Option<&str>) -> AppResult<Option<Url>> {
    raw.filter(|r| !r.is_empty())
        .map(|r| {
            Url::parse(r)
                .map_err(|e| AppError::InvalidInput(format!("Invalid context URL '{r}': {e}")))
        })
        .transpose()
}

fn parse_entity_kinds(raw: &[String]) -> AppResult<EntityKinds> {
    raw.iter()
        .map(|k| k.parse::<EntityKind>().map_err(AppError::InvalidInput))
        .collect()
}

// ============================================================================
// Handlers
// ============================================================================

async fn resolve_claim(
    State(app_state): State<AppState>,
    Json(payload): Json<ResolveClaimPayload>,
) -> AppResult<impl IntoResponse> {
    let context = parse_context(payload.context.as_deref())?;
    let claim = Claim::new(payload.claim_type, payload.value);

    let entities = app_state
        .claims_provider_use_cases
        .resolve_claim(context.as_ref(), &claim)
        .await;

    Ok(Json(entities))
}

async fn resolve_free_text(
    State(app_state): State<AppState>,
    Json(payload): Json<ResolveTextPayload>,
) -> AppResult<impl IntoResponse> {
    let context = parse_context(payload.context.as_deref())?;
    let kinds = parse_entity_kinds(&payload.entity_types)?;

    let entities = app_state
        .claims_provider_use_cases
        .resolve_free_text(context.as_ref(), &payload.text, kinds)
        .await;

    Ok(Json(entities))
}

async fn search(
    State(app_state): State<AppState>,
    Json(payload): Json<SearchPayload>,
) -> AppResult<impl IntoResponse> {
    let context = parse_context(payload.context.as_deref())?;
    let kinds = parse_entity_kinds(&payload.entity_types)?;

    let entities = app_state
        .claims_provider_use_cases
        .search(context.as_ref(), &payload.pattern, kinds, payload.max_count)
        .await;

    Ok(Json(SearchResponse {
        max_count: payload.max_count,
        entities,
    }))
}

async fn claims_for_entity(
    State(app_state): State<AppState>,
    Json(payload): Json<EntityClaimsPayload>,
) -> impl IntoResponse {
    let claim = Claim::new(payload.claim_type, payload.value);
    let claims = app_state
        .claims_provider_use_cases
        .claims_for_entity(&claim)
        .await;

    Json(claims)
}

async fn metadata(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.claims_provider_use_cases.metadata().await)
}
