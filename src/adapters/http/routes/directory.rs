use axum::{
    Json, Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::Deserialize;

use crate::{
    adapters::http::app_state::AppState, app_error::AppResult,
    application::ports::user_directory::UserSearchMode,
    domain::entities::directory_user::ApprovalFlags,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(lookup_users))
        .route("/users/{identity}/accept-tou", post(accept_terms_of_use))
        .route("/users/{identity}/approval", patch(update_approval))
}

#[derive(Deserialize)]
struct LookupQuery {
    #[serde(default)]
    query: String,
    /// One of the `UserSearchMode` names; all user fields when absent.
    mode: Option<String>,
}

#[derive(Deserialize)]
struct ApprovalPayload {
    is_approved: Option<bool>,
    is_security_approved: Option<bool>,
    is_tou_accepted: Option<bool>,
}

impl From<ApprovalPayload> for ApprovalFlags {
    fn from(payload: ApprovalPayload) -> Self {
        ApprovalFlags {
            is_approved: payload.is_approved,
            is_security_approved: payload.is_security_approved,
            is_tou_accepted: payload.is_tou_accepted,
        }
    }
}

async fn lookup_users(
    State(app_state): State<AppState>,
    Query(params): Query<LookupQuery>,
) -> AppResult<impl IntoResponse> {
    let mode = match params.mode.as_deref() {
        Some(raw) => raw.parse::<UserSearchMode>()?,
        None => UserSearchMode::AllUserFieldsContains,
    };

    let details = app_state
        .directory_use_cases
        .lookup_users_with_details(&params.query, mode)
        .await?;

    Ok(Json(details))
}

async fn accept_terms_of_use(
    State(app_state): State<AppState>,
    Path(identity): Path<String>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .directory_use_cases
        .accept_terms_of_use(&identity)
        .await?;

    Ok(Json(user))
}

async fn update_approval(
    State(app_state): State<AppState>,
    Path(identity): Path<String>,
    Json(payload): Json<ApprovalPayload>,
) -> AppResult<impl IntoResponse> {
    let user = app_state
        .directory_use_cases
        .update_approval(&identity, payload.into())
        .await?;

    Ok(Json(user))
}
