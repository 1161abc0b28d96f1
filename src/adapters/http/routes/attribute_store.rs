use axum::{Json, Router, extract::State, response::IntoResponse, routing::post};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::app_state::AppState, app_error::AppResult,
    application::use_cases::attribute_store::AttributeTable,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/query", post(execute_query))
}

#[derive(Deserialize)]
struct QueryPayload {
    query: Option<String>,
    parameters: Option<Vec<String>>,
}

#[derive(Serialize)]
struct QueryResponse {
    rows: Option<AttributeTable>,
}

async fn execute_query(
    State(app_state): State<AppState>,
    Json(payload): Json<QueryPayload>,
) -> AppResult<impl IntoResponse> {
    let rows = app_state
        .attribute_store_use_cases
        .execute_query(payload.query.as_deref(), payload.parameters.as_deref())
        .await?;

    Ok(Json(QueryResponse { rows }))
}
