pub mod attribute_store;
pub mod claims;
pub mod directory;

use axum::Router;

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/attribute-store", attribute_store::router())
        .nest("/claims", claims::router())
        .nest("/directory", directory::router())
}
