mod handlers;
mod models;

use axum::routing::post;
use axum::Router;

use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/token", post(handlers::exchange_token))
        .route("/auth/refresh", post(handlers::refresh_token))
}
