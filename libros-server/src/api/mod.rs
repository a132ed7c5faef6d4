pub(crate) mod auth;
mod authn_middleware;
pub(crate) mod books;
pub(crate) mod health;

use axum::{middleware, Router};

use crate::api::authn_middleware::authentication_middleware;
use crate::state::AppState;

/// Combines all API routes into a single router.
///
/// Health and token exchange stay open: the browser client calls the
/// exchange endpoints before it has any token to present.
pub(super) fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(protected_routes(state))
}

/// Catalog routes behind bearer authentication.
fn protected_routes(state: &AppState) -> Router<AppState> {
    books::router().layer(middleware::from_fn_with_state(
        state.clone(),
        authentication_middleware,
    ))
}
