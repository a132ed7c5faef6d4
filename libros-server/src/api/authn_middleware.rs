use axum::{
    body::Body,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use http::header::AUTHORIZATION;
use libros_policy::ClaimsView;
use log::{debug, warn};

use crate::errors::ApiError;
use crate::state::AppState;

/// Authenticated principal, attached to the request by the middleware and
/// handed to handlers through the extractor below.
#[derive(Debug, Clone)]
pub struct Principal(pub ClaimsView);

/// Verifies the bearer token and projects its claims for the handlers.
///
/// Every failure here is a uniform 401; the 403 family is reserved for the
/// policy engine's denials further in.
pub(super) async fn authentication_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request.headers().get(AUTHORIZATION).ok_or_else(|| {
        warn!("Missing Authorization header");
        ApiError::authentication_required("missing Authorization header")
    })?;

    let token = header.to_str().ok().and_then(bearer_token).ok_or_else(|| {
        warn!("Authorization header is not a bearer token");
        ApiError::authentication_required("expected a bearer token")
    })?;

    let claims = state.verifier.verify(token).await.map_err(|e| {
        warn!("Token verification failed: {e}");
        ApiError::authentication_required("token verification failed")
    })?;

    let principal = ClaimsView::from_claims(Some(&claims)).map_err(|e| {
        warn!("Verified token carries no usable principal: {e}");
        ApiError::authentication_required("token carries no principal")
    })?;

    debug!("Authenticated subject {}", principal.subject());
    request.extensions_mut().insert(Principal(principal));
    Ok(next.run(request).await)
}

/// Strips the scheme from an `Authorization` header value. The scheme
/// comparison is case-insensitive per RFC 7235.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    scheme.eq_ignore_ascii_case("Bearer").then(|| token.trim())
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::authentication_required("no authenticated principal"))
    }
}
