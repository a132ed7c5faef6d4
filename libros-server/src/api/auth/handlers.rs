use axum::extract::State;
use axum::Json;
use log::{info, warn};
use serde_json::Value;

use super::models::{RefreshRequest, TokenExchangeRequest};
use crate::errors::ApiError;
use crate::exchange::ExchangeError;
use crate::openapi::AUTH_TAG;
use crate::state::AppState;

/// Exchanges an authorization code for the upstream token response.
///
/// The response body comes straight from the authorization server; this
/// service adds nothing and strips nothing.
#[utoipa::path(
    post,
    path = "/auth/token",
    tag = AUTH_TAG,
    request_body = TokenExchangeRequest,
    responses(
        (status = 200, description = "Token response relayed from the authorization server"),
        (status = 400, description = "Code missing, or the authorization server rejected the exchange")
    )
)]
pub(super) async fn exchange_token(
    State(state): State<AppState>,
    Json(request): Json<TokenExchangeRequest>,
) -> Result<Json<Value>, ApiError> {
    info!("Exchanging authorization code for tokens");
    let tokens = state
        .exchange
        .exchange_code(&request.code, &request.redirect_uri, &request.code_verifier)
        .await
        .map_err(|err| map_exchange_error("token_exchange_failed", err))?;
    Ok(Json(tokens))
}

/// Trades a refresh token for a fresh token response.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = AUTH_TAG,
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token response relayed from the authorization server"),
        (status = 400, description = "Refresh token missing, or the authorization server rejected it")
    )
)]
pub(super) async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<Value>, ApiError> {
    info!("Refreshing session tokens");
    let tokens = state
        .exchange
        .refresh(&request.refresh_token)
        .await
        .map_err(|err| map_exchange_error("refresh_failed", err))?;
    Ok(Json(tokens))
}

fn map_exchange_error(code: &'static str, err: ExchangeError) -> ApiError {
    match err {
        ExchangeError::InvalidRequest(message) => ApiError::invalid_request(message),
        other => {
            warn!("Token endpoint call failed: {other}");
            ApiError::upstream(code, other)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, ResponseTemplate};

    use crate::test_utils::TestFixture;

    #[tokio::test]
    async fn exchange_relays_the_upstream_token_response() {
        let fixture = TestFixture::new().await;
        let upstream_body = json!({
            "access_token": "opaque-access",
            "refresh_token": "opaque-refresh",
            "token_type": "Bearer",
            "expires_in": 300,
        });
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=authorization_code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body.clone()))
            .expect(1)
            .mount(&fixture.auth_server)
            .await;

        let response = fixture
            .post_json(
                "/auth/token",
                &json!({
                    "code": "auth-code",
                    "redirectUri": "https://app/callback",
                    "codeVerifier": "verifier",
                }),
                None,
            )
            .await;

        response.assert_ok();
        assert_eq!(response.json, upstream_body);
    }

    #[tokio::test]
    async fn blank_code_is_rejected_before_any_upstream_call() {
        let fixture = TestFixture::new().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&fixture.auth_server)
            .await;

        let response = fixture
            .post_json(
                "/auth/token",
                &json!({
                    "code": "   ",
                    "redirectUri": "https://app/callback",
                    "codeVerifier": "verifier",
                }),
                None,
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("invalid_request"));
    }

    #[tokio::test]
    async fn upstream_rejection_maps_to_token_exchange_failed() {
        let fixture = TestFixture::new().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .expect(1)
            .mount(&fixture.auth_server)
            .await;

        let response = fixture
            .post_json(
                "/auth/token",
                &json!({
                    "code": "expired-code",
                    "redirectUri": "https://app/callback",
                    "codeVerifier": "verifier",
                }),
                None,
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("token_exchange_failed"));
    }

    #[tokio::test]
    async fn refresh_relays_the_upstream_token_response() {
        let fixture = TestFixture::new().await;
        let upstream_body = json!({
            "access_token": "fresh-access",
            "refresh_token": "fresh-refresh",
            "token_type": "Bearer",
        });
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(body_string_contains("grant_type=refresh_token"))
            .and(body_string_contains("refresh_token=opaque-refresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(upstream_body.clone()))
            .expect(1)
            .mount(&fixture.auth_server)
            .await;

        let response = fixture
            .post_json(
                "/auth/refresh",
                &json!({ "refreshToken": "opaque-refresh" }),
                None,
            )
            .await;

        response.assert_ok();
        assert_eq!(response.json, upstream_body);
    }

    #[tokio::test]
    async fn rejected_refresh_maps_to_refresh_failed() {
        let fixture = TestFixture::new().await;
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "invalid_grant" })),
            )
            .expect(1)
            .mount(&fixture.auth_server)
            .await;

        let response = fixture
            .post_json(
                "/auth/refresh",
                &json!({ "refreshToken": "revoked-refresh" }),
                None,
            )
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code(), Some("refresh_failed"));
    }
}
