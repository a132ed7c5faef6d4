use serde::Deserialize;
use utoipa::ToSchema;

/// Body the browser client posts after returning from the authorization
/// redirect. The code and verifier are forwarded upstream untouched.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(super) struct TokenExchangeRequest {
    /// Single-use authorization code from the redirect.
    pub code: String,
    /// Redirect URI the code was issued for.
    pub redirect_uri: String,
    /// PKCE verifier matching the challenge sent at authorization time.
    pub code_verifier: String,
}

/// Body for renewing a session before the access token expires.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(super) struct RefreshRequest {
    pub refresh_token: String,
}
