use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use http::header::AUTHORIZATION;
use http::StatusCode;
use log::debug;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::config::OAuthClientConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Error, Debug)]
pub enum ExchangeError {
    /// Rejected locally; nothing was sent upstream.
    #[error("{0}")]
    InvalidRequest(&'static str),

    /// The authorization server answered with a non-success status.
    #[error("authorization server rejected the exchange: {body}")]
    Rejected { status: StatusCode, body: String },

    /// The authorization server could not be reached in time.
    #[error("authorization server unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// Confidential-client proxy for the authorization server's token endpoint.
///
/// Holds the only copy of the client secret, pre-encoded into the Basic
/// authorization header. Token responses are relayed verbatim and never
/// inspected, cached or logged. Exchanges are never retried: authorization
/// codes are single-use, so a retry could only produce a misleading error.
pub struct TokenExchangeMediator {
    client: reqwest::Client,
    token_url: Url,
    basic_credentials: String,
}

impl TokenExchangeMediator {
    pub fn new(config: &OAuthClientConfig) -> Result<Self, url::ParseError> {
        let base = config.authorization_server.trim_end_matches('/');
        let token_url = Url::parse(&format!("{base}/oauth2/token"))?;

        let encoded = BASE64.encode(format!("{}:{}", config.client_id, config.client_secret));

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .expect("failed to build token exchange client");

        Ok(Self {
            client,
            token_url,
            basic_credentials: format!("Basic {encoded}"),
        })
    }

    /// Exchanges an authorization code (plus PKCE verifier) for tokens.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
        code_verifier: &str,
    ) -> Result<Value, ExchangeError> {
        if code.trim().is_empty() {
            return Err(ExchangeError::InvalidRequest(
                "authorization code is required",
            ));
        }

        debug!("Exchanging authorization code at {}", self.token_url);
        self.post_form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("code_verifier", code_verifier),
        ])
        .await
    }

    /// Trades a refresh token for a fresh token response.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Value, ExchangeError> {
        if refresh_token.trim().is_empty() {
            return Err(ExchangeError::InvalidRequest("refresh token is required"));
        }

        debug!("Refreshing tokens at {}", self.token_url);
        self.post_form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn post_form(&self, form: &[(&str, &str)]) -> Result<Value, ExchangeError> {
        let response = self
            .client
            .post(self.token_url.clone())
            .header(AUTHORIZATION, &self.basic_credentials)
            .form(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExchangeError::Rejected { status, body });
        }

        Ok(response.json().await?)
    }
}
